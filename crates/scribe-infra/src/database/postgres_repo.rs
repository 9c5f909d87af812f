//! PostgreSQL post repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;

use scribe_core::domain::{Post, PostPatch};
use scribe_core::error::RepoError;
use scribe_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn update_fields(&self, id: Uuid, patch: &PostPatch) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_error)?
        else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(model.into()));
        }

        // Only the supplied columns end up in the UPDATE statement.
        let mut active: post::ActiveModel = model.into_active_model();
        if let Some(title) = &patch.title {
            active.title = Set(title.clone());
        }
        if let Some(content) = &patch.content {
            active.content = Set(content.clone());
        }

        tracing::debug!(post_id = %id, "Updating post");

        match active.update(&self.db).await {
            Ok(updated) => Ok(Some(updated.into())),
            // Deleted between the lookup and the update.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(repo_error(e)),
        }
    }
}
