//! `PostStore` - the durable CRUD service over the post collection.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewPost, Post, PostPatch};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

/// Validates input and maps repository outcomes onto domain errors.
///
/// Cheap to clone; all clones share the same repository.
#[derive(Clone)]
pub struct PostStore {
    repo: Arc<dyn PostRepository>,
}

impl PostStore {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Validate `draft`, assign an id and persist it.
    pub async fn create(&self, draft: NewPost) -> Result<Post, DomainError> {
        draft.validate()?;
        Ok(self.repo.insert(Post::new(draft)).await?)
    }

    /// Apply a partial update of `title` and/or `content`.
    pub async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, DomainError> {
        patch.validate()?;
        self.repo
            .update_fields(id, &patch)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), DomainError> {
        match self.repo.delete(id).await {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound) => Err(DomainError::post_not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.repo.count().await?)
    }
}
