//! In-memory post repository.
//!
//! Posts are kept in insertion order behind an async `RwLock`, so every
//! write is applied to a single post inside one critical section.
//! Note: Data is lost on process restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{Post, PostPatch};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, PostRepository};

pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;

        if posts.iter().any(|p| p.id == entity.id) {
            return Err(RepoError::Constraint(format!(
                "Post {} already exists",
                entity.id
            )));
        }

        tracing::debug!(post_id = %entity.id, "Inserting post");
        posts.push(entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;

        tracing::debug!(post_id = %id, "Deleting post");
        posts.remove(index);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.posts.read().await.len() as u64)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn update_fields(&self, id: Uuid, patch: &PostPatch) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        tracing::debug!(post_id = %id, "Updating post");
        post.apply(patch);
        Ok(Some(post.clone()))
    }
}
