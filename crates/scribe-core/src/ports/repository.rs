use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostPatch};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Fetch every stored entity.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Fails with `RepoError::NotFound` if absent.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;

    /// Number of stored entities.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Apply `patch` to a single post atomically.
    ///
    /// Returns `None` if no post with `id` exists.
    async fn update_fields(&self, id: Uuid, patch: &PostPatch) -> Result<Option<Post>, RepoError>;
}
