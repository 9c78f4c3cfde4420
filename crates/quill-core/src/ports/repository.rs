use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, CommentDetail, Post, PostDetail, Tag, User, UserDetail};
use crate::error::RepoError;
use crate::filter::PostQuery;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// List all entities.
    async fn list(&self) -> Result<Vec<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Persist changes to an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository. Users are written by the external identity subsystem;
/// this service reads them and resolves their owned relations.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Fetch a user with their posts and comments loaded.
    async fn find_detail(&self, id: Uuid) -> Result<Option<UserDetail>, RepoError>;

    async fn list_detail(&self) -> Result<Vec<UserDetail>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Fetch a post with author, tags, and comments loaded.
    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError>;

    /// List posts narrowed by `query`, relations loaded. Filtering happens
    /// in the store, not in memory.
    async fn list_detail(&self, query: &PostQuery) -> Result<Vec<PostDetail>, RepoError>;

    /// Replace the set of tags attached to a post.
    async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    /// Find a tag by name under case-insensitive comparison.
    async fn find_by_name_ci(&self, name: &str) -> Result<Option<Tag>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Fetch a comment with its author loaded.
    async fn find_detail(&self, id: Uuid) -> Result<Option<CommentDetail>, RepoError>;

    async fn list_detail(&self) -> Result<Vec<CommentDetail>, RepoError>;
}
