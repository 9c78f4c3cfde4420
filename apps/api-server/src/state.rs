//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};
use quill_infra::database::{DatabaseConfig, connect};
use quill_infra::{
    InMemoryStore, PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

/// Shared application state: one repository handle per resource.
///
/// Handlers hold no state of their own; everything cross-request lives
/// behind these trait objects.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        match db_config {
            Some(config) => match connect(config).await {
                Ok(db) => Self {
                    users: Arc::new(PostgresUserRepository::new(db.clone())),
                    posts: Arc::new(PostgresPostRepository::new(db.clone())),
                    tags: Arc::new(PostgresTagRepository::new(db.clone())),
                    comments: Arc::new(PostgresCommentRepository::new(db)),
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        }
    }

    /// State backed by the in-memory store. Also used by the handler tests.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            posts: store.clone(),
            tags: store.clone(),
            comments: store,
        }
    }
}
