//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! PostgreSQL repositories via SeaORM, and an in-memory store used as the
//! fallback when no database is configured (and as the test store).

pub mod database;

pub use database::{
    DatabaseConfig, InMemoryStore, PostgresCommentRepository, PostgresPostRepository,
    PostgresTagRepository, PostgresUserRepository,
};
