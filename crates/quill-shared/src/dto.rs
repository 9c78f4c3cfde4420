//! Data Transfer Objects - request payloads for the API.
//!
//! Owner and author fields are deliberately absent: ownership is stamped
//! server-side from the caller identity, and any such field a client sends
//! is ignored. `status` travels as a raw string so that invalid values can
//! be rejected with a field-level error rather than a deserialization
//! failure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request to update a post. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
}

/// Request to create a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

/// Request to update a tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
}

/// Request to create a comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
    pub post: Uuid,
}

/// Request to update a comment. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
    pub post: Option<Uuid>,
}
