use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CommentDetail, PostDetail};

/// User entity - a reference to an identity managed outside this service.
///
/// Users are created and destroyed by the external identity subsystem;
/// this service only reads them and points at them from posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// A user together with the posts they own and the comments they authored.
#[derive(Debug, Clone)]
pub struct UserDetail {
    pub user: User,
    pub posts: Vec<PostDetail>,
    pub comments: Vec<CommentDetail>,
}
