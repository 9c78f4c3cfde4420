use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity - a label shared across posts.
///
/// Names are unique under case-insensitive comparison. A tag's lifecycle is
/// independent of the posts that reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}
