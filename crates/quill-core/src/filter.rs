//! List-endpoint filters.

use serde::Deserialize;

/// Query parameters accepted by the post list endpoint.
///
/// `status` narrows the result set to posts whose status equals the raw
/// value exactly. The value is passed to the store untouched: a string
/// outside the declared status enumeration matches no rows and yields an
/// empty list rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostQuery {
    pub status: Option<String>,
}

impl PostQuery {
    /// True when `post_status` passes this filter.
    pub fn matches(&self, post_status: &str) -> bool {
        self.status.as_deref().is_none_or(|s| s == post_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_status_passes_everything() {
        let query = PostQuery::default();
        assert!(query.matches("draft"));
        assert!(query.matches("published"));
    }

    #[test]
    fn status_matches_exactly() {
        let query = PostQuery {
            status: Some("published".to_owned()),
        };
        assert!(query.matches("published"));
        assert!(!query.matches("draft"));
        // No prefix or substring matching.
        assert!(!query.matches("published-archive"));
    }

    #[test]
    fn unknown_status_matches_nothing() {
        let query = PostQuery {
            status: Some("pending".to_owned()),
        };
        assert!(!query.matches("draft"));
        assert!(!query.matches("published"));
    }
}
