//! Field selection and JSON rendering.
//!
//! Every renderable view declares an ordered field set, of which a fixed
//! subset (the nested relational fields) is optional. The client can narrow
//! the optional subset per request with the `include` query parameter; the
//! always-emitted fields are never dropped. Selection applies only at the
//! top level of a request - a retained relation is always rendered with the
//! related view's full default field set.

use std::collections::HashSet;

use serde_json::{Map, Value, json};

use crate::domain::{CommentDetail, PostDetail, Tag, User, UserDetail};

/// Parsed form of the `include` query parameter.
///
/// Absent, empty, or whitespace-and-comma-only input means no override: the
/// full default field set is rendered. Anything else is split on commas,
/// each token trimmed, and collected as a set; duplicate tokens collapse and
/// tokens that name no optional field (misspellings, always-emitted field
/// names) are silently ignored. Matching is case-sensitive and exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Include(Option<HashSet<String>>);

impl Include {
    /// No override: render the full default field set.
    pub fn all() -> Self {
        Self(None)
    }

    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self(None);
        };

        let requested: HashSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect();

        if requested.is_empty() {
            return Self(None);
        }

        Self(Some(requested))
    }

    /// Whether an optional field named `field` stays in the output.
    pub fn retains(&self, field: &str) -> bool {
        match &self.0 {
            None => true,
            Some(requested) => requested.contains(field),
        }
    }
}

fn render_list<T>(items: &[T], render: impl Fn(&T) -> Map<String, Value>) -> Value {
    Value::Array(items.iter().map(|item| Value::Object(render(item))).collect())
}

/// The default rendering of a user wherever it appears as a nested value.
pub fn render_user(user: &User) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("id".to_owned(), json!(user.id));
    out.insert("username".to_owned(), json!(user.username));
    out.insert("email".to_owned(), json!(user.email));
    out.insert("first_name".to_owned(), json!(user.first_name));
    out.insert("last_name".to_owned(), json!(user.last_name));
    out
}

pub fn render_tag(tag: &Tag) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("id".to_owned(), json!(tag.id));
    out.insert("name".to_owned(), json!(tag.name));
    out
}

impl CommentDetail {
    pub fn render(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("id".to_owned(), json!(self.comment.id));
        out.insert("text".to_owned(), json!(self.comment.text));
        out.insert("user".to_owned(), Value::Object(render_user(&self.author)));
        out.insert("post".to_owned(), json!(self.comment.post_id));
        out.insert("created_at".to_owned(), json!(self.comment.created_at));
        out.insert("updated_at".to_owned(), json!(self.comment.updated_at));
        out
    }
}

impl PostDetail {
    pub const OPTIONAL_FIELDS: &'static [&'static str] = &["user", "tags", "comments"];

    pub fn render(&self, include: &Include) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("id".to_owned(), json!(self.post.id));
        out.insert("title".to_owned(), json!(self.post.title));
        out.insert("content".to_owned(), json!(self.post.content));
        out.insert("status".to_owned(), json!(self.post.status));
        if include.retains("user") {
            out.insert("user".to_owned(), Value::Object(render_user(&self.author)));
        }
        if include.retains("tags") {
            out.insert("tags".to_owned(), render_list(&self.tags, render_tag));
        }
        if include.retains("comments") {
            out.insert(
                "comments".to_owned(),
                render_list(&self.comments, CommentDetail::render),
            );
        }
        out.insert("created_at".to_owned(), json!(self.post.created_at));
        out.insert("updated_at".to_owned(), json!(self.post.updated_at));
        out
    }
}

impl UserDetail {
    pub const OPTIONAL_FIELDS: &'static [&'static str] = &["posts", "comments"];

    pub fn render(&self, include: &Include) -> Map<String, Value> {
        let mut out = render_user(&self.user);
        if include.retains("posts") {
            // Nested posts always carry their full default field set;
            // the request's include applies only at the top level.
            out.insert(
                "posts".to_owned(),
                render_list(&self.posts, |post| post.render(&Include::all())),
            );
        }
        if include.retains("comments") {
            out.insert(
                "comments".to_owned(),
                render_list(&self.comments, CommentDetail::render),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::{Comment, Post, PostStatus};

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "tester".to_owned(),
            email: "tester@example.com".to_owned(),
            first_name: "Test".to_owned(),
            last_name: "Er".to_owned(),
        }
    }

    fn sample_post_detail() -> PostDetail {
        let author = sample_user();
        let post = Post::new(
            author.id,
            "Dynamic Post".to_owned(),
            "Test".to_owned(),
            PostStatus::Draft,
        );
        let comment = Comment::new(author.id, post.id, "Great post!".to_owned());
        PostDetail {
            post,
            author: author.clone(),
            tags: vec![Tag::new("rust".to_owned())],
            comments: vec![CommentDetail {
                comment,
                author,
            }],
        }
    }

    fn field_names(map: &Map<String, Value>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    const FULL_POST_FIELDS: [&str; 9] = [
        "id",
        "title",
        "content",
        "status",
        "user",
        "tags",
        "comments",
        "created_at",
        "updated_at",
    ];

    #[test]
    fn absent_include_renders_full_field_set() {
        let detail = sample_post_detail();
        let out = detail.render(&Include::parse(None));
        assert_eq!(field_names(&out), FULL_POST_FIELDS);
    }

    #[test]
    fn blank_include_behaves_as_no_override() {
        let detail = sample_post_detail();
        for raw in ["", "   ", ",", " , ,", ",,,"] {
            let out = detail.render(&Include::parse(Some(raw)));
            assert_eq!(field_names(&out), FULL_POST_FIELDS, "include={raw:?}");
        }
    }

    #[test]
    fn include_restricts_optional_fields_only() {
        let detail = sample_post_detail();
        let out = detail.render(&Include::parse(Some("user, tags")));

        assert!(out.contains_key("user"));
        assert!(out.contains_key("tags"));
        assert!(!out.contains_key("comments"));
        // Always-emitted fields survive regardless of the include content.
        assert!(out.contains_key("title"));
        assert!(out.contains_key("status"));
        assert!(out.contains_key("created_at"));
    }

    #[test]
    fn unknown_tokens_are_ignored_not_errors() {
        let detail = sample_post_detail();
        // "title" is always-emitted and "taggs" names nothing; neither
        // retains any optional field.
        let out = detail.render(&Include::parse(Some("title,taggs")));
        for field in PostDetail::OPTIONAL_FIELDS {
            assert!(!out.contains_key(*field));
        }
        assert!(out.contains_key("title"));
    }

    #[test]
    fn token_matching_is_case_sensitive() {
        let detail = sample_post_detail();
        let out = detail.render(&Include::parse(Some("User,TAGS")));
        assert!(!out.contains_key("user"));
        assert!(!out.contains_key("tags"));
    }

    #[test]
    fn duplicate_tokens_are_harmless() {
        let detail = sample_post_detail();
        let out = detail.render(&Include::parse(Some("user,user,user")));
        assert!(out.contains_key("user"));
        assert!(!out.contains_key("tags"));
    }

    #[test]
    fn noop_include_is_idempotent() {
        let detail = sample_post_detail();
        let default = detail.render(&Include::all());
        let explicit = detail.render(&Include::parse(Some("user,tags,comments")));
        assert_eq!(default, explicit);
    }

    #[test]
    fn nested_relations_render_their_full_default_fields() {
        let detail = sample_post_detail();
        let out = detail.render(&Include::all());

        let comments = out["comments"].as_array().unwrap();
        let comment = comments[0].as_object().unwrap();
        assert_eq!(
            field_names(comment),
            ["id", "text", "user", "post", "created_at", "updated_at"]
        );
        // The nested user keeps its own full rendering.
        let nested_user = comment["user"].as_object().unwrap();
        assert_eq!(
            field_names(nested_user),
            ["id", "username", "email", "first_name", "last_name"]
        );
    }

    #[test]
    fn user_detail_include_narrows_posts_and_comments() {
        let post_detail = sample_post_detail();
        let user = post_detail.author.clone();
        let comment = post_detail.comments[0].clone();
        let detail = UserDetail {
            user,
            posts: vec![post_detail],
            comments: vec![comment],
        };

        let full = detail.render(&Include::all());
        assert_eq!(
            field_names(&full),
            [
                "id",
                "username",
                "email",
                "first_name",
                "last_name",
                "posts",
                "comments"
            ]
        );
        // Nested posts are rendered with their own defaults, relations and all.
        let nested_post = full["posts"][0].as_object().unwrap();
        assert_eq!(field_names(nested_post), FULL_POST_FIELDS);

        let narrowed = detail.render(&Include::parse(Some("posts")));
        assert!(narrowed.contains_key("posts"));
        assert!(!narrowed.contains_key("comments"));
        assert!(narrowed.contains_key("username"));
        assert!(UserDetail::OPTIONAL_FIELDS.contains(&"posts"));
        assert!(UserDetail::OPTIONAL_FIELDS.contains(&"comments"));
    }
}
