//! HTTP-surface tests running the full route table against the in-memory
//! store.

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, PostStatus, Tag, User};
use quill_core::ports::{BaseRepository, PostRepository};

use crate::middleware::identity::USER_ID_HEADER;
use crate::state::AppState;

// The service type returned by `init_service` is unnameable; a macro keeps
// the per-test boilerplate down.
macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(super::configure_routes),
        )
        .await
    };
}

async fn seed_user(state: &AppState, username: &str) -> User {
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        first_name: String::new(),
        last_name: String::new(),
    };
    state.users.insert(user).await.unwrap()
}

async fn seed_post(state: &AppState, user: &User, title: &str, status: PostStatus) -> Post {
    let post = Post::new(user.id, title.to_owned(), "Content".to_owned(), status);
    state.posts.insert(post).await.unwrap()
}

fn field_names(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("expected a JSON object")
        .keys()
        .map(String::as_str)
        .collect()
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

#[actix_web::test]
async fn create_post_stamps_owner_ignoring_payload_user() {
    let state = AppState::in_memory();
    let caller = seed_user(&state, "creator").await;
    let other = seed_user(&state, "viewer").await;
    let app = init_app!(state);

    // The payload names another user; it must be ignored.
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((USER_ID_HEADER, caller.id.to_string()))
        .set_json(json!({
            "title": "New Post",
            "content": "Body",
            "user": other.id,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["user"]["id"], json!(caller.id));

    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    let stored = state.posts.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.user_id, caller.id);
}

#[actix_web::test]
async fn create_post_without_identity_is_unauthorized() {
    let state = AppState::in_memory();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_post_defaults_to_draft() {
    let state = AppState::in_memory();
    let caller = seed_user(&state, "creator").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((USER_ID_HEADER, caller.id.to_string()))
        .set_json(json!({"title": "Untitled", "content": "C"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("draft"));
}

#[actix_web::test]
async fn create_post_rejects_unknown_status() {
    let state = AppState::in_memory();
    let caller = seed_user(&state, "creator").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((USER_ID_HEADER, caller.id.to_string()))
        .set_json(json!({"title": "T", "content": "C", "status": "pending"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"status": ["\"pending\" is not a valid choice."]}));
}

#[actix_web::test]
async fn retrieve_post_renders_full_field_set_by_default() {
    let state = AppState::in_memory();
    let user = seed_user(&state, "reader").await;
    let post = seed_post(&state, &user, "Test Post", PostStatus::Published).await;
    let app = init_app!(state);

    for uri in [
        format!("/api/posts/{}", post.id),
        format!("/api/posts/{}?include=", post.id),
        format!("/api/posts/{}?include=+,+", post.id),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(field_names(&body), FULL_POST_FIELDS, "uri={uri}");
    }
}

#[actix_web::test]
async fn include_narrows_optional_fields_only() {
    let state = AppState::in_memory();
    let user = seed_user(&state, "reader").await;
    let post = seed_post(&state, &user, "Test Post", PostStatus::Published).await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}?include=user,tags", post.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let fields = field_names(&body);
    assert!(fields.contains(&"user"));
    assert!(fields.contains(&"tags"));
    assert!(!fields.contains(&"comments"));
    assert!(fields.contains(&"title"));
}

#[actix_web::test]
async fn noop_include_matches_default_rendering() {
    let state = AppState::in_memory();
    let user = seed_user(&state, "reader").await;
    let post = seed_post(&state, &user, "Test Post", PostStatus::Draft).await;
    let app = init_app!(state);

    let default_req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post.id))
        .to_request();
    let default_body: Value = test::call_and_read_body_json(&app, default_req).await;

    let explicit_req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}?include=user,tags,comments", post.id))
        .to_request();
    let explicit_body: Value = test::call_and_read_body_json(&app, explicit_req).await;

    assert_eq!(default_body, explicit_body);
}

#[actix_web::test]
async fn list_posts_filters_by_exact_status() {
    let state = AppState::in_memory();
    let user = seed_user(&state, "filer").await;
    seed_post(&state, &user, "Published Post", PostStatus::Published).await;
    seed_post(&state, &user, "Draft Post", PostStatus::Draft).await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/posts?status=published")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], json!("Published Post"));

    // An unrecognized status matches nothing; it is not an error.
    let req = test::TestRequest::get()
        .uri("/api/posts?status=pending")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!([]));

    // No filter passes everything through.
    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn users_resource_is_read_only() {
    let state = AppState::in_memory();
    let user = seed_user(&state, "creator").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({"username": "newuser"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}", user.id))
        .set_json(json!({"username": "renamed"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users/{}", user.id))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", user.id))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["username"], json!("creator"));
}

#[actix_web::test]
async fn user_detail_supports_include() {
    let state = AppState::in_memory();
    let user = seed_user(&state, "author").await;
    seed_post(&state, &user, "Their Post", PostStatus::Published).await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}?include=posts", user.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let fields = field_names(&body);
    assert!(fields.contains(&"posts"));
    assert!(!fields.contains(&"comments"));
    assert_eq!(body["posts"][0]["title"], json!("Their Post"));
    // The nested post carries its full default field set.
    assert_eq!(field_names(&body["posts"][0]), FULL_POST_FIELDS);
}

#[actix_web::test]
async fn duplicate_tag_name_is_rejected_case_insensitively() {
    let state = AppState::in_memory();
    state
        .tags
        .insert(Tag::new("existing tag".to_owned()))
        .await
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/tags")
        .set_json(json!({"name": "Existing Tag"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"name": ["A tag with this name already exists."]}));

    // Nothing was persisted.
    let tags = state.tags.list().await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "existing tag");
}

#[actix_web::test]
async fn tag_update_may_keep_its_own_name() {
    let state = AppState::in_memory();
    let tag = state
        .tags
        .insert(Tag::new("rust".to_owned()))
        .await
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/tags/{}", tag.id))
        .set_json(json!({"name": "Rust"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], json!("Rust"));
}

#[actix_web::test]
async fn deleting_a_post_cascades_comments_and_spares_tags() {
    let state = AppState::in_memory();
    let user = seed_user(&state, "creator").await;
    let post = seed_post(&state, &user, "Doomed Post", PostStatus::Published).await;
    let tag = state
        .tags
        .insert(Tag::new("keepme".to_owned()))
        .await
        .unwrap();
    state.posts.set_tags(post.id, &[tag.id]).await.unwrap();
    state
        .comments
        .insert(Comment::new(user.id, post.id, "Great post!".to_owned()))
        .await
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{}", post.id))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    assert!(state.comments.list().await.unwrap().is_empty());
    assert_eq!(state.tags.list().await.unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post.id))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn comment_create_stamps_author_and_checks_post() {
    let state = AppState::in_memory();
    let caller = seed_user(&state, "commenter").await;
    let author = seed_user(&state, "author").await;
    let post = seed_post(&state, &author, "A Post", PostStatus::Published).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header((USER_ID_HEADER, caller.id.to_string()))
        .set_json(json!({"text": "Nice one", "post": post.id, "user": author.id}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["user"]["id"], json!(caller.id));
    assert_eq!(body["post"], json!(post.id));

    // A comment on a nonexistent post is a field-level error.
    let missing = Uuid::new_v4();
    let req = test::TestRequest::post()
        .uri("/api/comments")
        .insert_header((USER_ID_HEADER, caller.id.to_string()))
        .set_json(json!({"text": "Orphan", "post": missing}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"post": [format!("Invalid pk \"{missing}\" - object does not exist.")]})
    );
}

#[actix_web::test]
async fn update_post_preserves_created_at_and_refreshes_updated_at() {
    let state = AppState::in_memory();
    let user = seed_user(&state, "editor").await;
    let post = seed_post(&state, &user, "Before", PostStatus::Draft).await;
    let app = init_app!(state);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/posts/{}", post.id))
        .set_json(json!({"title": "After", "status": "published"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["title"], json!("After"));
    assert_eq!(body["status"], json!("published"));
    assert_eq!(body["created_at"], json!(post.created_at));

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.created_at, post.created_at);
    assert!(stored.updated_at >= post.updated_at);
}

#[actix_web::test]
async fn missing_post_is_not_found() {
    let state = AppState::in_memory();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", Uuid::new_v4()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn blank_title_is_a_field_error() {
    let state = AppState::in_memory();
    let caller = seed_user(&state, "creator").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((USER_ID_HEADER, caller.id.to_string()))
        .set_json(json!({"title": "   ", "content": "C"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"title": ["This field may not be blank."]}));
}
