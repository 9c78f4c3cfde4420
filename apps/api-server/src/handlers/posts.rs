//! Post handlers.

use actix_web::{HttpResponse, web};
use serde_json::{Map, Value};
use uuid::Uuid;

use quill_core::domain::{Post, PostStatus};
use quill_core::filter::PostQuery;
use quill_core::ports::{BaseRepository, PostRepository};
use quill_core::render::Include;
use quill_shared::dto::{CreatePostRequest, UpdatePostRequest};

use super::validate_not_blank;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::identity::Identity;
use crate::middleware::include::IncludeParam;
use crate::state::AppState;

fn parse_status(raw: Option<&str>) -> Result<PostStatus, AppError> {
    match raw {
        None => Ok(PostStatus::default()),
        Some(raw) => PostStatus::parse(raw)
            .ok_or_else(|| AppError::field("status", &format!("\"{raw}\" is not a valid choice."))),
    }
}

async fn render_detail(
    state: &AppState,
    id: Uuid,
    include: &Include,
) -> Result<Map<String, Value>, AppError> {
    let detail = state
        .posts
        .find_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

    Ok(detail.render(include))
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PostQuery>,
    include: IncludeParam,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_detail(&query).await?;

    let body: Vec<Map<String, Value>> = posts.iter().map(|post| post.render(&include.0)).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/posts
///
/// The owner is always the authenticated caller; any owner value in the
/// payload is discarded.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_not_blank("title", &req.title)?;
    validate_not_blank("content", &req.content)?;
    let status = parse_status(req.status.as_deref())?;

    let post = Post::new(identity.user_id, req.title, req.content, status);
    let post = state.posts.insert(post).await?;

    let rendered = render_detail(&state, post.id, &Include::all()).await?;
    Ok(HttpResponse::Created().json(rendered))
}

/// GET /api/posts/{id}
pub async fn retrieve(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    include: IncludeParam,
) -> AppResult<HttpResponse> {
    let rendered = render_detail(&state, path.into_inner(), &include.0).await?;
    Ok(HttpResponse::Ok().json(rendered))
}

/// PUT/PATCH /api/posts/{id}
///
/// Partial update: absent fields are left unchanged. `created_at` is
/// immutable; `updated_at` is refreshed.
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

    if let Some(title) = req.title {
        validate_not_blank("title", &title)?;
        post.title = title;
    }
    if let Some(content) = req.content {
        validate_not_blank("content", &content)?;
        post.content = content;
    }
    if let Some(status) = req.status.as_deref() {
        post.status = parse_status(Some(status))?;
    }
    post.touch();

    state.posts.update(post).await?;

    let rendered = render_detail(&state, id, &Include::all()).await?;
    Ok(HttpResponse::Ok().json(rendered))
}

/// DELETE /api/posts/{id}
///
/// Cascades to the post's comments; attached tags survive.
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
