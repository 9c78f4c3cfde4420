//! Comment handlers.

use actix_web::{HttpResponse, web};
use serde_json::{Map, Value};
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_core::ports::{BaseRepository, CommentRepository};
use quill_shared::dto::{CreateCommentRequest, UpdateCommentRequest};

use super::validate_not_blank;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::identity::Identity;
use crate::state::AppState;

/// Reject a comment pointing at a post that does not exist.
async fn ensure_post_exists(state: &AppState, post_id: Uuid) -> Result<(), AppError> {
    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(AppError::field(
            "post",
            &format!("Invalid pk \"{post_id}\" - object does not exist."),
        ));
    }
    Ok(())
}

async fn render_detail(state: &AppState, id: Uuid) -> Result<Map<String, Value>, AppError> {
    let detail = state
        .comments
        .find_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {id} not found")))?;

    Ok(detail.render())
}

/// GET /api/comments
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let comments = state.comments.list_detail().await?;

    let body: Vec<Map<String, Value>> = comments
        .iter()
        .map(|comment| comment.render())
        .collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/comments
///
/// The author is always the authenticated caller; any author value in the
/// payload is discarded.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_not_blank("text", &req.text)?;
    ensure_post_exists(&state, req.post).await?;

    let comment = Comment::new(identity.user_id, req.post, req.text);
    let comment = state.comments.insert(comment).await?;

    let rendered = render_detail(&state, comment.id).await?;
    Ok(HttpResponse::Created().json(rendered))
}

/// GET /api/comments/{id}
pub async fn retrieve(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let rendered = render_detail(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rendered))
}

/// PUT/PATCH /api/comments/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let mut comment = state
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {id} not found")))?;

    if let Some(text) = req.text {
        validate_not_blank("text", &text)?;
        comment.text = text;
    }
    if let Some(post_id) = req.post {
        ensure_post_exists(&state, post_id).await?;
        comment.post_id = post_id;
    }
    comment.touch();

    state.comments.update(comment).await?;

    let rendered = render_detail(&state, id).await?;
    Ok(HttpResponse::Ok().json(rendered))
}

/// DELETE /api/comments/{id}
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    state.comments.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
