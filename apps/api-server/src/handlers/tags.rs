//! Tag handlers.

use actix_web::{HttpResponse, web};
use serde_json::{Map, Value};
use uuid::Uuid;

use quill_core::domain::Tag;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, TagRepository};
use quill_core::render::render_tag;
use quill_shared::dto::{CreateTagRequest, UpdateTagRequest};

use super::validate_not_blank;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn duplicate_name() -> AppError {
    AppError::field("name", "A tag with this name already exists.")
}

/// Reject a name already taken under case-insensitive comparison.
/// `exclude` skips the tag being updated so it can keep its own name.
async fn ensure_name_available(
    state: &AppState,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(existing) = state.tags.find_by_name_ci(name).await? {
        if exclude != Some(existing.id) {
            return Err(duplicate_name());
        }
    }
    Ok(())
}

/// GET /api/tags
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.list().await?;

    let body: Vec<Map<String, Value>> = tags.iter().map(render_tag).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/tags
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateTagRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_not_blank("name", &req.name)?;
    ensure_name_available(&state, &req.name, None).await?;

    // The existence check above is not atomic with the insert; the store's
    // unique index on lower(name) closes that race, and its violation maps
    // to the same field error.
    let tag = state
        .tags
        .insert(Tag::new(req.name))
        .await
        .map_err(|e| match e {
            RepoError::Constraint(_) => duplicate_name(),
            other => other.into(),
        })?;

    Ok(HttpResponse::Created().json(render_tag(&tag)))
}

/// GET /api/tags/{id}
pub async fn retrieve(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let tag = state
        .tags
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {id} not found")))?;

    Ok(HttpResponse::Ok().json(render_tag(&tag)))
}

/// PUT/PATCH /api/tags/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTagRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let mut tag = state
        .tags
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {id} not found")))?;

    if let Some(name) = req.name {
        validate_not_blank("name", &name)?;
        ensure_name_available(&state, &name, Some(id)).await?;
        tag.name = name;
    }

    let tag = state.tags.update(tag).await.map_err(|e| match e {
        RepoError::Constraint(_) => duplicate_name(),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(render_tag(&tag)))
}

/// DELETE /api/tags/{id}
///
/// Detaches the tag from all posts; the posts themselves are untouched.
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    state.tags.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
