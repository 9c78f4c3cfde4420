//! User handlers.
//!
//! The users resource is read-only here: accounts are managed by the
//! external identity subsystem. Any write attempt answers 405.

use actix_web::{HttpResponse, web};
use serde_json::{Map, Value};
use uuid::Uuid;

use quill_core::ports::UserRepository;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::include::IncludeParam;
use crate::state::AppState;

/// GET /api/users
pub async fn list(state: web::Data<AppState>, include: IncludeParam) -> AppResult<HttpResponse> {
    let users = state.users.list_detail().await?;

    let body: Vec<Map<String, Value>> = users.iter().map(|user| user.render(&include.0)).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/users/{id}
pub async fn retrieve(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    include: IncludeParam,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let detail = state
        .users
        .find_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    Ok(HttpResponse::Ok().json(detail.render(&include.0)))
}

/// Catch-all for write attempts on the read-only resource.
pub async fn method_not_allowed() -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed)
}
