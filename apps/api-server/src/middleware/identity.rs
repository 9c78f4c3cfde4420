//! Caller identity extractor.
//!
//! Authentication itself happens upstream: an external identity layer
//! (gateway or auth proxy) authenticates the caller and injects the
//! resulting principal as the `X-User-Id` header. Handlers that stamp
//! ownership take `Identity` as an argument; requests without a valid
//! header are rejected before the handler runs.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use uuid::Uuid;

use super::error::AppError;

/// Header carrying the authenticated caller id.
pub static USER_ID_HEADER: &str = "X-User-Id";

/// Authenticated caller identity.
///
/// Use this in handlers that need to know who is calling:
/// ```ignore
/// async fn create(identity: Identity, ...) -> AppResult<HttpResponse> {
///     let post = Post::new(identity.user_id, ...);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok());

        match user_id {
            Some(user_id) => ready(Ok(Identity { user_id })),
            None => ready(Err(AppError::Unauthorized)),
        }
    }
}
