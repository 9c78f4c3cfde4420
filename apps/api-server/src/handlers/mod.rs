//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod tags;
mod users;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
///
/// The users resource is read-only: its scope registers GET handlers first
/// and answers every other method with 405.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::retrieve))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::patch().to(posts::update))
                    .route("/{id}", web::delete().to(posts::destroy)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list))
                    .route("", web::route().to(users::method_not_allowed))
                    .route("/{id}", web::get().to(users::retrieve))
                    .route("/{id}", web::route().to(users::method_not_allowed)),
            )
            .service(
                web::scope("/tags")
                    .route("", web::get().to(tags::list))
                    .route("", web::post().to(tags::create))
                    .route("/{id}", web::get().to(tags::retrieve))
                    .route("/{id}", web::put().to(tags::update))
                    .route("/{id}", web::patch().to(tags::update))
                    .route("/{id}", web::delete().to(tags::destroy)),
            )
            .service(
                web::scope("/comments")
                    .route("", web::get().to(comments::list))
                    .route("", web::post().to(comments::create))
                    .route("/{id}", web::get().to(comments::retrieve))
                    .route("/{id}", web::put().to(comments::update))
                    .route("/{id}", web::patch().to(comments::update))
                    .route("/{id}", web::delete().to(comments::destroy)),
            ),
    );
}

/// Reject blank required text fields with the standard field-level message.
pub(crate) fn validate_not_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::field(field, "This field may not be blank."));
    }
    Ok(())
}
