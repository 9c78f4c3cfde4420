//! `include` query parameter extractor.
//!
//! Pulls the raw `include` value off the query string and parses it into an
//! [`Include`] selection. Only the handlers of include-aware resources take
//! this extractor; the others never look at the parameter.

use std::collections::HashMap;
use std::future::{Ready, ready};

use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web};

use quill_core::render::Include;

/// Extractor wrapping the parsed field selection for this request.
#[derive(Debug, Clone, Default)]
pub struct IncludeParam(pub Include);

impl FromRequest for IncludeParam {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .ok()
            .and_then(|query| query.into_inner().remove("include"));

        ready(Ok(IncludeParam(Include::parse(raw.as_deref()))))
    }
}
