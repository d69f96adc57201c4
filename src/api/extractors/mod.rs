//! Custom request extractors.
//!
//! Every rejection is turned into an `AppError` so malformed input gets
//! the same error body as any other validation failure.

mod validated_json;

use axum::extract::FromRequestParts;

use crate::errors::AppError;

pub use validated_json::ValidatedJson;

/// `Path` whose rejection is a `ValidationError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection is a `ValidationError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
