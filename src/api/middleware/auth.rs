//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::TOKEN_TYPE_BEARER;
use crate::errors::AppError;

/// Raw token from an `Authorization: Bearer <token>` header, if any.
///
/// The scheme name is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim_start();

    (scheme.eq_ignore_ascii_case(TOKEN_TYPE_BEARER) && !token.is_empty()).then_some(token)
}

/// JWT authentication middleware.
///
/// Verifies the bearer token, then injects the caller's `Principal` into
/// the request extensions. A missing or malformed header is
/// `Unauthenticated`; verification failures keep their own kind.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = state.gate.authenticate(bearer_token(request.headers()))?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
