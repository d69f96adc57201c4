//! Authentication handlers.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::auth_middleware;
use crate::api::AppState;
use crate::config::{MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};
use crate::domain::{Principal, UserResponse};
use crate::errors::AppResult;
use crate::services::{AuthResponse, Registration};
use crate::types::Created;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    /// Login name: letters, digits, `_`, `.` or `-`
    #[validate(custom(function = "validate_username"))]
    #[schema(example = "alice", min_length = 3, max_length = 32)]
    pub username: String,
    /// Optional email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    /// Display name, defaults to the username
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    #[schema(example = "Alice")]
    pub name: Option<String>,
    #[schema(example = "pw123", min_length = 5)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    /// Username, or the email address given at registration
    #[serde(alias = "email")]
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "pw123")]
    pub password: String,
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(ValidationError::new("username_length").with_message(
            format!(
                "Username must be {} to {} characters",
                MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
            )
            .into(),
        ));
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');
    if !username.chars().all(allowed) {
        return Err(ValidationError::new("username_charset").with_message(
            "Username may only contain letters, digits, '_', '.' and '-'".into(),
        ));
    }

    Ok(())
}

/// Create authentication routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/me",
            get(me).route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered and signed in", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthResponse>> {
    let response = state
        .auth_service
        .register(Registration {
            username: payload.username,
            email: payload.email,
            name: payload.name,
            password: payload.password,
        })
        .await?;

    Ok(Created(response))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(response))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<UserResponse>> {
    let user = state.auth_service.current_user(principal.id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.b-c_1").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username("alice@example.com").is_err());
    }

    #[test]
    fn test_login_accepts_email_alias() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"alice@example.com","password":"pw123"}"#).unwrap();
        assert_eq!(req.username, "alice@example.com");
    }

    #[test]
    fn test_register_rejects_unknown_fields() {
        let result: Result<RegisterRequest, _> = serde_json::from_str(
            r#"{"username":"alice","password":"pw123","role":"admin"}"#,
        );
        assert!(result.is_err());
    }
}
