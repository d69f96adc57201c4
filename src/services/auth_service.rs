//! Authentication service - registration and login.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{IssuedToken, TokenIssuer};
use crate::config::TOKEN_TYPE_BEARER;
use crate::domain::{normalize_login, NewUser, Password, User, UserResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Returned after successful registration or login
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    fn new(issued: IssuedToken, user: User) -> Self {
        Self {
            token: issued.token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: issued.expires_in,
            user: UserResponse::from(user),
        }
    }
}

/// Registration input, already shape-validated by the HTTP layer.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and sign them in
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse>;

    /// Exchange a username (or email) and password for a token
    async fn login(&self, identifier: String, password: String) -> AppResult<AuthResponse>;

    /// Load the account behind an authenticated principal
    async fn current_user(&self, id: Uuid) -> AppResult<User>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    issuer: Arc<TokenIssuer>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, issuer: Arc<TokenIssuer>) -> Self {
        Self { uow, issuer }
    }

    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        let identifier = normalize_login(identifier);
        if identifier.contains('@') {
            self.uow.users().find_by_email(&identifier).await
        } else {
            self.uow.users().find_by_username(&identifier).await
        }
    }
}

/// Run Argon2 hashing or verification on the blocking pool.
async fn off_runtime<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::internal(format!("Password task failed: {}", e)))?
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse> {
        let Registration {
            username,
            email,
            name,
            password,
        } = registration;

        // The display name keeps the casing the user typed
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| username.trim().to_string());
        let username = normalize_login(&username);
        let email = email.as_deref().map(normalize_login);

        let users = self.uow.users();
        if users.find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict("User"));
        }
        if let Some(email) = &email {
            if users.find_by_email(email).await?.is_some() {
                return Err(AppError::conflict("User"));
            }
        }

        let password_hash = off_runtime(move || Password::new(&password))
            .await?
            .into_string();

        let user = users
            .create(NewUser {
                username,
                email,
                name,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        let issued = self.issuer.issue(&user)?;
        Ok(AuthResponse::new(issued, user))
    }

    async fn login(&self, identifier: String, password: String) -> AppResult<AuthResponse> {
        let user = self.find_by_identifier(&identifier).await?;

        // Verify against a real hash even for unknown accounts so timing
        // does not reveal which usernames exist.
        let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
        let password_valid = off_runtime(move || {
            let stored = stored_hash.map_or_else(Password::dummy, Password::from_hash);
            Ok(stored.verify(&password))
        })
        .await?;

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::debug!("Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        tracing::info!(user_id = %user.id, "User logged in");

        let issued = self.issuer.issue(&user)?;
        Ok(AuthResponse::new(issued, user))
    }

    async fn current_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }
}
