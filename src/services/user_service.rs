//! User service - administrative account operations.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{normalize_login, User, UserRole};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Find a user by username
    async fn get_by_username(&self, username: &str) -> AppResult<User>;

    /// Change a user's role. This is the only way a role ever changes.
    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_by_username(&self, username: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_username(&normalize_login(username))
            .await?
            .ok_or_not_found()
    }

    async fn set_role(&self, username: &str, role: UserRole) -> AppResult<User> {
        let user = self.get_by_username(username).await?;
        if user.role == role {
            return Ok(user);
        }

        let updated = self.uow.users().update_role(user.id, role).await?;
        tracing::info!(user_id = %updated.id, role = %role, "User role changed");
        Ok(updated)
    }
}
