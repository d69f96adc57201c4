//! Service Container - Centralized service access.
//!
//! Handlers and commands depend on service traits, never on the concrete
//! implementations wired up here.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, StatsEngine, StatsService, TodoManager, TodoService, TokenIssuer,
    UserManager, UserService,
};
use crate::infra::{Persistence, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get todo service
    fn todos(&self) -> Arc<dyn TodoService>;

    /// Get statistics service
    fn stats(&self) -> Arc<dyn StatsService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    todo_service: Arc<dyn TodoService>,
    stats_service: Arc<dyn StatsService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Wire every service onto one shared unit of work
    pub fn from_uow<U: UnitOfWork + 'static>(uow: Arc<U>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), issuer)),
            todo_service: Arc::new(TodoManager::new(uow.clone())),
            stats_service: Arc::new(StatsEngine::new(uow.clone())),
            user_service: Arc::new(UserManager::new(uow)),
        }
    }

    /// Create service container from a database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection, issuer: Arc<TokenIssuer>) -> Self {
        Self::from_uow(Arc::new(Persistence::new(db)), issuer)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn todos(&self) -> Arc<dyn TodoService> {
        self.todo_service.clone()
    }

    fn stats(&self) -> Arc<dyn StatsService> {
        self.stats_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
