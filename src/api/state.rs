//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AccessGate, AuthService, ServiceContainer, Services, StatsService, TodoService, TokenIssuer,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Todo service
    pub todo_service: Arc<dyn TodoService>,
    /// Statistics service
    pub stats_service: Arc<dyn StatsService>,
    /// Bearer token authentication and access rules
    pub gate: Arc<AccessGate>,
    /// Database connection
    pub database: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from database connection and config.
    ///
    /// The gate and the auth service share one token issuer, so tokens
    /// issued at login verify in the middleware.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let issuer = Arc::new(TokenIssuer::from_config(&config));
        let container = Services::from_connection(database.get_connection(), issuer.clone());
        Self::new(&container, AccessGate::new(issuer), database, config)
    }

    /// Create application state from an already wired service container.
    pub fn new(
        services: &impl ServiceContainer,
        gate: AccessGate,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            todo_service: services.todos(),
            stats_service: services.stats(),
            gate: Arc::new(gate),
            database,
            config: Arc::new(config),
        }
    }
}
