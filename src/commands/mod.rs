//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module for separation of concerns.

pub mod admin;
pub mod migrate;
pub mod serve;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Open the configured database, optionally bringing the schema up to date first.
async fn open_database(config: &Config, apply_migrations: bool) -> AppResult<Database> {
    let connected = if apply_migrations {
        Database::connect(config).await
    } else {
        Database::connect_without_migrations(config).await
    };

    let db = connected
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    tracing::info!(apply_migrations, "Database connected");
    Ok(db)
}
