//! Todo API - multi-user todo service
//!
//! Users register and log in for a signed session token, manage their own
//! todos, and admins read completion statistics across every user.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities, access rules and statistics types
//! - **services**: Tokens, access gate and application use cases
//! - **infra**: Database, repositories and the keep-alive pinger
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Grant the admin role
//! cargo run -- admin promote alice
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Principal, Todo, User, UserRole};
pub use errors::{AppError, AppResult};
