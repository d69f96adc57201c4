//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Unit of Work for repository access
//! - Keep-alive pinger

pub mod db;
pub mod keepalive;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use keepalive::KeepAlive;
pub use repositories::{TodoRepository, TodoStore, UserRepository, UserStore};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockTodoRepository, MockUserRepository};
