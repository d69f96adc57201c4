//! Unit of Work - centralized repository access.
//!
//! Services reach every repository through this trait, so tests can swap
//! in mock repositories without touching a database. Each repository call
//! is atomic on its own; no operation here spans several records.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{TodoRepository, TodoStore, UserRepository, UserStore};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get todo repository
    fn todos(&self) -> Arc<dyn TodoRepository>;
}

/// SeaORM-backed UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    todo_repo: Arc<TodoStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            todo_repo: Arc::new(TodoStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn todos(&self) -> Arc<dyn TodoRepository> {
        self.todo_repo.clone()
    }
}
