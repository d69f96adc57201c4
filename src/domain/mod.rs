//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod access;
pub mod password;
pub mod stats;
pub mod todo;
pub mod user;

pub use access::{Action, Decision, DenyReason, Principal, Resource};
pub use password::Password;
pub use stats::{GlobalStats, TodoStats, UserTodoStats};
pub use todo::{NewTodo, Todo, TodoPatch};
pub use user::{normalize_login, NewUser, User, UserResponse, UserRole};
