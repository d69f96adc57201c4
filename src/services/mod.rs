//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They reach storage only through the
//! Unit of Work so tests can substitute mock repositories.

mod access_gate;
mod auth_service;
pub mod container;
mod stats_service;
mod todo_service;
mod token;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Tokens and access control
pub use access_gate::AccessGate;
pub use token::{Claims, IssuedToken, TokenIssuer};

// Service traits and implementations
pub use auth_service::{AuthResponse, AuthService, Authenticator, Registration};
pub use stats_service::{StatsEngine, StatsService};
pub use todo_service::{TodoManager, TodoService};
pub use user_service::{UserManager, UserService};
