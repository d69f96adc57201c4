//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, todo_handler};
use crate::domain::{GlobalStats, Todo, TodoStats, UserResponse, UserRole, UserTodoStats};
use crate::services::AuthResponse;

/// OpenAPI documentation for the todo API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "Multi-user todo service with JWT authentication and admin statistics"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        // Todo endpoints
        todo_handler::list_todos,
        todo_handler::create_todo,
        todo_handler::get_todo,
        todo_handler::update_todo,
        todo_handler::delete_todo,
        // Statistics endpoints
        todo_handler::get_stats,
        todo_handler::get_global_stats,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            Todo,
            TodoStats,
            UserTodoStats,
            GlobalStats,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            AuthResponse,
            // Todo handler types
            todo_handler::CreateTodoRequest,
            todo_handler::UpdateTodoRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and current user"),
        (name = "Todos", description = "Todo management, owner or admin only"),
        (name = "Statistics", description = "Completion counts per user and across users")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
