//! Todo and statistics handlers.
//!
//! All routes here sit behind the JWT middleware, so a `Principal` is
//! always present in the request extensions.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{ApiPath, ApiQuery, ValidatedJson};
use crate::api::AppState;
use crate::domain::{Action, GlobalStats, Principal, Resource, Todo, TodoPatch, TodoStats};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Create todo request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoRequest {
    /// Required, non-blank
    #[schema(example = "Buy milk", max_length = 200)]
    pub title: String,
    /// Rich-text body, stored as-is
    #[schema(example = "<p>Semi-skimmed</p>")]
    pub description: Option<String>,
}

/// Update todo request. At least one field must be present.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateTodoRequest {
    #[schema(example = "Buy oat milk")]
    pub title: Option<String>,
    /// An empty string clears the description
    pub description: Option<String>,
    #[schema(example = true)]
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[into_params(parameter_in = Query)]
pub struct ListTodosQuery {
    /// Owner whose todos to list (admins only, defaults to the caller)
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// User whose todos to count (admins only, defaults to the caller)
    pub user_id: Option<Uuid>,
}

/// Create todo routes (protected)
pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/stats", get(get_stats))
        .route("/admin/users", get(get_global_stats))
        .route(
            "/:id",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
}

/// List todos
#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "Todos",
    security(("bearer_auth" = [])),
    params(ListTodosQuery),
    responses(
        (status = 200, description = "Todos, oldest first", body = Vec<Todo>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiQuery(query): ApiQuery<ListTodosQuery>,
) -> AppResult<Json<Vec<Todo>>> {
    let todos = state.todo_service.list(&principal, query.owner_id).await?;
    Ok(Json(todos))
}

/// Create a todo owned by the caller
#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "Todos",
    security(("bearer_auth" = [])),
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<CreateTodoRequest>,
) -> AppResult<Created<Todo>> {
    let todo = state
        .todo_service
        .create(&principal, payload.title, payload.description)
        .await?;

    Ok(Created(todo))
}

/// Get a todo by ID
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    tag = "Todos",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = Todo),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Todo not found")
    )
)]
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Todo>> {
    let todo = state.todo_service.get(&principal, id).await?;
    Ok(Json(todo))
}

/// Update a todo
#[utoipa::path(
    patch,
    path = "/api/todos/{id}",
    tag = "Todos",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = Todo),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Todo not found")
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTodoRequest>,
) -> AppResult<Json<Todo>> {
    let patch = TodoPatch::new(
        payload.title.as_deref(),
        payload.description,
        payload.completed,
    )?;
    let todo = state.todo_service.update(&principal, id, patch).await?;
    Ok(Json(todo))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "Todos",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Todo not found")
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<NoContent> {
    state.todo_service.delete(&principal, id).await?;
    Ok(NoContent)
}

/// Completion counts for one user's todos
#[utoipa::path(
    get,
    path = "/api/todos/stats",
    tag = "Statistics",
    security(("bearer_auth" = [])),
    params(StatsQuery),
    responses(
        (status = 200, description = "Todo counts", body = TodoStats),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner")
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> AppResult<Json<TodoStats>> {
    let user_id = query.user_id.unwrap_or(principal.id);
    principal.require(Action::Read, Resource::OwnedBy(user_id))?;

    let stats = state.stats_service.stats_for_user(user_id).await?;
    Ok(Json(stats))
}

/// Per-user todo counts across all users (admin only)
#[utoipa::path(
    get,
    path = "/api/todos/admin/users",
    tag = "Statistics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Global statistics", body = GlobalStats),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn get_global_stats(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<GlobalStats>> {
    principal.require(Action::ReadGlobalStats, Resource::AllUsers)?;

    let stats = state.stats_service.stats_global().await?;
    Ok(Json(stats))
}
