//! Todo service - ownership-checked todo management.
//!
//! Every operation on an existing todo loads it first, runs the access
//! rule against its owner, and only then reads or writes.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Action, NewTodo, Principal, Resource, Todo, TodoPatch};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Todo service trait for dependency injection.
#[async_trait]
pub trait TodoService: Send + Sync {
    /// Todos owned by `owner_id`, defaulting to the caller
    async fn list(&self, principal: &Principal, owner_id: Option<Uuid>) -> AppResult<Vec<Todo>>;

    /// Single todo by ID
    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Todo>;

    /// Create a todo owned by the caller
    async fn create(
        &self,
        principal: &Principal,
        title: String,
        description: Option<String>,
    ) -> AppResult<Todo>;

    /// Patch title, description and/or completion
    async fn update(&self, principal: &Principal, id: Uuid, patch: TodoPatch) -> AppResult<Todo>;

    /// Delete a todo
    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of TodoService using Unit of Work.
pub struct TodoManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TodoManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Load a todo and check `action` against its owner.
    async fn load_authorized(&self, principal: &Principal, id: Uuid, action: Action) -> AppResult<Todo> {
        let todo = self.uow.todos().find_by_id(id).await?.ok_or_not_found()?;
        principal.require(action, Resource::OwnedBy(todo.owner_id))?;
        Ok(todo)
    }
}

#[async_trait]
impl<U: UnitOfWork> TodoService for TodoManager<U> {
    async fn list(&self, principal: &Principal, owner_id: Option<Uuid>) -> AppResult<Vec<Todo>> {
        let owner_id = owner_id.unwrap_or(principal.id);
        principal.require(Action::Read, Resource::OwnedBy(owner_id))?;
        self.uow.todos().list_by_owner(owner_id).await
    }

    async fn get(&self, principal: &Principal, id: Uuid) -> AppResult<Todo> {
        self.load_authorized(principal, id, Action::Read).await
    }

    async fn create(
        &self,
        principal: &Principal,
        title: String,
        description: Option<String>,
    ) -> AppResult<Todo> {
        let new_todo = NewTodo::new(principal.id, &title, description)?;
        let todo = self.uow.todos().create(new_todo).await?;
        tracing::debug!(todo_id = %todo.id, user_id = %principal.id, "Todo created");
        Ok(todo)
    }

    async fn update(&self, principal: &Principal, id: Uuid, patch: TodoPatch) -> AppResult<Todo> {
        self.load_authorized(principal, id, Action::Update).await?;
        let todo = self.uow.todos().update(id, patch).await?;
        tracing::debug!(todo_id = %id, user_id = %principal.id, completed = todo.completed, "Todo updated");
        Ok(todo)
    }

    async fn delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        self.load_authorized(principal, id, Action::Delete).await?;
        self.uow.todos().delete(id).await?;
        tracing::debug!(todo_id = %id, user_id = %principal.id, "Todo deleted");
        Ok(())
    }
}
