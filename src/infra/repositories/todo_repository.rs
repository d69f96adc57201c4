//! Todo repository - persisted todos and their per-owner counts.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::todo::{self, ActiveModel, Entity as TodoEntity};
use crate::domain::{NewTodo, Todo, TodoPatch, TodoStats};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Todo repository trait for dependency injection.
///
/// Performs no access checks; callers authorize first.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Find todo by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Todo>>;

    /// Todos owned by `owner_id`, oldest first
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Todo>>;

    /// Persist a new, not yet completed todo
    async fn create(&self, todo: NewTodo) -> AppResult<Todo>;

    /// Apply a patch. Fails with `NotFound` if absent.
    async fn update(&self, id: Uuid, patch: TodoPatch) -> AppResult<Todo>;

    /// Delete by ID. Fails with `NotFound` if absent.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Completion counts for one owner
    async fn stats_for_owner(&self, owner_id: Uuid) -> AppResult<TodoStats>;

    /// Completion counts keyed by owner; owners without todos are absent
    async fn stats_by_owner(&self) -> AppResult<HashMap<Uuid, TodoStats>>;
}

/// SeaORM-backed todo repository
pub struct TodoStore {
    db: DatabaseConnection,
}

impl TodoStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// `(owner_id, count)` pairs, optionally restricted to one completion state.
    async fn count_grouped(&self, completed: Option<bool>) -> AppResult<Vec<(Uuid, i64)>> {
        let mut query = TodoEntity::find()
            .select_only()
            .column(todo::Column::OwnerId)
            .column_as(todo::Column::Id.count(), "count")
            .group_by(todo::Column::OwnerId);

        if let Some(completed) = completed {
            query = query.filter(todo::Column::Completed.eq(completed));
        }

        Ok(query.into_tuple::<(Uuid, i64)>().all(&self.db).await?)
    }
}

#[async_trait]
impl TodoRepository for TodoStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Todo>> {
        let result = TodoEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Todo::from))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Todo>> {
        let models = TodoEntity::find()
            .filter(todo::Column::OwnerId.eq(owner_id))
            .order_by_asc(todo::Column::CreatedAt)
            .order_by_asc(todo::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Todo::from).collect())
    }

    async fn create(&self, todo: NewTodo) -> AppResult<Todo> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(todo.owner_id),
            title: Set(todo.title),
            description: Set(todo.description),
            completed: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Todo::from(model))
    }

    async fn update(&self, id: Uuid, patch: TodoPatch) -> AppResult<Todo> {
        let existing = TodoEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();

        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(completed) = patch.completed {
            active.completed = Set(completed);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Todo::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = TodoEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn stats_for_owner(&self, owner_id: Uuid) -> AppResult<TodoStats> {
        let total = TodoEntity::find()
            .filter(todo::Column::OwnerId.eq(owner_id))
            .count(&self.db)
            .await?;
        let completed = TodoEntity::find()
            .filter(todo::Column::OwnerId.eq(owner_id))
            .filter(todo::Column::Completed.eq(true))
            .count(&self.db)
            .await?;

        Ok(TodoStats::new(total, completed))
    }

    async fn stats_by_owner(&self) -> AppResult<HashMap<Uuid, TodoStats>> {
        let totals = self.count_grouped(None).await?;
        let completed: HashMap<Uuid, i64> = self.count_grouped(Some(true)).await?.into_iter().collect();

        Ok(totals
            .into_iter()
            .map(|(owner_id, total)| {
                let done = completed.get(&owner_id).copied().unwrap_or(0);
                (owner_id, TodoStats::new(to_count(total), to_count(done)))
            })
            .collect())
    }
}

fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}
