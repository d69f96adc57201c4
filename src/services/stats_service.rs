//! Statistics service - per-user and global todo counts.
//!
//! Trusts its caller to have authorized the request.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{GlobalStats, TodoStats, UserTodoStats};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[async_trait]
pub trait StatsService: Send + Sync {
    /// Counts for the todos owned by `user_id`
    async fn stats_for_user(&self, user_id: Uuid) -> AppResult<TodoStats>;

    /// Counts for every user, including users with no todos
    async fn stats_global(&self) -> AppResult<GlobalStats>;
}

pub struct StatsEngine<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> StatsEngine<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> StatsService for StatsEngine<U> {
    async fn stats_for_user(&self, user_id: Uuid) -> AppResult<TodoStats> {
        self.uow.todos().stats_for_owner(user_id).await
    }

    async fn stats_global(&self) -> AppResult<GlobalStats> {
        let (user_repo, todo_repo) = (self.uow.users(), self.uow.todos());
        let (users, counts) = tokio::try_join!(user_repo.list(), todo_repo.stats_by_owner())?;

        let users: Vec<UserTodoStats> = users
            .into_iter()
            .map(|user| {
                let stats = counts.get(&user.id).copied().unwrap_or_default();
                UserTodoStats {
                    user_id: user.id,
                    name: user.name,
                    email: user.email,
                    total_todos: stats.total,
                    completed: stats.completed,
                    pending: stats.pending,
                }
            })
            .collect();

        Ok(GlobalStats {
            total_users: users.len() as u64,
            total_todos: users.iter().map(|u| u.total_todos).sum(),
            users,
        })
    }
}
