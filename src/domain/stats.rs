//! Todo statistics value types.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Completion counts for a set of todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct TodoStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

impl TodoStats {
    /// `pending` is derived; `completed` is clamped to `total`.
    pub fn new(total: u64, completed: u64) -> Self {
        let completed = completed.min(total);
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }
}

/// Per-user row of the global statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserTodoStats {
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub total_todos: u64,
    pub completed: u64,
    pub pending: u64,
}

/// Statistics across every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_users: u64,
    pub total_todos: u64,
    pub users: Vec<UserTodoStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_is_derived() {
        let stats = TodoStats::new(5, 2);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.total, stats.completed + stats.pending);
    }

    #[test]
    fn test_completed_never_exceeds_total() {
        let stats = TodoStats::new(1, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn test_global_stats_json_shape() {
        let stats = GlobalStats {
            total_users: 1,
            total_todos: 0,
            users: vec![UserTodoStats {
                user_id: Uuid::nil(),
                name: "alice".to_string(),
                email: None,
                total_todos: 0,
                completed: 0,
                pending: 0,
            }],
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalUsers"], 1);
        assert_eq!(json["totalTodos"], 0);
        assert_eq!(json["users"][0]["totalTodos"], 0);
        assert_eq!(json["users"][0]["userId"], Uuid::nil().to_string());
    }
}
