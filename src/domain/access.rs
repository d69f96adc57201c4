//! Access rules: who may do what to whose todos.
//!
//! The rule is a pure function of the caller's identity and role and the
//! owner of the resource. Admins may do anything; everyone else only
//! touches what they own.

use uuid::Uuid;

use super::UserRole;
use crate::errors::{AppError, AppResult};

/// Authenticated caller, derived from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Update,
    Delete,
    ReadGlobalStats,
}

impl Action {
    fn requires_admin(&self) -> bool {
        matches!(self, Action::ReadGlobalStats)
    }
}

/// What an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Data owned by a single user (their todos or their statistics).
    OwnedBy(Uuid),
    /// Data spanning every user.
    AllUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> AppResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Forbidden) => Err(AppError::Forbidden),
            Decision::Deny(DenyReason::Unauthenticated) => Err(AppError::Unauthenticated),
        }
    }
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn authorize(&self, action: Action, resource: Resource) -> Decision {
        if self.is_admin() {
            return Decision::Allow;
        }
        if action.requires_admin() {
            return Decision::Deny(DenyReason::Forbidden);
        }
        match resource {
            Resource::OwnedBy(owner_id) if owner_id == self.id => Decision::Allow,
            _ => Decision::Deny(DenyReason::Forbidden),
        }
    }

    /// Shorthand for `authorize(..).into_result()`.
    pub fn require(&self, action: Action, resource: Resource) -> AppResult<()> {
        self.authorize(action, resource).into_result()
    }
}
