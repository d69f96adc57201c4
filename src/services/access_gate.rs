//! Authorization gate: bearer token + action + resource -> decision.

use std::sync::Arc;

use super::TokenIssuer;
use crate::domain::{Action, Decision, DenyReason, Principal, Resource};
use crate::errors::{AppError, AppResult};

/// Authenticates bearer tokens and applies the access rules.
///
/// Stateless apart from the token issuer; never touches storage.
#[derive(Clone)]
pub struct AccessGate {
    issuer: Arc<TokenIssuer>,
}

impl AccessGate {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    /// Resolve the caller behind a raw bearer token.
    ///
    /// # Errors
    /// `Unauthenticated` when no token was presented, otherwise whatever
    /// verification reports (`InvalidToken`, `ExpiredToken`).
    pub fn authenticate(&self, token: Option<&str>) -> AppResult<Principal> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthenticated)?;
        Ok(self.issuer.verify(token)?.into())
    }

    /// Decide whether the bearer of `token` may perform `action` on
    /// `resource`. Any authentication failure is `Deny(Unauthenticated)`.
    pub fn authorize(&self, token: Option<&str>, action: Action, resource: Resource) -> Decision {
        match self.authenticate(token) {
            Ok(principal) => principal.authorize(action, resource),
            Err(_) => Decision::Deny(DenyReason::Unauthenticated),
        }
    }
}
