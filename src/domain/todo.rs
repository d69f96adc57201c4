//! Todo domain entity and write models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::MAX_TITLE_LENGTH;
use crate::errors::{AppError, AppResult};

/// A todo item. Always has exactly one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[schema(example = "Buy milk")]
    pub title: String,
    /// Rich-text (HTML) body produced by the editor; stored as-is.
    #[schema(example = "<p>Semi-skimmed, <strong>two</strong> litres</p>")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated data for a new todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

impl NewTodo {
    /// # Errors
    /// Returns a validation error if the title is blank or too long.
    pub fn new(owner_id: Uuid, title: &str, description: Option<String>) -> AppResult<Self> {
        Ok(Self {
            owner_id,
            title: normalize_title(title)?,
            description: normalize_description(description),
        })
    }
}

/// Partial update of a todo. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Build a patch from raw request fields.
    ///
    /// An empty description clears it. A patch that changes nothing is
    /// rejected.
    pub fn new(
        title: Option<&str>,
        description: Option<String>,
        completed: Option<bool>,
    ) -> AppResult<Self> {
        if title.is_none() && description.is_none() && completed.is_none() {
            return Err(AppError::validation("No fields to update"));
        }

        Ok(Self {
            title: title.map(normalize_title).transpose()?,
            description: description.map(|d| normalize_description(Some(d))),
            completed,
        })
    }
}

fn normalize_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(title.to_string())
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_todo_trims_title() {
        let todo = NewTodo::new(Uuid::new_v4(), "  Buy milk ", None).unwrap();
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description, None);
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(matches!(
            NewTodo::new(Uuid::new_v4(), "", None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            NewTodo::new(Uuid::new_v4(), "   ", None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_overlong_title_rejected() {
        let title = "a".repeat(MAX_TITLE_LENGTH + 1);
        assert!(NewTodo::new(Uuid::new_v4(), &title, None).is_err());
    }

    #[test]
    fn test_description_is_opaque() {
        let html = "<p>unclosed <em>markup".to_string();
        let todo = NewTodo::new(Uuid::new_v4(), "t", Some(html.clone())).unwrap();
        assert_eq!(todo.description, Some(html));
    }

    #[test]
    fn test_empty_patch_rejected() {
        assert!(TodoPatch::new(None, None, None).is_err());
    }

    #[test]
    fn test_patch_empty_description_clears() {
        let patch = TodoPatch::new(None, Some(String::new()), Some(true)).unwrap();

        assert_eq!(patch.title, None);
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.completed, Some(true));
    }
}
