//! Article domain model.
//!
//! # Responsibility
//! - Define the board post record and its draft form.
//! - Validate write payloads before they reach SQL.
//!
//! # Invariants
//! - `category` is never empty; callers without a category use a plain
//!   default like `"general"` rather than NULL.
//! - `id`, `created_at` and `updated_at` are storage-assigned.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a persisted article.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ArticleId = i64;

/// Stable identifier for a board (owned by a collaborator, stored here as a
/// foreign key only).
pub type BoardId = i64;

/// Stable identifier for a user (owned by a collaborator).
pub type UserId = i64;

/// Validation failure for article write payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    EmptyTitle,
    EmptyContents,
    EmptyCategory,
}

impl Display for ArticleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "article title must not be empty"),
            Self::EmptyContents => write!(f, "article contents must not be empty"),
            Self::EmptyCategory => write!(f, "article category must not be empty"),
        }
    }
}

impl Error for ArticleValidationError {}

/// Persisted board post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub board_id: BoardId,
    /// Category tag. Never empty; exclusion filters compare it exactly.
    pub category: String,
    pub title: String,
    pub contents: String,
    pub created_by: UserId,
    /// Unix epoch milliseconds, assigned by storage on insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, bumped by storage on update.
    pub updated_at: i64,
    /// Read counter, bumped via `increment_views`.
    pub views: i64,
}

/// Write payload for creating or replacing an article.
///
/// Storage-assigned fields (`id`, timestamps, `views`) are intentionally
/// absent so callers cannot forge them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub board_id: BoardId,
    pub category: String,
    pub title: String,
    pub contents: String,
    pub created_by: UserId,
}

impl ArticleDraft {
    /// Checks the payload against write-path invariants.
    pub fn validate(&self) -> Result<(), ArticleValidationError> {
        if self.title.trim().is_empty() {
            return Err(ArticleValidationError::EmptyTitle);
        }
        if self.contents.trim().is_empty() {
            return Err(ArticleValidationError::EmptyContents);
        }
        if self.category.trim().is_empty() {
            return Err(ArticleValidationError::EmptyCategory);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ArticleDraft;
    use super::ArticleValidationError;

    fn draft() -> ArticleDraft {
        ArticleDraft {
            board_id: 1,
            category: "general".to_string(),
            title: "hello".to_string(),
            contents: "world".to_string(),
            created_by: 7,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut no_title = draft();
        no_title.title = "  ".to_string();
        assert_eq!(
            no_title.validate(),
            Err(ArticleValidationError::EmptyTitle)
        );

        let mut no_category = draft();
        no_category.category = String::new();
        assert_eq!(
            no_category.validate(),
            Err(ArticleValidationError::EmptyCategory)
        );
    }
}
