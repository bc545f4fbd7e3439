//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQL details from service/facade orchestration.
//!
//! # Invariants
//! - Write paths validate drafts before SQL mutations.
//! - Malformed filters and page windows are rejected before any query runs.
//! - Storage failures surface as `RepoError::Store`, never swallowed.

use crate::db::DbError;
use crate::model::article::ArticleValidationError;
use crate::model::file_attachment::FileValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod article_repo;
pub mod file_repo;
pub mod like_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error shared by all persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Article write payload failed validation.
    Article(ArticleValidationError),
    /// Attachment write payload failed validation.
    Attachment(FileValidationError),
    /// Malformed filter spec or page window, rejected before querying.
    InvalidFilter(String),
    /// Requested entity id is absent. Surfaced to the caller, not retried.
    NotFound { entity: &'static str, id: i64 },
    /// Backing store unreachable or failing. Retry policy belongs to the
    /// caller, not this layer.
    Store(DbError),
    /// Persisted state does not decode into a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Article(err) => write!(f, "{err}"),
            Self::Attachment(err) => write!(f, "{err}"),
            Self::InvalidFilter(message) => write!(f, "invalid filter: {message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Article(err) => Some(err),
            Self::Attachment(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::InvalidFilter(_) | Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ArticleValidationError> for RepoError {
    fn from(value: ArticleValidationError) -> Self {
        Self::Article(value)
    }
}

impl From<FileValidationError> for RepoError {
    fn from(value: FileValidationError) -> Self {
        Self::Attachment(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(DbError::Sqlite(value))
    }
}
