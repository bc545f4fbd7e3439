//! File attachment domain model.
//!
//! # Responsibility
//! - Define the upload record linking stored files to articles/submissions.
//! - Enforce the one-owner-reference rule on write payloads.
//!
//! # Invariants
//! - At most one of `article_id` / `submission_id` is set. Neither set is
//!   legal (orphaned upload awaiting attachment).

use crate::model::article::{ArticleId, UserId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a persisted file attachment.
pub type FileAttachmentId = i64;

/// Stable identifier for a submission (owned by a collaborator).
pub type SubmissionId = i64;

/// Origin/purpose tag for an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Inline image referenced from article markup.
    Image,
    /// Plain downloadable attachment.
    Attachment,
}

impl FileKind {
    pub(crate) fn as_db(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Attachment => "attachment",
        }
    }

    pub(crate) fn parse_db(value: &str) -> Option<Self> {
        match value {
            "image" => Some(Self::Image),
            "attachment" => Some(Self::Attachment),
            _ => None,
        }
    }
}

/// Validation failure for attachment write payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileValidationError {
    EmptyFilepath,
    EmptyOriginalFilename,
    /// Both owner references are set; an attachment has one home at most.
    ConflictingOwners,
}

impl Display for FileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFilepath => write!(f, "attachment filepath must not be empty"),
            Self::EmptyOriginalFilename => {
                write!(f, "attachment original filename must not be empty")
            }
            Self::ConflictingOwners => write!(
                f,
                "attachment cannot reference both an article and a submission"
            ),
        }
    }
}

impl Error for FileValidationError {}

/// Persisted upload record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub id: FileAttachmentId,
    pub filepath: String,
    pub original_filename: String,
    pub is_private: bool,
    pub uploaded_by: UserId,
    pub kind: Option<FileKind>,
    /// Unix epoch milliseconds, assigned by storage on insert.
    pub uploaded_at: i64,
    pub article_id: Option<ArticleId>,
    pub submission_id: Option<SubmissionId>,
    pub filesize: i64,
}

/// Write payload for registering an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachmentDraft {
    pub filepath: String,
    pub original_filename: String,
    pub is_private: bool,
    pub uploaded_by: UserId,
    pub kind: Option<FileKind>,
    pub article_id: Option<ArticleId>,
    pub submission_id: Option<SubmissionId>,
    pub filesize: i64,
}

impl FileAttachmentDraft {
    /// Checks the payload against write-path invariants.
    pub fn validate(&self) -> Result<(), FileValidationError> {
        if self.filepath.trim().is_empty() {
            return Err(FileValidationError::EmptyFilepath);
        }
        if self.original_filename.trim().is_empty() {
            return Err(FileValidationError::EmptyOriginalFilename);
        }
        if self.article_id.is_some() && self.submission_id.is_some() {
            return Err(FileValidationError::ConflictingOwners);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileAttachmentDraft, FileKind, FileValidationError};

    fn draft() -> FileAttachmentDraft {
        FileAttachmentDraft {
            filepath: "uploads/2024/a.png".to_string(),
            original_filename: "a.png".to_string(),
            is_private: false,
            uploaded_by: 3,
            kind: Some(FileKind::Image),
            article_id: Some(1),
            submission_id: None,
            filesize: 1024,
        }
    }

    #[test]
    fn orphaned_upload_is_legal() {
        let mut orphan = draft();
        orphan.article_id = None;
        assert!(orphan.validate().is_ok());
    }

    #[test]
    fn two_owner_references_are_rejected() {
        let mut both = draft();
        both.submission_id = Some(9);
        assert_eq!(
            both.validate(),
            Err(FileValidationError::ConflictingOwners)
        );
    }

    #[test]
    fn kind_round_trips_through_db_tags() {
        assert_eq!(FileKind::parse_db(FileKind::Image.as_db()), Some(FileKind::Image));
        assert_eq!(FileKind::parse_db("video"), None);
    }
}
