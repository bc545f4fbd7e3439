//! File attachment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, counts and filtered paginated search over uploads.
//! - Enforce the one-owner-reference rule before SQL mutations.
//!
//! # Invariants
//! - Write paths call `FileAttachmentDraft::validate()` first; the schema
//!   CHECK constraint is the backstop, not the primary guard.
//! - `uploaded_at` is storage-assigned and immutable.

use crate::model::article::{ArticleId, UserId};
use crate::model::file_attachment::{
    FileAttachment, FileAttachmentDraft, FileAttachmentId, FileKind,
};
use crate::query::filter::FileFilter;
use crate::query::page::{run_paged, FileSortKey, Page, PageRequest};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const FILE_SELECT_SQL: &str = "SELECT
    file_attachment.id,
    file_attachment.filepath,
    file_attachment.original_filename,
    file_attachment.is_private,
    file_attachment.uploaded_by,
    file_attachment.kind,
    file_attachment.uploaded_at,
    file_attachment.article_id,
    file_attachment.submission_id,
    file_attachment.filesize
FROM file_attachment";

/// Repository interface for upload persistence and search.
pub trait FileAttachmentRepository {
    /// Inserts a validated draft and returns the stored row.
    fn create_attachment(&self, draft: &FileAttachmentDraft) -> RepoResult<FileAttachment>;
    /// Gets one attachment by id.
    fn get_attachment(&self, id: FileAttachmentId) -> RepoResult<Option<FileAttachment>>;
    /// Flips the visibility flag.
    fn set_private(&self, id: FileAttachmentId, is_private: bool) -> RepoResult<()>;
    /// Deletes an attachment record. Physical file cleanup is a
    /// collaborator concern.
    fn delete_attachment(&self, id: FileAttachmentId) -> RepoResult<()>;
    /// All attachments for one article, oldest first.
    fn list_for_article(&self, article_id: ArticleId) -> RepoResult<Vec<FileAttachment>>;
    /// Number of attachments on one article.
    fn count_for_article(&self, article_id: ArticleId) -> RepoResult<u64>;
    /// Number of uploads by one user.
    fn count_for_uploader(&self, uploaded_by: UserId) -> RepoResult<u64>;
    /// Most recent uploads by one user, newest first, bounded by `limit`.
    fn recent_uploads(&self, uploaded_by: UserId, limit: u32) -> RepoResult<Vec<FileAttachment>>;
    /// Filtered, ordered, windowed search with total-count metadata.
    fn search_attachments(
        &self,
        filter: &FileFilter,
        request: &PageRequest<FileSortKey>,
    ) -> RepoResult<Page<FileAttachment>>;
}

/// SQLite-backed file attachment repository.
pub struct SqliteFileAttachmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFileAttachmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FileAttachmentRepository for SqliteFileAttachmentRepository<'_> {
    fn create_attachment(&self, draft: &FileAttachmentDraft) -> RepoResult<FileAttachment> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO file_attachment (
                filepath,
                original_filename,
                is_private,
                uploaded_by,
                kind,
                article_id,
                submission_id,
                filesize
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                draft.filepath.as_str(),
                draft.original_filename.as_str(),
                draft.is_private,
                draft.uploaded_by,
                draft.kind.map(FileKind::as_db),
                draft.article_id,
                draft.submission_id,
                draft.filesize,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_attachment(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("attachment row {id} missing after insert"))
        })
    }

    fn get_attachment(&self, id: FileAttachmentId) -> RepoResult<Option<FileAttachment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FILE_SELECT_SQL} WHERE file_attachment.id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_attachment_row(row)?));
        }

        Ok(None)
    }

    fn set_private(&self, id: FileAttachmentId, is_private: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE file_attachment SET is_private = ?1 WHERE id = ?2;",
            params![is_private, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "file_attachment",
                id,
            });
        }

        Ok(())
    }

    fn delete_attachment(&self, id: FileAttachmentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM file_attachment WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "file_attachment",
                id,
            });
        }

        Ok(())
    }

    fn list_for_article(&self, article_id: ArticleId) -> RepoResult<Vec<FileAttachment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FILE_SELECT_SQL}
             WHERE file_attachment.article_id = ?1
             ORDER BY file_attachment.uploaded_at ASC, file_attachment.id ASC;"
        ))?;

        let mut rows = stmt.query(params![article_id])?;
        let mut attachments = Vec::new();

        while let Some(row) = rows.next()? {
            attachments.push(parse_attachment_row(row)?);
        }

        Ok(attachments)
    }

    fn count_for_article(&self, article_id: ArticleId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM file_attachment WHERE article_id = ?1;",
            params![article_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_for_uploader(&self, uploaded_by: UserId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM file_attachment WHERE uploaded_by = ?1;",
            params![uploaded_by],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn recent_uploads(&self, uploaded_by: UserId, limit: u32) -> RepoResult<Vec<FileAttachment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FILE_SELECT_SQL}
             WHERE file_attachment.uploaded_by = ?1
             ORDER BY file_attachment.uploaded_at DESC, file_attachment.id ASC
             LIMIT ?2;"
        ))?;

        let mut rows = stmt.query(params![uploaded_by, limit])?;
        let mut attachments = Vec::new();

        while let Some(row) = rows.next()? {
            attachments.push(parse_attachment_row(row)?);
        }

        Ok(attachments)
    }

    fn search_attachments(
        &self,
        filter: &FileFilter,
        request: &PageRequest<FileSortKey>,
    ) -> RepoResult<Page<FileAttachment>> {
        let predicate = filter.predicate();
        run_paged(
            self.conn,
            FILE_SELECT_SQL,
            "FROM file_attachment",
            &predicate,
            request,
            parse_attachment_row,
        )
    }
}

fn parse_attachment_row(row: &Row<'_>) -> RepoResult<FileAttachment> {
    let kind = match row.get::<_, Option<String>>("kind")? {
        Some(value) => Some(FileKind::parse_db(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid kind `{value}` in file_attachment.kind"
            ))
        })?),
        None => None,
    };

    let attachment = FileAttachment {
        id: row.get("id")?,
        filepath: row.get("filepath")?,
        original_filename: row.get("original_filename")?,
        is_private: row.get("is_private")?,
        uploaded_by: row.get("uploaded_by")?,
        kind,
        uploaded_at: row.get("uploaded_at")?,
        article_id: row.get("article_id")?,
        submission_id: row.get("submission_id")?,
        filesize: row.get("filesize")?,
    };

    if attachment.article_id.is_some() && attachment.submission_id.is_some() {
        return Err(RepoError::InvalidData(format!(
            "attachment row {} references both an article and a submission",
            attachment.id
        )));
    }

    Ok(attachment)
}
