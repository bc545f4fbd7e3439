//! File attachment search facade.
//!
//! # Responsibility
//! - Provide the named upload-list presets: per-article, per-uploader,
//!   by kind, filename search, free-text search.
//! - Keep visibility filtering inside the predicate so page totals stay
//!   truthful.

use crate::model::article::{ArticleId, UserId};
use crate::model::file_attachment::{FileAttachment, FileKind};
use crate::query::filter::FileFilter;
use crate::query::page::{FileSortKey, Page, PageRequest};
use crate::repo::file_repo::FileAttachmentRepository;
use crate::repo::RepoResult;
use log::info;

/// Named filter presets over attachment search.
pub struct FileService<R: FileAttachmentRepository> {
    repo: R,
}

impl<R: FileAttachmentRepository> FileService<R> {
    /// Creates a facade using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Attachments on one article, optionally restricted to public ones.
    pub fn list_for_article(
        &self,
        article_id: ArticleId,
        public_only: bool,
        request: &PageRequest<FileSortKey>,
    ) -> RepoResult<Page<FileAttachment>> {
        let filter = FileFilter {
            article_id: Some(article_id),
            is_private: public_only.then_some(false),
            ..FileFilter::default()
        };
        self.run_preset(&filter, request, "list_for_article")
    }

    /// Uploads by one user, optionally restricted to public ones.
    pub fn list_for_uploader(
        &self,
        uploaded_by: UserId,
        public_only: bool,
        request: &PageRequest<FileSortKey>,
    ) -> RepoResult<Page<FileAttachment>> {
        let filter = FileFilter {
            uploaded_by: Some(uploaded_by),
            is_private: public_only.then_some(false),
            ..FileFilter::default()
        };
        self.run_preset(&filter, request, "list_for_uploader")
    }

    /// All attachments of one kind.
    pub fn list_by_kind(
        &self,
        kind: FileKind,
        request: &PageRequest<FileSortKey>,
    ) -> RepoResult<Page<FileAttachment>> {
        let filter = FileFilter {
            kind: Some(kind),
            ..FileFilter::default()
        };
        self.run_preset(&filter, request, "list_by_kind")
    }

    /// Case-insensitive substring search over original filenames.
    pub fn search_filenames(
        &self,
        text: &str,
        request: &PageRequest<FileSortKey>,
    ) -> RepoResult<Page<FileAttachment>> {
        let filter = FileFilter {
            filename_contains: Some(text.to_string()),
            ..FileFilter::default()
        };
        self.run_preset(&filter, request, "search_filenames")
    }

    /// Free-text search across filename and path.
    pub fn search_text(
        &self,
        text: &str,
        request: &PageRequest<FileSortKey>,
    ) -> RepoResult<Page<FileAttachment>> {
        let filter = FileFilter {
            free_text: Some(text.to_string()),
            ..FileFilter::default()
        };
        self.run_preset(&filter, request, "search_text")
    }

    /// Number of attachments on one article.
    pub fn count_for_article(&self, article_id: ArticleId) -> RepoResult<u64> {
        self.repo.count_for_article(article_id)
    }

    /// Number of uploads by one user.
    pub fn count_for_uploader(&self, uploaded_by: UserId) -> RepoResult<u64> {
        self.repo.count_for_uploader(uploaded_by)
    }

    /// Most recent uploads by one user, newest first.
    pub fn recent_uploads(
        &self,
        uploaded_by: UserId,
        limit: u32,
    ) -> RepoResult<Vec<FileAttachment>> {
        self.repo.recent_uploads(uploaded_by, limit)
    }

    /// Arbitrary filter combination for callers that outgrow the presets.
    pub fn search(
        &self,
        filter: &FileFilter,
        request: &PageRequest<FileSortKey>,
    ) -> RepoResult<Page<FileAttachment>> {
        self.run_preset(filter, request, "custom")
    }

    fn run_preset(
        &self,
        filter: &FileFilter,
        request: &PageRequest<FileSortKey>,
        preset: &str,
    ) -> RepoResult<Page<FileAttachment>> {
        let page = self.repo.search_attachments(filter, request)?;
        info!(
            "event=attachment_search module=file preset={} page={} page_size={} returned={} total={}",
            preset,
            request.page,
            request.page_size,
            page.items.len(),
            page.total_count
        );
        Ok(page)
    }
}
