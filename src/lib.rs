//! Data-access core for a board/forum platform: articles, file attachments
//! and the user↔article like relation, with a composable
//! filtered-search-and-paginate query layer on SQLite.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::article::{Article, ArticleDraft, ArticleId, ArticleValidationError, BoardId, UserId};
pub use model::file_attachment::{
    FileAttachment, FileAttachmentDraft, FileAttachmentId, FileKind, FileValidationError,
    SubmissionId,
};
pub use query::filter::{ArticleFilter, FileFilter, LikeCountMode, Predicate};
pub use query::page::{
    ArticleSortKey, FileSortKey, Page, PageRequest, SortDirection, SortKey, DEFAULT_PAGE_SIZE,
    PAGE_SIZE_MAX,
};
pub use repo::article_repo::{ArticleRepository, SqliteArticleRepository};
pub use repo::file_repo::{FileAttachmentRepository, SqliteFileAttachmentRepository};
pub use repo::like_repo::{LikeRepository, SqliteLikeRepository};
pub use repo::{RepoError, RepoResult};
pub use service::board_service::BoardService;
pub use service::file_service::FileService;
pub use service::like_service::{LikeService, LikeToggle};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
