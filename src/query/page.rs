//! Pagination executor and page-request types.
//!
//! # Responsibility
//! - Validate page windows before any SQL runs.
//! - Execute the count query and the windowed fetch for one predicate.
//! - Keep ordering deterministic via an id tie-break.
//!
//! # Invariants
//! - `total_count` reflects the full predicate match count for every page,
//!   including windows past the end of the result set.
//! - Count and fetch are two statements with no snapshot between them; a
//!   concurrent writer may make `total_count` stale by fetch time.

use crate::query::filter::Predicate;
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};

/// Default window size when callers pass nothing explicit.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound on the window size; larger requests are rejected, not
/// clamped, so callers notice the mistake.
pub const PAGE_SIZE_MAX: u32 = 100;

/// Sort direction for a page request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Whitelisted ordering column for one entity.
///
/// Keys render to fixed column names so no caller-controlled text ever
/// lands in an `ORDER BY`.
pub trait SortKey: Copy {
    /// Fully qualified order column.
    fn column(self) -> &'static str;
    /// Column used for the deterministic tie-break.
    fn id_column(self) -> &'static str;
}

/// Ordering keys accepted for article search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleSortKey {
    Id,
    Title,
    Category,
    #[default]
    CreatedAt,
    UpdatedAt,
    CreatedBy,
}

impl SortKey for ArticleSortKey {
    fn column(self) -> &'static str {
        match self {
            Self::Id => "article.id",
            Self::Title => "article.title",
            Self::Category => "article.category",
            Self::CreatedAt => "article.created_at",
            Self::UpdatedAt => "article.updated_at",
            Self::CreatedBy => "article.created_by",
        }
    }

    fn id_column(self) -> &'static str {
        "article.id"
    }
}

/// Ordering keys accepted for file attachment search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSortKey {
    Id,
    OriginalFilename,
    #[default]
    UploadedAt,
    UploadedBy,
    Filesize,
}

impl SortKey for FileSortKey {
    fn column(self) -> &'static str {
        match self {
            Self::Id => "file_attachment.id",
            Self::OriginalFilename => "file_attachment.original_filename",
            Self::UploadedAt => "file_attachment.uploaded_at",
            Self::UploadedBy => "file_attachment.uploaded_by",
            Self::Filesize => "file_attachment.filesize",
        }
    }

    fn id_column(self) -> &'static str {
        "file_attachment.id"
    }
}

/// Zero-based page window with ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest<K> {
    pub page: u32,
    pub page_size: u32,
    pub sort_key: K,
    pub direction: SortDirection,
}

impl<K: Default> Default for PageRequest<K> {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_key: K::default(),
            direction: SortDirection::default(),
        }
    }
}

impl<K: Default> PageRequest<K> {
    /// Builds a request for the given window with default ordering
    /// (creation time descending).
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Self::default()
        }
    }
}

impl<K: SortKey> PageRequest<K> {
    /// Rejects malformed windows before any SQL executes.
    pub fn validate(&self) -> RepoResult<()> {
        if self.page_size == 0 {
            return Err(RepoError::InvalidFilter(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.page_size > PAGE_SIZE_MAX {
            return Err(RepoError::InvalidFilter(format!(
                "page_size {} exceeds maximum {PAGE_SIZE_MAX}",
                self.page_size
            )));
        }
        Ok(())
    }

    fn order_clause(&self) -> String {
        let column = self.sort_key.column();
        let id_column = self.sort_key.id_column();
        if column == id_column {
            format!("ORDER BY {column} {}", self.direction.as_sql())
        } else {
            // Ascending id tie-break keeps repeated fetches of adjacent
            // pages from shuffling rows with equal sort values.
            format!(
                "ORDER BY {column} {}, {id_column} ASC",
                self.direction.as_sql()
            )
        }
    }
}

/// Bounded slice of an ordered result set plus total-count metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u64) -> Self {
        let total_pages = total_count
            .div_ceil(u64::from(page_size))
            .try_into()
            .unwrap_or(u32::MAX);
        Self {
            items,
            page,
            page_size,
            total_count,
            total_pages,
        }
    }
}

/// Runs the count query and the windowed fetch for one predicate.
///
/// `from_sql` is the shared `FROM ...` segment; `select_sql` must select
/// from the same segment so both statements see the same candidate rows.
/// No transactional snapshot spans the two statements.
pub(crate) fn run_paged<K, T, F>(
    conn: &Connection,
    select_sql: &str,
    from_sql: &str,
    predicate: &Predicate,
    request: &PageRequest<K>,
    mut parse_row: F,
) -> RepoResult<Page<T>>
where
    K: SortKey,
    F: FnMut(&Row<'_>) -> RepoResult<T>,
{
    request.validate()?;

    let where_sql = predicate.where_sql();
    let binds: Vec<Value> = predicate.binds().to_vec();

    let count_sql = format!("SELECT COUNT(*) {from_sql} WHERE {where_sql};");
    let total_count: u64 = conn.query_row(
        &count_sql,
        params_from_iter(binds.iter().cloned()),
        |row| row.get::<_, i64>(0),
    )? as u64;

    let fetch_sql = format!(
        "{select_sql} WHERE {where_sql} {} LIMIT ? OFFSET ?;",
        request.order_clause()
    );
    let mut fetch_binds = binds;
    fetch_binds.push(Value::Integer(i64::from(request.page_size)));
    fetch_binds.push(Value::Integer(
        i64::from(request.page) * i64::from(request.page_size),
    ));

    let mut stmt = conn.prepare(&fetch_sql)?;
    let mut rows = stmt.query(params_from_iter(fetch_binds))?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_row(row)?);
    }

    Ok(Page::new(
        items,
        request.page,
        request.page_size,
        total_count,
    ))
}

#[cfg(test)]
mod tests {
    use super::{ArticleSortKey, Page, PageRequest, SortDirection};
    use crate::repo::RepoError;

    #[test]
    fn zero_page_size_is_rejected_before_querying() {
        let request = PageRequest::<ArticleSortKey>::new(0, 0);
        assert!(matches!(
            request.validate(),
            Err(RepoError::InvalidFilter(_))
        ));
    }

    #[test]
    fn oversized_page_is_rejected() {
        let request = PageRequest::<ArticleSortKey>::new(0, 101);
        assert!(matches!(
            request.validate(),
            Err(RepoError::InvalidFilter(_))
        ));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<u8> = Page::new(Vec::new(), 0, 10, 25);
        assert_eq!(page.total_pages, 3);

        let empty: Page<u8> = Page::new(Vec::new(), 0, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn id_sort_key_skips_redundant_tie_break() {
        let by_id = PageRequest::<ArticleSortKey> {
            sort_key: ArticleSortKey::Id,
            direction: SortDirection::Desc,
            ..PageRequest::default()
        };
        assert_eq!(by_id.order_clause(), "ORDER BY article.id DESC");

        let by_created = PageRequest::<ArticleSortKey>::default();
        assert_eq!(
            by_created.order_clause(),
            "ORDER BY article.created_at DESC, article.id ASC"
        );
    }
}
