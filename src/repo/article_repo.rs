//! Article repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered paginated search over `article` rows.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `ArticleDraft::validate()` before SQL mutations.
//! - Search uses the predicate builder; no per-combination query methods.
//! - `updated_at` is bumped on every update; `created_at` never changes.

use crate::model::article::{Article, ArticleDraft, ArticleId, BoardId};
use crate::query::filter::ArticleFilter;
use crate::query::page::{run_paged, ArticleSortKey, Page, PageRequest};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ARTICLE_SELECT_SQL: &str = "SELECT
    article.id,
    article.board_id,
    article.category,
    article.title,
    article.contents,
    article.created_by,
    article.created_at,
    article.updated_at,
    article.views
FROM article";

/// Repository interface for article persistence and search.
pub trait ArticleRepository {
    /// Inserts a validated draft and returns the stored row, including
    /// storage-assigned id and timestamps.
    fn create_article(&self, draft: &ArticleDraft) -> RepoResult<Article>;
    /// Gets one article by id.
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    /// Replaces the editable fields of an existing article.
    fn update_article(&self, id: ArticleId, draft: &ArticleDraft) -> RepoResult<()>;
    /// Deletes an article. Like rows cascade at the storage layer.
    fn delete_article(&self, id: ArticleId) -> RepoResult<()>;
    /// Bumps the read counter.
    fn increment_views(&self, id: ArticleId) -> RepoResult<()>;
    /// Newest-first listing for one board, with optional exact category
    /// exclusion.
    fn list_board_newest(
        &self,
        board_id: BoardId,
        exclude_category: Option<&str>,
    ) -> RepoResult<Vec<Article>>;
    /// Filtered, ordered, windowed search with total-count metadata.
    fn search_articles(
        &self,
        filter: &ArticleFilter,
        request: &PageRequest<ArticleSortKey>,
    ) -> RepoResult<Page<Article>>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn create_article(&self, draft: &ArticleDraft) -> RepoResult<Article> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO article (board_id, category, title, contents, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                draft.board_id,
                draft.category.as_str(),
                draft.title.as_str(),
                draft.contents.as_str(),
                draft.created_by,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_article(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("article row {id} missing after insert"))
        })
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARTICLE_SELECT_SQL} WHERE article.id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_article_row(row)?));
        }

        Ok(None)
    }

    fn update_article(&self, id: ArticleId, draft: &ArticleDraft) -> RepoResult<()> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE article
             SET
                board_id = ?1,
                category = ?2,
                title = ?3,
                contents = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                draft.board_id,
                draft.category.as_str(),
                draft.title.as_str(),
                draft.contents.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "article",
                id,
            });
        }

        Ok(())
    }

    fn delete_article(&self, id: ArticleId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM article WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "article",
                id,
            });
        }

        Ok(())
    }

    fn increment_views(&self, id: ArticleId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE article SET views = views + 1 WHERE id = ?1;",
            params![id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "article",
                id,
            });
        }

        Ok(())
    }

    fn list_board_newest(
        &self,
        board_id: BoardId,
        exclude_category: Option<&str>,
    ) -> RepoResult<Vec<Article>> {
        let mut sql = format!("{ARTICLE_SELECT_SQL} WHERE article.board_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Integer(board_id)];

        if let Some(excluded) = exclude_category {
            sql.push_str(" AND article.category <> ?");
            bind_values.push(Value::Text(excluded.to_string()));
        }

        sql.push_str(" ORDER BY article.created_at DESC, article.id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut articles = Vec::new();

        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(row)?);
        }

        Ok(articles)
    }

    fn search_articles(
        &self,
        filter: &ArticleFilter,
        request: &PageRequest<ArticleSortKey>,
    ) -> RepoResult<Page<Article>> {
        let predicate = filter.predicate();
        run_paged(
            self.conn,
            ARTICLE_SELECT_SQL,
            "FROM article",
            &predicate,
            request,
            parse_article_row,
        )
    }
}

fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let category: String = row.get("category")?;
    if category.is_empty() {
        let id: ArticleId = row.get("id")?;
        return Err(RepoError::InvalidData(format!(
            "empty category on article row {id}"
        )));
    }

    Ok(Article {
        id: row.get("id")?,
        board_id: row.get("board_id")?,
        category,
        title: row.get("title")?,
        contents: row.get("contents")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        views: row.get("views")?,
    })
}
