//! Like relation repository: the `user_like_article` join entity.
//!
//! # Responsibility
//! - Record and remove (user, article) like pairs idempotently.
//! - Answer existence and exact-count queries over the relation.
//!
//! # Invariants
//! - At most one row per (user, article) pair; the composite primary key
//!   rejects duplicates at the storage layer, so concurrent duplicate
//!   clicks converge on one row without application-level locking.
//! - Rows are created and deleted, never updated.

use crate::model::article::{ArticleId, UserId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for the like join relation.
pub trait LikeRepository {
    /// Records a like. Liking an already-liked article is a success, not an
    /// error; returns whether a new row was inserted.
    fn like(&self, user_id: UserId, article_id: ArticleId) -> RepoResult<bool>;
    /// Removes a like. Unliking a never-liked article is a success; returns
    /// whether a row was removed.
    fn unlike(&self, user_id: UserId, article_id: ArticleId) -> RepoResult<bool>;
    /// Whether the pair exists.
    fn is_liked(&self, user_id: UserId, article_id: ArticleId) -> RepoResult<bool>;
    /// Exact number of distinct users who liked the article (join count,
    /// never a stored counter).
    fn like_count(&self, article_id: ArticleId) -> RepoResult<u64>;
    /// Articles one user has liked, most recent article first.
    fn liked_article_ids(&self, user_id: UserId) -> RepoResult<Vec<ArticleId>>;
    /// Users who liked one article.
    fn users_who_liked(&self, article_id: ArticleId) -> RepoResult<Vec<UserId>>;
}

/// SQLite-backed like repository.
pub struct SqliteLikeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLikeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require_article(&self, article_id: ArticleId) -> RepoResult<()> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM article WHERE id = ?1);",
            params![article_id],
            |row| row.get(0),
        )?;

        if !exists {
            return Err(RepoError::NotFound {
                entity: "article",
                id: article_id,
            });
        }

        Ok(())
    }
}

impl LikeRepository for SqliteLikeRepository<'_> {
    fn like(&self, user_id: UserId, article_id: ArticleId) -> RepoResult<bool> {
        self.require_article(article_id)?;

        // OR IGNORE makes the duplicate-click race harmless: whichever
        // insert loses still reports success.
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO user_like_article (user_id, article_id)
             VALUES (?1, ?2);",
            params![user_id, article_id],
        )?;

        Ok(inserted > 0)
    }

    fn unlike(&self, user_id: UserId, article_id: ArticleId) -> RepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM user_like_article WHERE user_id = ?1 AND article_id = ?2;",
            params![user_id, article_id],
        )?;

        Ok(removed > 0)
    }

    fn is_liked(&self, user_id: UserId, article_id: ArticleId) -> RepoResult<bool> {
        let liked: bool = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM user_like_article WHERE user_id = ?1 AND article_id = ?2
             );",
            params![user_id, article_id],
            |row| row.get(0),
        )?;

        Ok(liked)
    }

    fn like_count(&self, article_id: ArticleId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM user_like_article WHERE article_id = ?1;",
            params![article_id],
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    fn liked_article_ids(&self, user_id: UserId) -> RepoResult<Vec<ArticleId>> {
        let mut stmt = self.conn.prepare(
            "SELECT article_id FROM user_like_article
             WHERE user_id = ?1
             ORDER BY article_id DESC;",
        )?;

        let mut rows = stmt.query(params![user_id])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }

        Ok(ids)
    }

    fn users_who_liked(&self, article_id: ArticleId) -> RepoResult<Vec<UserId>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id FROM user_like_article
             WHERE article_id = ?1
             ORDER BY user_id ASC;",
        )?;

        let mut rows = stmt.query(params![article_id])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }

        Ok(ids)
    }
}
