//! Predicate builder for list-style entity search.
//!
//! # Responsibility
//! - Render `ArticleFilter` / `FileFilter` specs into a single `WHERE`
//!   fragment plus positional binds.
//! - Keep containment semantics uniform: case-insensitive substring with
//!   LIKE-wildcard escaping.
//!
//! # Invariants
//! - Absent optional fields are omitted from the AND chain, never treated
//!   as false; an empty filter matches everything.
//! - `exclude_category` compares exact equality (`<>`), never substring.
//! - `min_like_count` is boundary-inclusive (`>=`) over the join relation.

use crate::model::article::{ArticleId, BoardId, UserId};
use crate::model::file_attachment::{FileKind, SubmissionId};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

const LIKE_ESCAPE_CHAR: char = '\\';

/// Accumulated `WHERE` fragment with its positional binds.
///
/// Clauses are AND-composed; binds appear in clause order so the fragment
/// can be spliced into both the count and the fetch statement.
#[derive(Debug, Default)]
pub struct Predicate {
    clauses: Vec<String>,
    binds: Vec<Value>,
}

impl Predicate {
    /// Appends one clause with its binds to the AND chain.
    pub fn push(&mut self, clause: impl Into<String>, binds: impl IntoIterator<Item = Value>) {
        self.clauses.push(clause.into());
        self.binds.extend(binds);
    }

    /// Renders the chain as SQL. An empty chain is the match-all predicate.
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            "1 = 1".to_string()
        } else {
            self.clauses.join(" AND ")
        }
    }

    /// Positional binds in clause order.
    pub fn binds(&self) -> &[Value] {
        &self.binds
    }
}

/// SQL shape used to evaluate `min_like_count`.
///
/// Both shapes return identical rows on SQLite; the choice trades one
/// aggregate pass over the whole like relation (`Fast`) against one
/// correlated count per candidate row (`Exact`). `Exact` is the default
/// and the recommended shape when the candidate set is already narrow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeCountMode {
    /// Correlated `SELECT COUNT(*)` subquery per candidate article.
    #[default]
    Exact,
    /// Pre-aggregated `GROUP BY ... HAVING` membership test.
    Fast,
}

/// Structured filter spec for article search.
///
/// All provided fields are AND-composed. `free_text` alone expands to an OR
/// across title, contents and category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleFilter {
    pub board_id: Option<BoardId>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact category exclusion. May be combined with `category`; both
    /// clauses apply (a contradictory pair yields an empty match set).
    pub exclude_category: Option<String>,
    pub title_contains: Option<String>,
    pub contents_contains: Option<String>,
    pub author_id: Option<UserId>,
    /// Case-insensitive substring ORed across title, contents, category.
    pub free_text: Option<String>,
    /// Minimum number of distinct liking users, inclusive.
    pub min_like_count: Option<u32>,
    /// SQL shape for the like-count threshold.
    pub like_count_mode: LikeCountMode,
}

impl ArticleFilter {
    /// Renders the filter into a predicate over the `article` table.
    pub fn predicate(&self) -> Predicate {
        let mut predicate = Predicate::default();

        if let Some(board_id) = self.board_id {
            predicate.push("article.board_id = ?", [Value::Integer(board_id)]);
        }
        if let Some(category) = &self.category {
            predicate.push(
                "article.category = ?",
                [Value::Text(category.clone())],
            );
        }
        if let Some(excluded) = &self.exclude_category {
            predicate.push(
                "article.category <> ?",
                [Value::Text(excluded.clone())],
            );
        }
        if let Some(title) = &self.title_contains {
            push_contains(&mut predicate, "article.title", title);
        }
        if let Some(contents) = &self.contents_contains {
            push_contains(&mut predicate, "article.contents", contents);
        }
        if let Some(author_id) = self.author_id {
            predicate.push("article.created_by = ?", [Value::Integer(author_id)]);
        }
        if let Some(text) = &self.free_text {
            let pattern = Value::Text(like_pattern(text));
            predicate.push(
                format!(
                    "(LOWER(article.title) LIKE ? ESCAPE '{esc}' \
                     OR LOWER(article.contents) LIKE ? ESCAPE '{esc}' \
                     OR LOWER(article.category) LIKE ? ESCAPE '{esc}')",
                    esc = LIKE_ESCAPE_CHAR
                ),
                [pattern.clone(), pattern.clone(), pattern],
            );
        }
        if let Some(min_likes) = self.min_like_count {
            // Threshold 0 is trivially true for every article, including
            // ones with no like rows at all; emitting no clause keeps the
            // Fast membership shape from excluding them.
            if min_likes > 0 {
                match self.like_count_mode {
                    LikeCountMode::Exact => predicate.push(
                        "(SELECT COUNT(*) FROM user_like_article ul \
                         WHERE ul.article_id = article.id) >= ?",
                        [Value::Integer(i64::from(min_likes))],
                    ),
                    LikeCountMode::Fast => predicate.push(
                        "article.id IN (SELECT article_id FROM user_like_article \
                         GROUP BY article_id HAVING COUNT(*) >= ?)",
                        [Value::Integer(i64::from(min_likes))],
                    ),
                }
            }
        }

        predicate
    }
}

/// Structured filter spec for file attachment search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub article_id: Option<ArticleId>,
    pub submission_id: Option<SubmissionId>,
    pub uploaded_by: Option<UserId>,
    pub kind: Option<FileKind>,
    pub is_private: Option<bool>,
    pub filename_contains: Option<String>,
    /// Case-insensitive substring ORed across original filename and path.
    pub free_text: Option<String>,
}

impl FileFilter {
    /// Renders the filter into a predicate over the `file_attachment` table.
    pub fn predicate(&self) -> Predicate {
        let mut predicate = Predicate::default();

        if let Some(article_id) = self.article_id {
            predicate.push(
                "file_attachment.article_id = ?",
                [Value::Integer(article_id)],
            );
        }
        if let Some(submission_id) = self.submission_id {
            predicate.push(
                "file_attachment.submission_id = ?",
                [Value::Integer(submission_id)],
            );
        }
        if let Some(uploaded_by) = self.uploaded_by {
            predicate.push(
                "file_attachment.uploaded_by = ?",
                [Value::Integer(uploaded_by)],
            );
        }
        if let Some(kind) = self.kind {
            predicate.push(
                "file_attachment.kind = ?",
                [Value::Text(kind.as_db().to_string())],
            );
        }
        if let Some(is_private) = self.is_private {
            predicate.push(
                "file_attachment.is_private = ?",
                [Value::Integer(i64::from(is_private))],
            );
        }
        if let Some(filename) = &self.filename_contains {
            push_contains(&mut predicate, "file_attachment.original_filename", filename);
        }
        if let Some(text) = &self.free_text {
            let pattern = Value::Text(like_pattern(text));
            predicate.push(
                format!(
                    "(LOWER(file_attachment.original_filename) LIKE ? ESCAPE '{esc}' \
                     OR LOWER(file_attachment.filepath) LIKE ? ESCAPE '{esc}')",
                    esc = LIKE_ESCAPE_CHAR
                ),
                [pattern.clone(), pattern],
            );
        }

        predicate
    }
}

fn push_contains(predicate: &mut Predicate, column: &str, needle: &str) {
    predicate.push(
        format!("LOWER({column}) LIKE ? ESCAPE '{LIKE_ESCAPE_CHAR}'"),
        [Value::Text(like_pattern(needle))],
    );
}

/// Builds a `%needle%` LIKE pattern with lowercase-compare semantics.
///
/// ASCII lowercasing matches SQLite's `LOWER()` exactly; LIKE
/// metacharacters in the needle are escaped so user input always means
/// literal text.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.to_ascii_lowercase().chars() {
        if ch == LIKE_ESCAPE_CHAR || ch == '%' || ch == '_' {
            escaped.push(LIKE_ESCAPE_CHAR);
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
