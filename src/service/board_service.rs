//! Board search facade.
//!
//! # Responsibility
//! - Provide the named article-list presets consumed by outer layers:
//!   by-board, by-category, by-author, free-text, popularity.
//! - Compose each preset from the shared predicate builder instead of
//!   per-combination query methods.
//!
//! # Invariants
//! - Every preset is a pure function of (scope parameters, page request).
//! - `exclude_category` is always exact-match exclusion and always a
//!   parameter; this layer knows no reserved category names.
//! - Popularity thresholds are inclusive (`likes >= min`).

use crate::model::article::{Article, BoardId, UserId};
use crate::query::filter::{ArticleFilter, LikeCountMode};
use crate::query::page::{ArticleSortKey, Page, PageRequest};
use crate::repo::article_repo::ArticleRepository;
use crate::repo::RepoResult;
use log::info;

/// Named filter presets over article search.
pub struct BoardService<R: ArticleRepository> {
    repo: R,
}

impl<R: ArticleRepository> BoardService<R> {
    /// Creates a facade using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Everything on one board, optionally excluding one exact category.
    pub fn list_board(
        &self,
        board_id: BoardId,
        exclude_category: Option<&str>,
        request: &PageRequest<ArticleSortKey>,
    ) -> RepoResult<Page<Article>> {
        let filter = ArticleFilter {
            board_id: Some(board_id),
            exclude_category: exclude_category.map(str::to_string),
            ..ArticleFilter::default()
        };
        self.run_preset(&filter, request, "list_board")
    }

    /// One exact category on one board.
    pub fn list_board_category(
        &self,
        board_id: BoardId,
        category: &str,
        request: &PageRequest<ArticleSortKey>,
    ) -> RepoResult<Page<Article>> {
        let filter = ArticleFilter {
            board_id: Some(board_id),
            category: Some(category.to_string()),
            ..ArticleFilter::default()
        };
        self.run_preset(&filter, request, "list_board_category")
    }

    /// Articles by one author, globally or scoped to a board.
    pub fn list_by_author(
        &self,
        author_id: UserId,
        board_id: Option<BoardId>,
        request: &PageRequest<ArticleSortKey>,
    ) -> RepoResult<Page<Article>> {
        let filter = ArticleFilter {
            author_id: Some(author_id),
            board_id,
            ..ArticleFilter::default()
        };
        self.run_preset(&filter, request, "list_by_author")
    }

    /// Free-text search across title, contents and category, optionally
    /// scoped to a board and/or an exact category, optionally excluding a
    /// category.
    pub fn search_text(
        &self,
        text: &str,
        board_id: Option<BoardId>,
        category: Option<&str>,
        exclude_category: Option<&str>,
        request: &PageRequest<ArticleSortKey>,
    ) -> RepoResult<Page<Article>> {
        let filter = ArticleFilter {
            free_text: Some(text.to_string()),
            board_id,
            category: category.map(str::to_string),
            exclude_category: exclude_category.map(str::to_string),
            ..ArticleFilter::default()
        };
        self.run_preset(&filter, request, "search_text")
    }

    /// Title-only substring search on one board.
    pub fn search_titles(
        &self,
        text: &str,
        board_id: BoardId,
        exclude_category: Option<&str>,
        request: &PageRequest<ArticleSortKey>,
    ) -> RepoResult<Page<Article>> {
        let filter = ArticleFilter {
            title_contains: Some(text.to_string()),
            board_id: Some(board_id),
            exclude_category: exclude_category.map(str::to_string),
            ..ArticleFilter::default()
        };
        self.run_preset(&filter, request, "search_titles")
    }

    /// Contents-only substring search on one board.
    pub fn search_contents(
        &self,
        text: &str,
        board_id: BoardId,
        exclude_category: Option<&str>,
        request: &PageRequest<ArticleSortKey>,
    ) -> RepoResult<Page<Article>> {
        let filter = ArticleFilter {
            contents_contains: Some(text.to_string()),
            board_id: Some(board_id),
            exclude_category: exclude_category.map(str::to_string),
            ..ArticleFilter::default()
        };
        self.run_preset(&filter, request, "search_contents")
    }

    /// Articles liked by at least `min_like_count` distinct users.
    ///
    /// `mode` picks the like-count SQL shape; see [`LikeCountMode`] for the
    /// trade-off.
    pub fn hot_articles(
        &self,
        board_id: BoardId,
        min_like_count: u32,
        mode: LikeCountMode,
        exclude_category: Option<&str>,
        request: &PageRequest<ArticleSortKey>,
    ) -> RepoResult<Page<Article>> {
        let filter = ArticleFilter {
            board_id: Some(board_id),
            min_like_count: Some(min_like_count),
            like_count_mode: mode,
            exclude_category: exclude_category.map(str::to_string),
            ..ArticleFilter::default()
        };
        self.run_preset(&filter, request, "hot_articles")
    }

    /// Arbitrary filter combination for callers that outgrow the presets.
    pub fn search(
        &self,
        filter: &ArticleFilter,
        request: &PageRequest<ArticleSortKey>,
    ) -> RepoResult<Page<Article>> {
        self.run_preset(filter, request, "custom")
    }

    fn run_preset(
        &self,
        filter: &ArticleFilter,
        request: &PageRequest<ArticleSortKey>,
        preset: &str,
    ) -> RepoResult<Page<Article>> {
        let page = self.repo.search_articles(filter, request)?;
        info!(
            "event=article_search module=board preset={} page={} page_size={} returned={} total={}",
            preset,
            request.page,
            request.page_size,
            page.items.len(),
            page.total_count
        );
        Ok(page)
    }
}
