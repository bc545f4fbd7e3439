//! Like orchestration facade.
//!
//! # Responsibility
//! - Expose like/unlike/toggle over the join relation.
//! - Keep the idempotency contract visible at the API surface.
//!
//! # Invariants
//! - `like` and `unlike` succeed whether or not the pair already exists;
//!   the returned flag reports whether state changed.
//! - Counts come from the join relation, never a cached counter.

use crate::model::article::{ArticleId, UserId};
use crate::repo::like_repo::LikeRepository;
use crate::repo::RepoResult;
use log::info;

/// Like state after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    /// The toggle added a like.
    Liked,
    /// The toggle removed a like.
    Unliked,
}

/// Facade over the like join relation.
pub struct LikeService<R: LikeRepository> {
    repo: R,
}

impl<R: LikeRepository> LikeService<R> {
    /// Creates a facade using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records a like; repeated calls for the same pair are no-ops.
    pub fn like(&self, user_id: UserId, article_id: ArticleId) -> RepoResult<()> {
        let inserted = self.repo.like(user_id, article_id)?;
        info!(
            "event=article_like module=like article_id={} changed={}",
            article_id, inserted
        );
        Ok(())
    }

    /// Removes a like; removing a non-existent like is a no-op.
    pub fn unlike(&self, user_id: UserId, article_id: ArticleId) -> RepoResult<()> {
        let removed = self.repo.unlike(user_id, article_id)?;
        info!(
            "event=article_unlike module=like article_id={} changed={}",
            article_id, removed
        );
        Ok(())
    }

    /// Flips the like state and reports the resulting state.
    pub fn toggle(&self, user_id: UserId, article_id: ArticleId) -> RepoResult<LikeToggle> {
        // Check-then-act with a race window; the composite primary key
        // keeps the relation consistent if two toggles interleave.
        if self.repo.is_liked(user_id, article_id)? {
            self.repo.unlike(user_id, article_id)?;
            Ok(LikeToggle::Unliked)
        } else {
            self.repo.like(user_id, article_id)?;
            Ok(LikeToggle::Liked)
        }
    }

    /// Whether the user has liked the article.
    pub fn is_liked(&self, user_id: UserId, article_id: ArticleId) -> RepoResult<bool> {
        self.repo.is_liked(user_id, article_id)
    }

    /// Exact number of distinct users who liked the article.
    pub fn like_count(&self, article_id: ArticleId) -> RepoResult<u64> {
        self.repo.like_count(article_id)
    }

    /// Articles the user has liked.
    pub fn liked_article_ids(&self, user_id: UserId) -> RepoResult<Vec<ArticleId>> {
        self.repo.liked_article_ids(user_id)
    }

    /// Users who liked the article.
    pub fn users_who_liked(&self, article_id: ArticleId) -> RepoResult<Vec<UserId>> {
        self.repo.users_who_liked(article_id)
    }
}
