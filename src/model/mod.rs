//! Domain model for board content.
//!
//! # Responsibility
//! - Define the entity structs persisted by the repository layer.
//! - Keep write-path validation next to the data it protects.
//!
//! # Invariants
//! - Every entity is identified by a stable integer id assigned by storage.
//! - `Article::category` is never empty; like counts are derived from the
//!   join relation, never stored on the article row.

pub mod article;
pub mod file_attachment;
