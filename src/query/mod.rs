//! Composable filtered-list query mechanics.
//!
//! # Responsibility
//! - Translate structured filter specs into SQL predicates with binds.
//! - Run count+fetch pagination windows with deterministic ordering.
//!
//! # Invariants
//! - Predicate composition is pure AND over provided fields; field order
//!   never changes the match set.
//! - User text never reaches SQL outside positional binds.

pub mod filter;
pub mod page;
