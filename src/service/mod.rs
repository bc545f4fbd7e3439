//! Facade services over the repository layer.
//!
//! # Responsibility
//! - Expose named, pre-composed filter presets for calling collaborators.
//! - Keep outer layers (HTTP, FFI, jobs) decoupled from filter mechanics.
//!
//! # Invariants
//! - Search presets are pure reads: no mutation, no side effects beyond
//!   diagnostics.
//! - Reserved/exclusion categories are caller parameters, never literals
//!   baked into this layer.

pub mod board_service;
pub mod file_service;
pub mod like_service;
