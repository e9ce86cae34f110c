//! Derivation of the visible item subset.
//!
//! # Responsibility
//! - Apply filter controls and free-text search to cached items.
//! - Coalesce search-as-you-type input before recomputation.

pub mod debounce;
pub mod filter;
