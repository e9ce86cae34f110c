//! In-memory mirror of the owner's item collection.
//!
//! # Invariants
//! - The cache only changes through a complete refresh.
//! - A failed refresh leaves the previous contents untouched.

pub mod cache;
