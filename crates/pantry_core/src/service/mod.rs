//! Inventory use-case services.
//!
//! # Responsibility
//! - Run the create/edit workflow for the working item.
//! - Orchestrate store calls, cache refreshes and derived views per session.

pub mod editor;
pub mod session;
