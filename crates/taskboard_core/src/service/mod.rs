//! Core use-case services.
//!
//! # Responsibility
//! - Translate drop gestures into persistent reorders.
//! - Orchestrate repository calls and snapshot reloads for callers.

pub mod board_session;
pub mod reorder;
