//! Read-only projections of a snapshot for the three board views.
//!
//! All projections borrow from the snapshot and never touch storage.

pub mod calendar;
pub mod kanban;
pub mod list;
