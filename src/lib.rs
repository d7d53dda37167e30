//! Mutation engines for a drag-and-drop kanban board and a lazily loaded
//! tree view.
//!
//! Every edit is a pure function from the current state to either a new
//! state or [`domain::Outcome::Unchanged`]; sessions in [`application`]
//! hold the current state and notify listeners.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
