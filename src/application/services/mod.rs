//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, ChildSource)
//! but are themselves concrete structs, not traits.

mod kanban;
mod loader;
mod seed;
mod tree;

pub use kanban::KanbanSession;
pub use loader::{LazyLoader, LoadResponse};
pub use seed::{ForestFile, SeedService};
pub use tree::{LoadStatus, TreeEffect, TreeSession};

use crate::application::{ApplicationError, ApplicationResult};

/// Trim user-entered text and reject it if nothing is left.
pub(crate) fn require_text<'a>(text: &'a str, what: &'static str) -> ApplicationResult<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ApplicationError::EmptyText { what });
    }
    Ok(trimmed)
}
