//! Application layer: sessions and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod actions;
pub mod defaults;
pub mod error;
pub mod error_ext;
pub mod listener;
pub mod services;

pub use actions::{ActionScript, KanbanAction, TreeAction};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use listener::{ChangeEvent, ChangeListener, RecordedEvent, RecordingListener};
