//! Domain layer: snapshots and the pure mutation engines
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod forest;
pub mod ids;
pub mod kanban;
pub mod lazy;
pub mod outcome;

pub use arena::{Children, Forest, NodeLocation, TreeNode, VisibleRow};
pub use builder::{ForestBuilder, NodeSeed};
pub use entities::{Card, CardSlot, Column, DropTarget};
pub use error::DomainError;
pub use ids::{CardId, ColumnId, IdGenerator, IdKind, NodeId, SequentialIds, UuidIds};
pub use kanban::Board;
pub use lazy::{DiscardReason, LoadError, LoadResolution, LoadTicket};
pub use outcome::Outcome;
