//! Typed user actions.
//!
//! These are the calls a presentation layer makes after translating a click
//! or a drag gesture. They double as the script format of the CLI:
//!
//! ```toml
//! [[action]]
//! op = "move_card"
//! card = "card-a"
//! column = "done"
//! index = 0
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{CardId, ColumnId, DropTarget, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum KanbanAction {
    AddCard {
        column: ColumnId,
        title: String,
    },
    EditCard {
        card: CardId,
        title: String,
    },
    DeleteCard {
        card: CardId,
    },
    /// Without an index the card goes to the end of the column.
    MoveCard {
        card: CardId,
        column: ColumnId,
        #[serde(default)]
        index: Option<usize>,
    },
    DropCard {
        card: CardId,
        target: DropTarget,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TreeAction {
    Toggle { node: NodeId },
    AddChild { parent: NodeId, name: String },
    AddRoot { name: String },
    Edit { node: NodeId, name: String },
    Delete { node: NodeId },
    Move { source: NodeId, target: NodeId },
    Load { node: NodeId },
}

/// A file of actions: a TOML `[[action]]` array or a JSON `{"action": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionScript<A> {
    #[serde(rename = "action", default = "Vec::new")]
    pub actions: Vec<A>,
}

impl fmt::Display for KanbanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KanbanAction::AddCard { column, title } => write!(f, "add card {:?} to {}", title, column),
            KanbanAction::EditCard { card, title } => write!(f, "rename card {} to {:?}", card, title),
            KanbanAction::DeleteCard { card } => write!(f, "delete card {}", card),
            KanbanAction::MoveCard {
                card,
                column,
                index: Some(index),
            } => write!(f, "move card {} to {}[{}]", card, column, index),
            KanbanAction::MoveCard { card, column, .. } => {
                write!(f, "move card {} to end of {}", card, column)
            }
            KanbanAction::DropCard {
                card,
                target: DropTarget::Card(over),
            } => write!(f, "drop card {} on card {}", card, over),
            KanbanAction::DropCard {
                card,
                target: DropTarget::Column(column),
            } => write!(f, "drop card {} on column {}", card, column),
        }
    }
}

impl fmt::Display for TreeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeAction::Toggle { node } => write!(f, "toggle {}", node),
            TreeAction::AddChild { parent, name } => write!(f, "add {:?} under {}", name, parent),
            TreeAction::AddRoot { name } => write!(f, "add root {:?}", name),
            TreeAction::Edit { node, name } => write!(f, "rename {} to {:?}", node, name),
            TreeAction::Delete { node } => write!(f, "delete {}", node),
            TreeAction::Move { source, target } => write!(f, "move {} onto {}", source, target),
            TreeAction::Load { node } => write!(f, "load children of {}", node),
        }
    }
}
