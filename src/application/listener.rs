//! Change notification boundary.

use std::sync::Mutex;

use crate::domain::{Board, DiscardReason, Forest, LoadError, NodeId};

/// Something a session reports after it changed state.
#[derive(Debug, Clone, Copy)]
pub enum ChangeEvent<'a> {
    Board(&'a Board),
    Forest(&'a Forest),
    LoadFailed {
        node: &'a NodeId,
        cause: &'a LoadError,
    },
    LoadDiscarded {
        node: &'a NodeId,
        reason: DiscardReason,
    },
}

/// Receives every successful mutation and every load failure or discard.
///
/// Hosts hook persistence, logging or sync in here.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, event: &ChangeEvent<'_>);
}

/// Owned summary of a [`ChangeEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    Board { cards: usize },
    Forest { nodes: usize },
    LoadFailed { node: NodeId, cause: LoadError },
    LoadDiscarded { node: NodeId, reason: DiscardReason },
}

impl From<&ChangeEvent<'_>> for RecordedEvent {
    fn from(event: &ChangeEvent<'_>) -> Self {
        match *event {
            ChangeEvent::Board(board) => RecordedEvent::Board {
                cards: board.card_count(),
            },
            ChangeEvent::Forest(forest) => RecordedEvent::Forest {
                nodes: forest.len(),
            },
            ChangeEvent::LoadFailed { node, cause } => RecordedEvent::LoadFailed {
                node: node.clone(),
                cause: cause.clone(),
            },
            ChangeEvent::LoadDiscarded { node, reason } => RecordedEvent::LoadDiscarded {
                node: node.clone(),
                reason,
            },
        }
    }
}

/// Keeps every event it sees, in order.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ChangeListener for RecordingListener {
    fn on_change(&self, event: &ChangeEvent<'_>) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.into());
        }
    }
}
