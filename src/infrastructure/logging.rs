//! Change listener that reports to tracing.

use tracing::{info, warn};

use crate::application::{ChangeEvent, ChangeListener};

#[derive(Debug, Default)]
pub struct TracingListener;

impl ChangeListener for TracingListener {
    fn on_change(&self, event: &ChangeEvent<'_>) {
        match event {
            ChangeEvent::Board(board) => info!(
                columns = board.columns().len(),
                cards = board.card_count(),
                "board changed"
            ),
            ChangeEvent::Forest(forest) => {
                info!(nodes = forest.len(), depth = forest.depth(), "forest changed")
            }
            ChangeEvent::LoadFailed { node, cause } => {
                warn!(node = %node, "loading children failed: {}", cause)
            }
            ChangeEvent::LoadDiscarded { node, reason } => {
                info!(node = %node, ?reason, "load response discarded")
            }
        }
    }
}
