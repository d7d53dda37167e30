//! Lazy child loading as an explicit request/response protocol.
//!
//! [`Forest::begin_load`] marks a node as loading and hands out a
//! [`LoadTicket`]. Whoever fetches the children later calls
//! [`Forest::complete_load`] with the ticket; the result is reconciled against
//! whatever the forest looks like at that moment.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{Children, Forest};
use crate::domain::builder::{ForestBuilder, NodeSeed};
use crate::domain::error::DomainError;
use crate::domain::ids::NodeId;
use crate::domain::outcome::Outcome;

/// Receipt for one pending load of a node's children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub node: NodeId,
    pub generation: u64,
}

/// Why fetching children failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("child source unavailable: {message}")]
    Unavailable { message: String },

    #[error("fetched child id already in use: {0}")]
    DuplicateId(NodeId),
}

/// Why a load response was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The node was deleted while the fetch was in flight.
    NodeRemoved,
    /// A newer load for the same node was issued.
    Superseded,
    /// The node's children were edited while the fetch was in flight.
    Conflicted,
}

/// Result of reconciling a load response with the current forest.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResolution {
    Applied(Forest),
    Failed {
        forest: Forest,
        node: NodeId,
        cause: LoadError,
    },
    Discarded {
        reason: DiscardReason,
        forest: Outcome<Forest>,
    },
}

impl LoadResolution {
    /// The forest to continue with, if the resolution changed anything.
    pub fn forest(&self) -> Option<&Forest> {
        match self {
            LoadResolution::Applied(forest) | LoadResolution::Failed { forest, .. } => Some(forest),
            LoadResolution::Discarded {
                forest: Outcome::Changed(forest),
                ..
            } => Some(forest),
            LoadResolution::Discarded { .. } => None,
        }
    }
}

impl Forest {
    /// Mark `id` as loading and issue a ticket for the fetch.
    ///
    /// Issuing a new ticket for a node that is already loading supersedes the
    /// earlier one.
    #[instrument(level = "debug", skip(self))]
    pub fn begin_load(&self, id: &NodeId) -> Outcome<(Forest, LoadTicket)> {
        let Some(idx) = self.index_of(id) else {
            return Outcome::Unchanged;
        };
        let mut next = self.clone();
        next.touch(idx);
        let Some(node) = next.get_mut(idx) else {
            return Outcome::Unchanged;
        };
        node.loading = Some(node.generation);
        let ticket = LoadTicket {
            node: id.clone(),
            generation: node.generation,
        };
        debug!("begin_load: {} gen {}", ticket.node, ticket.generation);
        Outcome::Changed((next, ticket))
    }

    /// Apply a fetch result for `ticket` to the current forest.
    #[instrument(level = "debug", skip(self, result), fields(node = %ticket.node))]
    pub fn complete_load(
        &self,
        ticket: &LoadTicket,
        result: Result<Vec<NodeSeed>, LoadError>,
    ) -> LoadResolution {
        let Some(idx) = self.index_of(&ticket.node) else {
            debug!("complete_load: node removed");
            return LoadResolution::Discarded {
                reason: DiscardReason::NodeRemoved,
                forest: Outcome::Unchanged,
            };
        };
        let Some(node) = self.get(idx) else {
            return LoadResolution::Discarded {
                reason: DiscardReason::NodeRemoved,
                forest: Outcome::Unchanged,
            };
        };
        if node.loading != Some(ticket.generation) {
            debug!("complete_load: superseded");
            return LoadResolution::Discarded {
                reason: DiscardReason::Superseded,
                forest: Outcome::Unchanged,
            };
        }

        let mut cleared = self.clone();
        if let Some(node) = cleared.get_mut(idx) {
            node.loading = None;
        }

        if node.generation != ticket.generation {
            debug!("complete_load: children edited during load");
            return LoadResolution::Discarded {
                reason: DiscardReason::Conflicted,
                forest: Outcome::Changed(cleared),
            };
        }

        let seeds = match result {
            Ok(seeds) => seeds,
            Err(cause) => {
                warn!("load of {} failed: {}", ticket.node, cause);
                return LoadResolution::Failed {
                    forest: cleared,
                    node: ticket.node.clone(),
                    cause,
                };
            }
        };

        let mut next = cleared.clone();
        let old_children = next.get(idx).map(|n| n.children().as_slice().to_vec());
        for child in old_children.unwrap_or_default() {
            next.detach(child);
            next.remove_subtree(child);
        }
        if let Some(node) = next.get_mut(idx) {
            node.children = Children::Leaf;
        }
        if let Err(err) = ForestBuilder::graft(&mut next, Some(idx), &seeds) {
            warn!("load of {} rejected: {}", ticket.node, err);
            let cause = match err {
                DomainError::DuplicateId { id, .. } => LoadError::DuplicateId(NodeId::new(id)),
                other => LoadError::Unavailable {
                    message: other.to_string(),
                },
            };
            return LoadResolution::Failed {
                forest: cleared,
                node: ticket.node.clone(),
                cause,
            };
        }
        next.touch(idx);
        if let Some(node) = next.get_mut(idx) {
            node.loaded = true;
            node.expanded = true;
        }
        debug!("complete_load: attached {} children", seeds.len());
        LoadResolution::Applied(next)
    }
}
