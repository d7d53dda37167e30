//! Tree session
//!
//! Owns the current forest, runs actions through the engine, turns expand
//! gestures on unloaded nodes into load requests and reconciles load
//! responses against the latest forest.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::actions::TreeAction;
use crate::application::listener::{ChangeEvent, ChangeListener};
use crate::application::ApplicationResult;
use crate::domain::{
    Children, DiscardReason, Forest, IdGenerator, LoadError, LoadResolution, LoadTicket, NodeId,
    NodeSeed, Outcome,
};
use crate::infrastructure::traits::ChildSource;

use super::loader::{LazyLoader, LoadResponse};
use super::require_text;

/// What the host has to do after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEffect {
    Unchanged,
    Changed,
    /// The forest changed and children must be fetched for this ticket.
    Load(LoadTicket),
}

/// How a load response was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Applied,
    Failed(LoadError),
    Discarded(DiscardReason),
}

pub struct TreeSession {
    forest: Forest,
    ids: Arc<dyn IdGenerator>,
    listeners: Vec<Arc<dyn ChangeListener>>,
}

impl TreeSession {
    /// Every id already in `forest` is reserved with `ids`, so nodes minted
    /// later (including by a child source sharing `ids`) never collide.
    pub fn new(forest: Forest, ids: Arc<dyn IdGenerator>) -> Self {
        for idx in forest.iter() {
            if let Some(node) = forest.get(idx) {
                ids.reserve(node.id().as_str());
            }
        }
        Self {
            forest,
            ids,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Arc<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    #[instrument(level = "debug", skip(self))]
    pub fn apply(&mut self, action: TreeAction) -> ApplicationResult<TreeEffect> {
        let effect = match action {
            TreeAction::Toggle { node } => self.toggle(&node),
            TreeAction::AddChild { parent, name } => {
                let name = require_text(&name, "node name")?;
                match self.forest.add_child(&parent, name, self.ids.as_ref()) {
                    Outcome::Changed((forest, _)) => self.commit(forest),
                    Outcome::Unchanged => TreeEffect::Unchanged,
                }
            }
            TreeAction::AddRoot { name } => {
                let name = require_text(&name, "node name")?;
                let (forest, _) = self.forest.add_root(name, self.ids.as_ref());
                self.commit(forest)
            }
            TreeAction::Edit { node, name } => {
                let name = require_text(&name, "node name")?;
                let outcome = self.forest.edit_node(&node, name);
                self.apply_outcome(outcome)
            }
            TreeAction::Delete { node } => {
                let outcome = self.forest.delete_node(&node);
                self.apply_outcome(outcome)
            }
            TreeAction::Move { source, target } => {
                let outcome = self.forest.move_node(&source, &target);
                self.apply_outcome(outcome)
            }
            TreeAction::Load { node } => self.request_load(&node),
        };
        Ok(effect)
    }

    /// Expand or collapse a node.
    ///
    /// Expanding a node whose children were never fetched also issues a load.
    fn toggle(&mut self, id: &NodeId) -> TreeEffect {
        let needs_load = self.forest.node(id).is_some_and(|node| {
            !node.is_expanded()
                && matches!(node.children(), Children::Unknown)
                && !node.has_loaded()
                && !node.is_loading()
        });
        let Some(toggled) = self.forest.toggle_expand(id).changed() else {
            return TreeEffect::Unchanged;
        };
        if !needs_load {
            return self.commit(toggled);
        }
        match toggled.begin_load(id) {
            Outcome::Changed((forest, ticket)) => {
                self.commit(forest);
                TreeEffect::Load(ticket)
            }
            Outcome::Unchanged => self.commit(toggled),
        }
    }

    /// Issue a load for `id` unless one is already in flight.
    fn request_load(&mut self, id: &NodeId) -> TreeEffect {
        if self.forest.node(id).is_some_and(|node| node.is_loading()) {
            debug!("load already in flight for {}", id);
            return TreeEffect::Unchanged;
        }
        match self.forest.begin_load(id) {
            Outcome::Changed((forest, ticket)) => {
                self.commit(forest);
                TreeEffect::Load(ticket)
            }
            Outcome::Unchanged => TreeEffect::Unchanged,
        }
    }

    /// Reconcile a fetch result with the current forest and notify listeners.
    #[instrument(level = "debug", skip(self, result))]
    pub fn resolve_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<NodeSeed>, LoadError>,
    ) -> LoadStatus {
        match self.forest.complete_load(ticket, result) {
            LoadResolution::Applied(forest) => {
                self.commit(forest);
                LoadStatus::Applied
            }
            LoadResolution::Failed {
                forest,
                node,
                cause,
            } => {
                warn!("load failed for {}: {}", node, cause);
                self.commit(forest);
                self.notify(&ChangeEvent::LoadFailed {
                    node: &node,
                    cause: &cause,
                });
                LoadStatus::Failed(cause)
            }
            LoadResolution::Discarded { reason, forest } => {
                debug!("load response for {} discarded: {:?}", ticket.node, reason);
                if let Outcome::Changed(forest) = forest {
                    self.commit(forest);
                }
                self.notify(&ChangeEvent::LoadDiscarded {
                    node: &ticket.node,
                    reason,
                });
                LoadStatus::Discarded(reason)
            }
        }
    }

    /// Fetch and apply a single load, awaiting the source directly.
    pub async fn load_now(&mut self, ticket: LoadTicket, source: &dyn ChildSource) -> LoadStatus {
        let result = source.fetch_children(&ticket.node).await;
        self.resolve_load(&ticket, result)
    }

    /// Apply every response the loader has already received.
    pub fn drain(&mut self, loader: &mut LazyLoader) -> Vec<LoadStatus> {
        let mut statuses = Vec::new();
        while let Some(LoadResponse { ticket, result }) = loader.try_next() {
            statuses.push(self.resolve_load(&ticket, result));
        }
        statuses
    }

    /// Wait for every in-flight load and apply the responses as they arrive.
    pub async fn settle(&mut self, loader: &mut LazyLoader) -> Vec<LoadStatus> {
        let mut statuses = Vec::new();
        while let Some(LoadResponse { ticket, result }) = loader.next().await {
            statuses.push(self.resolve_load(&ticket, result));
        }
        statuses
    }

    fn apply_outcome(&mut self, outcome: Outcome<Forest>) -> TreeEffect {
        match outcome {
            Outcome::Changed(forest) => self.commit(forest),
            Outcome::Unchanged => TreeEffect::Unchanged,
        }
    }

    fn commit(&mut self, forest: Forest) -> TreeEffect {
        self.forest = forest;
        let event = ChangeEvent::Forest(&self.forest);
        for listener in &self.listeners {
            listener.on_change(&event);
        }
        TreeEffect::Changed
    }

    fn notify(&self, event: &ChangeEvent<'_>) {
        for listener in &self.listeners {
            listener.on_change(event);
        }
    }
}
