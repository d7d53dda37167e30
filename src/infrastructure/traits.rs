//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::{IdGenerator, IdKind, LoadError, NodeId, NodeSeed};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// External data source for lazily loaded children.
///
/// Sources that mint ids from the session's [`IdGenerator`] stay clear of
/// seeded ids, because sessions reserve every id they start with.
#[async_trait]
pub trait ChildSource: Send + Sync {
    /// Fetch the children of `node`. Every returned node carries a fresh id.
    async fn fetch_children(&self, node: &NodeId) -> Result<Vec<NodeSeed>, LoadError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Stand-in for a remote source: waits a fixed delay, then returns `batch`
/// fresh lazy-loadable nodes.
pub struct SimulatedChildSource {
    delay: Duration,
    batch: usize,
    ids: Arc<dyn IdGenerator>,
}

impl SimulatedChildSource {
    pub fn new(delay: Duration, batch: usize, ids: Arc<dyn IdGenerator>) -> Self {
        Self { delay, batch, ids }
    }
}

#[async_trait]
impl ChildSource for SimulatedChildSource {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_children(&self, node: &NodeId) -> Result<Vec<NodeSeed>, LoadError> {
        tokio::time::sleep(self.delay).await;
        let children: Vec<NodeSeed> = (1..=self.batch)
            .map(|n| NodeSeed::new(self.ids.next_id(IdKind::Node), format!("Loaded item {}", n)))
            .collect();
        debug!("fetched {} children for {}", children.len(), node);
        Ok(children)
    }
}

/// Source that never succeeds, for exercising failure handling.
#[derive(Debug, Clone)]
pub struct FailingChildSource {
    message: String,
}

impl FailingChildSource {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ChildSource for FailingChildSource {
    async fn fetch_children(&self, _node: &NodeId) -> Result<Vec<NodeSeed>, LoadError> {
        Err(LoadError::Unavailable {
            message: self.message.clone(),
        })
    }
}
