//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{KanbanSession, SeedService, TreeSession};
use crate::config::Settings;
use crate::domain::{Board, Forest, IdGenerator};
use crate::infrastructure::logging::TracingListener;
use crate::infrastructure::traits::{
    ChildSource, FailingChildSource, FileSystem, RealFileSystem, SimulatedChildSource,
};

/// Container holding the shared dependencies of every session.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Mints card and node ids
    pub ids: Arc<dyn IdGenerator>,

    /// Where lazily loaded children come from
    pub children: Arc<dyn ChildSource>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let ids = settings.ids.generator();
        let children: Arc<dyn ChildSource> = if settings.lazy_load.fail {
            Arc::new(FailingChildSource::new("configured to fail"))
        } else {
            Arc::new(SimulatedChildSource::new(
                settings.lazy_load.delay(),
                settings.lazy_load.batch,
                Arc::clone(&ids),
            ))
        };
        Self::with_deps(settings, Arc::new(RealFileSystem), ids, children)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        ids: Arc<dyn IdGenerator>,
        children: Arc<dyn ChildSource>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            ids,
            children,
        }
    }

    pub fn seed_service(&self) -> SeedService {
        SeedService::new(Arc::clone(&self.fs))
    }

    /// Kanban session over `board`, logging changes through tracing.
    pub fn kanban_session(&self, board: Board) -> KanbanSession {
        let mut session = KanbanSession::new(board, Arc::clone(&self.ids));
        session.subscribe(Arc::new(TracingListener));
        session
    }

    /// Tree session over `forest`, logging changes through tracing.
    pub fn tree_session(&self, forest: Forest) -> TreeSession {
        let mut session = TreeSession::new(forest, Arc::clone(&self.ids));
        session.subscribe(Arc::new(TracingListener));
        session
    }
}
