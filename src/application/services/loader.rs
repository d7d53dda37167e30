//! Background child loading
//!
//! Each load ticket becomes a task in a [`JoinSet`] on the tokio runtime.
//! The session collects finished fetches with
//! [`TreeSession::drain`](super::TreeSession::drain) or
//! [`TreeSession::settle`](super::TreeSession::settle). A task that panics
//! or is cancelled still yields a response, as a failed load.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, warn};

use crate::domain::{LoadError, LoadTicket, NodeSeed};
use crate::infrastructure::traits::ChildSource;

/// Message delivered when a fetch completes.
#[derive(Debug)]
pub struct LoadResponse {
    pub ticket: LoadTicket,
    pub result: Result<Vec<NodeSeed>, LoadError>,
}

pub struct LazyLoader {
    source: Arc<dyn ChildSource>,
    handle: Handle,
    tasks: JoinSet<LoadResponse>,
    tickets: HashMap<task::Id, LoadTicket>,
}

impl LazyLoader {
    pub fn new(source: Arc<dyn ChildSource>, handle: Handle) -> Self {
        Self {
            source,
            handle,
            tasks: JoinSet::new(),
            tickets: HashMap::new(),
        }
    }

    /// Start fetching children for `ticket` in the background.
    pub fn request(&mut self, ticket: LoadTicket) {
        debug!("request: {} gen {}", ticket.node, ticket.generation);
        let source = Arc::clone(&self.source);
        let sent = ticket.clone();
        let abort = self.tasks.spawn_on(
            async move {
                let result = source.fetch_children(&sent.node).await;
                LoadResponse {
                    ticket: sent,
                    result,
                }
            },
            &self.handle,
        );
        self.tickets.insert(abort.id(), ticket);
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// A response that has already arrived, without waiting.
    pub fn try_next(&mut self) -> Option<LoadResponse> {
        loop {
            let joined = self.tasks.try_join_next_with_id()?;
            if let Some(response) = self.finish(joined) {
                return Some(response);
            }
        }
    }

    /// Wait for the next response; `None` once nothing is in flight.
    pub async fn next(&mut self) -> Option<LoadResponse> {
        loop {
            let joined = self.tasks.join_next_with_id().await?;
            if let Some(response) = self.finish(joined) {
                return Some(response);
            }
        }
    }

    fn finish(
        &mut self,
        joined: Result<(task::Id, LoadResponse), JoinError>,
    ) -> Option<LoadResponse> {
        match joined {
            Ok((id, response)) => {
                self.tickets.remove(&id);
                Some(response)
            }
            Err(e) => {
                let ticket = self.tickets.remove(&e.id())?;
                let message = if e.is_panic() {
                    "child source panicked"
                } else {
                    "load task cancelled"
                };
                warn!("load of {} ended abnormally: {}", ticket.node, message);
                Some(LoadResponse {
                    ticket,
                    result: Err(LoadError::Unavailable {
                        message: message.to_string(),
                    }),
                })
            }
        }
    }
}
