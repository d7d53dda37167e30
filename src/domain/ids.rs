//! Identifiers and id generation.
//!
//! Ids are opaque strings. Fresh ids are minted by an [`IdGenerator`], which
//! the host injects so tests can use deterministic sequences.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_id!(
    /// Unique id of a kanban card.
    CardId
);
define_id!(
    /// Unique id of a kanban column.
    ColumnId
);
define_id!(
    /// Unique id of a tree node, unique across the whole forest.
    NodeId
);

/// What an id is being minted for. Used as the id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Card,
    Node,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Card => "card",
            IdKind::Node => "node",
        }
    }
}

/// Source of fresh ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, kind: IdKind) -> String;

    /// Note an id that is already in use so later mints never produce it.
    fn reserve(&self, _id: &str) {}
}

/// Random v4 UUIDs, prefixed by kind: `card-0b6f...`.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self, kind: IdKind) -> String {
        format!("{}-{}", kind.prefix(), Uuid::new_v4())
    }
}

/// Monotonic counter shared by all kinds: `card-1`, `node-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, kind: IdKind) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", kind.prefix(), n)
    }

    /// Move the counter past `card-N` / `node-N`; other shapes are ignored.
    fn reserve(&self, id: &str) {
        let taken = [IdKind::Card, IdKind::Node].iter().find_map(|kind| {
            id.strip_prefix(kind.prefix())?
                .strip_prefix('-')?
                .parse::<u64>()
                .ok()
        });
        if let Some(n) = taken {
            self.next.fetch_max(n, Ordering::Relaxed);
        }
    }
}

/// Mint an id that `taken` does not report as already in use.
///
/// Sequential generators can collide with ids that came from a seed file, so
/// every mint goes through this loop.
pub fn mint_unique(ids: &dyn IdGenerator, kind: IdKind, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = ids.next_id(kind);
        if !taken(&candidate) {
            return candidate;
        }
    }
}
