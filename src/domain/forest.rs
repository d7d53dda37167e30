//! Tree mutation engine.
//!
//! Operations read the current forest and return an [`Outcome`] with a fresh
//! copy; the receiver is left untouched. Unknown ids are a silent no-op.

use tracing::{debug, instrument};

use crate::domain::arena::{Children, Forest, NodeLocation, TreeNode};
use crate::domain::ids::{mint_unique, IdGenerator, IdKind, NodeId};
use crate::domain::outcome::Outcome;

impl Forest {
    /// Locate a node: its arena index, parent and position among siblings.
    pub fn find(&self, id: &NodeId) -> Option<NodeLocation> {
        self.index_of(id).and_then(|idx| self.locate(idx))
    }

    /// Flip the expanded flag. Known leaves have nothing to reveal.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle_expand(&self, id: &NodeId) -> Outcome<Forest> {
        let Some(idx) = self.index_of(id) else {
            return Outcome::Unchanged;
        };
        if matches!(self.get(idx).map(TreeNode::children), Some(Children::Leaf)) {
            return Outcome::Unchanged;
        }
        let mut next = self.clone();
        if let Some(node) = next.get_mut(idx) {
            node.expanded = !node.expanded;
        }
        Outcome::Changed(next)
    }

    /// Append a new child under `parent` and expand the parent.
    #[instrument(level = "debug", skip(self, ids))]
    pub fn add_child(
        &self,
        parent: &NodeId,
        name: &str,
        ids: &dyn IdGenerator,
    ) -> Outcome<(Forest, NodeId)> {
        let Some(parent_idx) = self.index_of(parent) else {
            return Outcome::Unchanged;
        };
        let mut next = self.clone();
        let id = NodeId::new(mint_unique(ids, IdKind::Node, |c| {
            self.contains(&NodeId::from(c))
        }));
        next.insert_node(
            TreeNode::new(id.clone(), name.to_string(), Children::Unknown),
            Some(parent_idx),
        );
        next.touch(parent_idx);
        if let Some(node) = next.get_mut(parent_idx) {
            node.expanded = true;
        }
        debug!("add_child: {} under {}", id, parent);
        Outcome::Changed((next, id))
    }

    /// Append a new root node.
    #[instrument(level = "debug", skip(self, ids))]
    pub fn add_root(&self, name: &str, ids: &dyn IdGenerator) -> (Forest, NodeId) {
        let mut next = self.clone();
        let id = NodeId::new(mint_unique(ids, IdKind::Node, |c| {
            self.contains(&NodeId::from(c))
        }));
        next.insert_node(
            TreeNode::new(id.clone(), name.to_string(), Children::Unknown),
            None,
        );
        (next, id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn edit_node(&self, id: &NodeId, name: &str) -> Outcome<Forest> {
        let Some(idx) = self.index_of(id) else {
            return Outcome::Unchanged;
        };
        if self.get(idx).map(TreeNode::name) == Some(name) {
            return Outcome::Unchanged;
        }
        let mut next = self.clone();
        if let Some(node) = next.get_mut(idx) {
            node.name = name.to_string();
        }
        Outcome::Changed(next)
    }

    /// Remove a node together with its whole subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_node(&self, id: &NodeId) -> Outcome<Forest> {
        let Some(idx) = self.index_of(id) else {
            return Outcome::Unchanged;
        };
        let mut next = self.clone();
        let Some(location) = next.detach(idx) else {
            return Outcome::Unchanged;
        };
        if let Some(parent) = location.parent {
            next.touch(parent);
        }
        let removed = next.remove_subtree(idx);
        debug!("delete_node: removed {} nodes", removed);
        Outcome::Changed(next)
    }

    /// Move the subtree rooted at `source` onto `target`.
    ///
    /// Lazy (`Unknown`) and branch targets adopt the source as their last
    /// child. A known-leaf target gets the source as a sibling: after it when
    /// the source's index among its siblings is lower than the target's,
    /// before it otherwise.
    /// Moving a node onto itself or into its own subtree is rejected.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&self, source: &NodeId, target: &NodeId) -> Outcome<Forest> {
        let (Some(src), Some(dst)) = (self.index_of(source), self.index_of(target)) else {
            return Outcome::Unchanged;
        };
        if src == dst || self.is_descendant(src, dst) {
            debug!("move_node: rejected, target inside source subtree");
            return Outcome::Unchanged;
        }
        let (Some(src_loc), Some(dst_loc)) = (self.locate(src), self.locate(dst)) else {
            return Outcome::Unchanged;
        };
        let Some(target_node) = self.get(dst) else {
            return Outcome::Unchanged;
        };

        let mut next = self.clone();
        match target_node.children() {
            Children::Unknown | Children::Branch(_) => {
                if src_loc.parent == Some(dst) && self.siblings(Some(dst)).last() == Some(&src) {
                    return Outcome::Unchanged;
                }
                next.detach(src);
                let end = next.siblings(Some(dst)).len();
                next.attach(src, Some(dst), end);
                next.touch(dst);
            }
            Children::Leaf => {
                // positions compared before the source is taken out, whatever the parents
                let after = src_loc.position < dst_loc.position;
                next.detach(src);
                let Some(dst_now) = next.locate(dst) else {
                    return Outcome::Unchanged;
                };
                let at = if after {
                    dst_now.position + 1
                } else {
                    dst_now.position
                };
                next.attach(src, dst_now.parent, at);
                if let Some(parent) = dst_now.parent {
                    next.touch(parent);
                }
            }
        }
        if let Some(old_parent) = src_loc.parent {
            next.touch(old_parent);
        }
        debug!("move_node: {} -> {}", source, target);
        Outcome::Changed(next)
    }
}
