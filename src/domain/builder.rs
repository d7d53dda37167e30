//! Forest builder: turns nested node seeds into an arena forest and back.

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::{Children, Forest, TreeNode};
use crate::domain::error::DomainError;
use crate::domain::ids::NodeId;

/// Nested description of a node, as found in seed files and fetch results.
///
/// `children` keeps the three states apart: absent means not yet known
/// (lazy-loadable), an empty list means a known leaf, anything else a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSeed {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeSeed>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub loaded: bool,
}

impl NodeSeed {
    /// A node whose children are not known yet.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: None,
            expanded: false,
            loaded: false,
        }
    }

    /// A node known to have no children.
    pub fn leaf(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            children: Some(Vec::new()),
            ..Self::new(id, name)
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeSeed>) -> Self {
        self.children = Some(children.into_iter().collect());
        self
    }

    pub fn expanded(mut self) -> Self {
        self.expanded = true;
        self
    }
}

/// Constructs forests from node seeds.
pub struct ForestBuilder;

impl ForestBuilder {
    /// Build a forest whose roots are `seeds`.
    #[instrument(level = "debug", skip(seeds), fields(roots = seeds.len()))]
    pub fn build(seeds: &[NodeSeed]) -> Result<Forest, DomainError> {
        let mut forest = Forest::new();
        Self::graft(&mut forest, None, seeds)?;
        debug!("built forest with {} nodes", forest.len());
        Ok(forest)
    }

    /// Append `seeds` (with their subtrees) under `parent`, or as roots.
    ///
    /// Fails on the first id already present in `forest`; nodes inserted
    /// before the failure remain, so callers graft onto a scratch copy.
    pub fn graft(
        forest: &mut Forest,
        parent: Option<Index>,
        seeds: &[NodeSeed],
    ) -> Result<(), DomainError> {
        // Explicit stack; children pushed in reverse so siblings keep their order
        let mut stack: Vec<(&NodeSeed, Option<Index>)> =
            seeds.iter().rev().map(|s| (s, parent)).collect();

        while let Some((seed, parent_idx)) = stack.pop() {
            if seed.id.as_str().trim().is_empty() {
                return Err(DomainError::InvalidSeed {
                    message: format!("node {:?} has an empty id", seed.name),
                });
            }
            if forest.contains(&seed.id) {
                return Err(DomainError::DuplicateId {
                    kind: "node",
                    id: seed.id.to_string(),
                });
            }

            let children = match &seed.children {
                None => Children::Unknown,
                Some(_) => Children::Leaf,
            };
            let mut node = TreeNode::new(seed.id.clone(), seed.name.clone(), children);
            node.expanded = seed.expanded;
            node.loaded = seed.loaded;
            let idx = forest.insert_node(node, parent_idx);

            if let Some(children) = &seed.children {
                for child in children.iter().rev() {
                    stack.push((child, Some(idx)));
                }
            }
        }
        Ok(())
    }

    /// Export a forest back into nested seeds.
    pub fn to_seeds(forest: &Forest) -> Vec<NodeSeed> {
        forest
            .roots()
            .iter()
            .filter_map(|&root| Self::seed_of(forest, root))
            .collect()
    }

    fn seed_of(forest: &Forest, idx: Index) -> Option<NodeSeed> {
        let node = forest.get(idx)?;
        let children = match node.children() {
            Children::Unknown => None,
            Children::Leaf => Some(Vec::new()),
            Children::Branch(children) => Some(
                children
                    .iter()
                    .filter_map(|&child| Self::seed_of(forest, child))
                    .collect(),
            ),
        };
        Some(NodeSeed {
            id: node.id().clone(),
            name: node.name().to_string(),
            children,
            expanded: node.is_expanded(),
            loaded: node.has_loaded(),
        })
    }
}

impl Forest {
    /// Convenience for [`ForestBuilder::build`].
    pub fn from_seeds(seeds: &[NodeSeed]) -> Result<Self, DomainError> {
        ForestBuilder::build(seeds)
    }

    pub fn to_seeds(&self) -> Vec<NodeSeed> {
        ForestBuilder::to_seeds(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_map_onto_three_child_states() {
        let forest = Forest::from_seeds(&[
            NodeSeed::new("lazy", "Lazy"),
            NodeSeed::leaf("leaf", "Leaf"),
            NodeSeed::new("dir", "Dir").with_children([NodeSeed::leaf("f", "F")]),
        ])
        .unwrap();

        assert_eq!(forest.node(&"lazy".into()).unwrap().children(), &Children::Unknown);
        assert_eq!(forest.node(&"leaf".into()).unwrap().children(), &Children::Leaf);
        assert!(matches!(
            forest.node(&"dir".into()).unwrap().children(),
            Children::Branch(c) if c.len() == 1
        ));
    }

    #[test]
    fn duplicate_ids_across_levels_are_rejected() {
        let result = Forest::from_seeds(&[
            NodeSeed::new("a", "A").with_children([NodeSeed::new("x", "X")]),
            NodeSeed::new("x", "again"),
        ]);
        assert!(matches!(result, Err(DomainError::DuplicateId { .. })));
    }

    #[test]
    fn empty_ids_are_rejected() {
        let result = Forest::from_seeds(&[NodeSeed::new(" ", "blank")]);
        assert!(matches!(result, Err(DomainError::InvalidSeed { .. })));
    }

    #[test]
    fn export_keeps_shape_and_order() {
        let seeds = vec![NodeSeed::new("r", "Root")
            .expanded()
            .with_children([NodeSeed::leaf("a", "A"), NodeSeed::new("b", "B")])];
        let forest = Forest::from_seeds(&seeds).unwrap();
        assert_eq!(forest.to_seeds(), seeds);
    }
}
