use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::ids::NodeId;

/// What is known about a node's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    /// Not determined yet; the node may lazy-load children.
    Unknown,
    /// Known to have no children.
    Leaf,
    /// At least one child, in display order.
    Branch(Vec<Index>),
}

impl Children {
    pub fn as_slice(&self) -> &[Index] {
        match self {
            Children::Branch(children) => children,
            Children::Unknown | Children::Leaf => &[],
        }
    }
}

/// Tree node in the arena-based forest.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    /// Index of parent node in the arena, None for root nodes
    pub(crate) parent: Option<Index>,
    pub(crate) children: Children,
    pub(crate) expanded: bool,
    /// Generation of the pending load request, if one is in flight
    pub(crate) loading: Option<u64>,
    pub(crate) loaded: bool,
    /// Bumped whenever a load is issued or the child list is edited
    pub(crate) generation: u64,
}

impl TreeNode {
    pub(crate) fn new(id: NodeId, name: String, children: Children) -> Self {
        Self {
            id,
            name,
            parent: None,
            children,
            expanded: false,
            loading: None,
            loaded: false,
            generation: 0,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Where a node sits: its arena index, parent, and position among siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLocation {
    pub index: Index,
    /// None when the node is a root and its siblings are the root list
    pub parent: Option<Index>,
    pub position: usize,
}

/// Arena-based forest snapshot.
///
/// Nodes live in a generational arena and are addressed by their [`NodeId`]
/// through an index map, so lookups are O(1). Each node keeps its children's
/// indices and a non-owning parent back-reference.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    arena: Arena<TreeNode>,
    roots: Vec<Index>,
    by_id: HashMap<NodeId, Index>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn get(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub(crate) fn get_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn index_of(&self, id: &NodeId) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    pub fn node(&self, id: &NodeId) -> Option<&TreeNode> {
        self.index_of(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Sibling list a node with this parent belongs to.
    pub fn siblings(&self, parent: Option<Index>) -> &[Index] {
        match parent {
            Some(p) => self
                .arena
                .get(p)
                .map(|n| n.children.as_slice())
                .unwrap_or(&[]),
            None => &self.roots,
        }
    }

    pub(crate) fn locate(&self, idx: Index) -> Option<NodeLocation> {
        let node = self.arena.get(idx)?;
        let position = self
            .siblings(node.parent)
            .iter()
            .position(|&s| s == idx)?;
        Some(NodeLocation {
            index: idx,
            parent: node.parent,
            position,
        })
    }

    /// Store a node and append it under `parent` (or as a new root).
    #[instrument(level = "trace", skip(self, node))]
    pub(crate) fn insert_node(&mut self, node: TreeNode, parent: Option<Index>) -> Index {
        let id = node.id.clone();
        let idx = self.arena.insert(node);
        self.by_id.insert(id, idx);
        let end = self.siblings(parent).len();
        self.attach(idx, parent, end);
        idx
    }

    /// Link a stored node into `parent`'s child list at `position` (clamped).
    pub(crate) fn attach(&mut self, idx: Index, parent: Option<Index>, position: usize) {
        match parent {
            Some(p) => {
                if let Some(parent_node) = self.arena.get_mut(p) {
                    match &mut parent_node.children {
                        Children::Branch(children) => {
                            let at = position.min(children.len());
                            children.insert(at, idx);
                        }
                        other => *other = Children::Branch(vec![idx]),
                    }
                }
            }
            None => {
                let at = position.min(self.roots.len());
                self.roots.insert(at, idx);
            }
        }
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = parent;
        }
    }

    /// Unlink a node from its parent's child list. The node stays stored.
    ///
    /// A parent whose last child is removed becomes a known leaf.
    pub(crate) fn detach(&mut self, idx: Index) -> Option<NodeLocation> {
        let location = self.locate(idx)?;
        match location.parent {
            Some(p) => {
                if let Some(parent_node) = self.arena.get_mut(p) {
                    if let Children::Branch(children) = &mut parent_node.children {
                        children.remove(location.position);
                        if children.is_empty() {
                            parent_node.children = Children::Leaf;
                        }
                    }
                }
            }
            None => {
                self.roots.remove(location.position);
            }
        }
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = None;
        }
        Some(location)
    }

    /// Drop a detached subtree from storage.
    pub(crate) fn remove_subtree(&mut self, idx: Index) -> usize {
        let doomed: Vec<Index> = self.subtree(idx).collect();
        for i in &doomed {
            if let Some(node) = self.arena.remove(*i) {
                self.by_id.remove(&node.id);
            }
        }
        doomed.len()
    }

    pub(crate) fn touch(&mut self, idx: Index) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.generation += 1;
        }
    }

    /// True when `node` lies strictly below `ancestor`.
    pub fn is_descendant(&self, ancestor: Index, node: Index) -> bool {
        let mut current = self.arena.get(node).and_then(|n| n.parent);
        while let Some(idx) = current {
            if idx == ancestor {
                return true;
            }
            current = self.arena.get(idx).and_then(|n| n.parent);
        }
        false
    }

    /// Number of nodes in the subtree rooted at `idx`, including itself.
    pub fn subtree_size(&self, idx: Index) -> usize {
        self.subtree(idx).count()
    }

    /// Indices of the subtree rooted at `idx`, in pre-order.
    pub fn subtree(&self, idx: Index) -> TreeIterator<'_> {
        TreeIterator::from_stack(self, vec![idx])
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::from_stack(self, self.roots.iter().rev().copied().collect())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Rows a tree view shows: pre-order, skipping children of collapsed nodes.
    pub fn visible(&self) -> VisibleIterator<'_> {
        VisibleIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get(node_idx) {
            1 + node
                .children
                .as_slice()
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    fn same_subtree(&self, idx: Index, other: &Forest, other_idx: Index) -> bool {
        let (Some(a), Some(b)) = (self.get(idx), other.get(other_idx)) else {
            return false;
        };
        let shallow = a.id == b.id
            && a.name == b.name
            && a.expanded == b.expanded
            && a.loading.is_some() == b.loading.is_some()
            && a.loaded == b.loaded;
        if !shallow {
            return false;
        }
        match (&a.children, &b.children) {
            (Children::Unknown, Children::Unknown) | (Children::Leaf, Children::Leaf) => true,
            (Children::Branch(xs), Children::Branch(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .zip(ys)
                        .all(|(&x, &y)| self.same_subtree(x, other, y))
            }
            _ => false,
        }
    }
}

/// Structural equality: same nodes, names, flags and order.
/// Arena slots and generations do not take part.
impl PartialEq for Forest {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(&a, &b)| self.same_subtree(a, other, b))
    }
}

pub struct TreeIterator<'a> {
    forest: &'a Forest,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn from_stack(forest: &'a Forest, stack: Vec<Index>) -> Self {
        Self { forest, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.as_slice().iter().rev() {
                    self.stack.push(child);
                }
                return Some(current_idx);
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    forest: &'a Forest,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let stack = forest.roots.iter().rev().map(|&r| (r, false)).collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.as_slice().iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

/// One row of the visible tree.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    pub depth: usize,
    pub index: Index,
    pub node: &'a TreeNode,
}

pub struct VisibleIterator<'a> {
    forest: &'a Forest,
    stack: Vec<(Index, usize)>,
}

impl<'a> VisibleIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let stack = forest.roots.iter().rev().map(|&r| (r, 0)).collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for VisibleIterator<'a> {
    type Item = VisibleRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, depth)) = self.stack.pop() {
            if let Some(node) = self.forest.get(index) {
                if node.expanded {
                    for &child in node.children.as_slice().iter().rev() {
                        self.stack.push((child, depth + 1));
                    }
                }
                return Some(VisibleRow { depth, index, node });
            }
        }
        None
    }
}
