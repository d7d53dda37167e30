//! Text rendering of boards and forests.

use colored::Colorize;
use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;

use crate::domain::{Board, Children, Forest, TreeNode};

/// Options shared by the renderers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub show_ids: bool,
    /// Ignore the expanded flags and print every node
    pub all: bool,
}

pub trait TreeRender {
    fn to_tree(&self, options: RenderOptions) -> Tree<String>;
}

impl TreeRender for Forest {
    fn to_tree(&self, options: RenderOptions) -> Tree<String> {
        fn build_tree(forest: &Forest, node_idx: Index, options: RenderOptions) -> Option<Tree<String>> {
            let node = forest.get(node_idx)?;
            let mut tree = Tree::new(label(node, options));
            if node.is_expanded() || options.all {
                for &child_idx in node.children().as_slice() {
                    if let Some(child) = build_tree(forest, child_idx, options) {
                        tree.push(child);
                    }
                }
            }
            Some(tree)
        }

        let leaves: Vec<Tree<String>> = self
            .roots()
            .iter()
            .filter_map(|&root| build_tree(self, root, options))
            .collect();
        let title = if self.is_empty() { "(empty)" } else { "." };
        Tree::new(title.to_string()).with_leaves(leaves)
    }
}

/// `▾ name` for open branches, `▸ name` for closed ones, `· name` for leaves.
fn label(node: &TreeNode, options: RenderOptions) -> String {
    let marker = match node.children() {
        Children::Leaf => "·",
        _ if node.is_expanded() => "▾",
        _ => "▸",
    };
    let mut text = format!("{} {}", marker, node.name());
    if node.is_loading() {
        text.push_str(" (loading)");
    } else if matches!(node.children(), Children::Unknown) && !node.has_loaded() {
        text.push_str(" …");
    }
    if options.show_ids {
        text.push_str(&format!(" [{}]", node.id()));
    }
    text
}

/// Columns one after another: a header line, then one line per card.
pub fn board_lines(board: &Board, options: RenderOptions) -> Vec<String> {
    let mut lines = Vec::new();
    for column in board.columns() {
        let header = format!("{} ({})", column.title, column.cards.len());
        lines.push(header.cyan().bold().to_string());
        if column.cards.is_empty() {
            lines.push(format!("  {}", "(no cards)".dimmed()));
        }
        for card in &column.cards {
            if options.show_ids {
                lines.push(format!("  - {} [{}]", card.title, card.id));
            } else {
                lines.push(format!("  - {}", card.title));
            }
        }
    }
    lines
}

/// One-line summary: `To Do: 3 | In Progress: 1 | Done: 1`.
pub fn board_summary(board: &Board) -> String {
    board
        .columns()
        .iter()
        .map(|c| format!("{}: {}", c.title, c.cards.len()))
        .join(" | ")
}
