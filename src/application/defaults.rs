//! Built-in demo data used when no seed file is given.

use crate::domain::{Board, Card, Column, DomainError, Forest, NodeSeed};

/// Three-column board with a few sample cards.
pub fn demo_board() -> Result<Board, DomainError> {
    Board::from_columns(vec![
        Column::new("todo", "To Do").with_cards([
            Card::new("card-a", "Sketch the board layout"),
            Card::new("card-b", "Wire up drag and drop"),
            Card::new("card-c", "Write release notes"),
        ]),
        Column::new("in-progress", "In Progress")
            .with_cards([Card::new("card-d", "Lazy-load tree children")]),
        Column::new("done", "Done").with_cards([Card::new("card-e", "Set up the project")]),
    ])
}

/// A small project tree; `utils` and `docs` load their children on demand.
pub fn demo_forest() -> Result<Forest, DomainError> {
    Forest::from_seeds(&[
        NodeSeed::new("src", "src").expanded().with_children([
            NodeSeed::new("components", "components").with_children([
                NodeSeed::leaf("button", "Button.tsx"),
                NodeSeed::leaf("card", "Card.tsx"),
            ]),
            NodeSeed::new("utils", "utils"),
            NodeSeed::leaf("index", "index.ts"),
        ]),
        NodeSeed::new("docs", "docs"),
        NodeSeed::leaf("readme", "README.md"),
    ])
}
