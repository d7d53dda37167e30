//! Kanban mutation engine.
//!
//! Every operation reads `&self` and returns an [`Outcome`] holding a fresh
//! board; the receiver is never modified. Unknown ids are a silent no-op.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::entities::{Card, CardSlot, Column, DropTarget};
use crate::domain::error::DomainError;
use crate::domain::ids::{mint_unique, CardId, ColumnId, IdGenerator, IdKind};
use crate::domain::outcome::Outcome;

/// Snapshot of a kanban board: columns in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "BoardSeed", into = "BoardSeed")]
pub struct Board {
    columns: Vec<Column>,
}

/// Serialized shape of a board, validated on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardSeed {
    #[serde(default)]
    columns: Vec<Column>,
}

impl TryFrom<BoardSeed> for Board {
    type Error = DomainError;

    fn try_from(seed: BoardSeed) -> Result<Self, Self::Error> {
        Board::from_columns(seed.columns)
    }
}

impl From<Board> for BoardSeed {
    fn from(board: Board) -> Self {
        Self {
            columns: board.columns,
        }
    }
}

impl Board {
    /// Build a board, rejecting duplicate column or card ids.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, DomainError> {
        let mut column_ids = HashSet::new();
        let mut card_ids = HashSet::new();
        for column in &columns {
            if column.id.as_str().trim().is_empty() {
                return Err(DomainError::InvalidSeed {
                    message: format!("column {:?} has an empty id", column.title),
                });
            }
            if !column_ids.insert(&column.id) {
                return Err(DomainError::DuplicateId {
                    kind: "column",
                    id: column.id.to_string(),
                });
            }
            for card in &column.cards {
                if !card_ids.insert(&card.id) {
                    return Err(DomainError::DuplicateId {
                        kind: "card",
                        id: card.id.to_string(),
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == id)
    }

    /// `(column index, card index)` of a card.
    pub fn locate_card(&self, id: &CardId) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(ci, column)| column.position_of(id).map(|pos| (ci, pos)))
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.locate_card(id)
            .map(|(ci, pos)| &self.columns[ci].cards[pos])
    }

    pub fn iter_cards(&self) -> impl Iterator<Item = &Card> {
        self.columns.iter().flat_map(|c| c.cards.iter())
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    /// Append a new card with a freshly minted id to `column`.
    ///
    /// The title is stored as given; callers validate it.
    #[instrument(level = "debug", skip(self, ids))]
    pub fn add_card(
        &self,
        column: &ColumnId,
        title: &str,
        ids: &dyn IdGenerator,
    ) -> Outcome<(Board, CardId)> {
        let Some(ci) = self.column_index(column) else {
            debug!("add_card: unknown column");
            return Outcome::Unchanged;
        };
        let id = CardId::new(mint_unique(ids, IdKind::Card, |candidate| {
            self.card(&CardId::from(candidate)).is_some()
        }));

        let mut columns = self.columns.clone();
        columns[ci].cards.push(Card::new(id.clone(), title));
        debug!("add_card: added {}", id);
        Outcome::Changed((Board { columns }, id))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn edit_card(&self, card: &CardId, title: &str) -> Outcome<Board> {
        let Some((ci, pos)) = self.locate_card(card) else {
            return Outcome::Unchanged;
        };
        if self.columns[ci].cards[pos].title == title {
            return Outcome::Unchanged;
        }
        let mut columns = self.columns.clone();
        columns[ci].cards[pos].title = title.to_string();
        Outcome::Changed(Board { columns })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_card(&self, card: &CardId) -> Outcome<Board> {
        let Some((ci, pos)) = self.locate_card(card) else {
            return Outcome::Unchanged;
        };
        let mut columns = self.columns.clone();
        columns[ci].cards.remove(pos);
        Outcome::Changed(Board { columns })
    }

    /// Take `card` out of its column and insert it into `target`.
    ///
    /// `CardSlot::Index` is measured against the target column after the card
    /// was removed and clamped to its length, so in `[c1, c2, c3]` moving `c1`
    /// to index 2 yields `[c2, c3, c1]`.
    #[instrument(level = "debug", skip(self))]
    pub fn move_card(&self, card: &CardId, target: &ColumnId, slot: CardSlot) -> Outcome<Board> {
        let Some((src_col, src_pos)) = self.locate_card(card) else {
            return Outcome::Unchanged;
        };
        let Some(dst_col) = self.column_index(target) else {
            return Outcome::Unchanged;
        };

        let mut columns = self.columns.clone();
        let moved = columns[src_col].cards.remove(src_pos);
        let len = columns[dst_col].cards.len();
        let dst_pos = match slot {
            CardSlot::Index(i) => i.min(len),
            CardSlot::End => len,
        };
        if src_col == dst_col && src_pos == dst_pos {
            debug!("move_card: same position");
            return Outcome::Unchanged;
        }
        columns[dst_col].cards.insert(dst_pos, moved);
        debug!(
            "move_card: {}[{}] -> {}[{}]",
            self.columns[src_col].id, src_pos, target, dst_pos
        );
        Outcome::Changed(Board { columns })
    }

    /// Resolve a drag-and-drop release into a move.
    ///
    /// Dropping on a column appends; dropping on a card takes that card's
    /// current index in its column.
    pub fn drop_card(&self, card: &CardId, target: &DropTarget) -> Outcome<Board> {
        match target {
            DropTarget::Column(column) => self.move_card(card, column, CardSlot::End),
            DropTarget::Card(over) if over == card => Outcome::Unchanged,
            DropTarget::Card(over) => match self.locate_card(over) {
                Some((ci, pos)) => {
                    let column = self.columns[ci].id.clone();
                    self.move_card(card, &column, CardSlot::Index(pos))
                }
                None => Outcome::Unchanged,
            },
        }
    }
}
