//! Kanban session
//!
//! Owns the current board, runs actions through the engine and notifies
//! listeners about every change.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::actions::KanbanAction;
use crate::application::listener::{ChangeEvent, ChangeListener};
use crate::application::ApplicationResult;
use crate::domain::{Board, CardId, CardSlot, ColumnId, DropTarget, IdGenerator, Outcome};

use super::require_text;

pub struct KanbanSession {
    board: Board,
    ids: Arc<dyn IdGenerator>,
    listeners: Vec<Arc<dyn ChangeListener>>,
}

impl KanbanSession {
    pub fn new(board: Board, ids: Arc<dyn IdGenerator>) -> Self {
        for card in board.iter_cards() {
            ids.reserve(card.id.as_str());
        }
        Self {
            board,
            ids,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Arc<dyn ChangeListener>) {
        self.listeners.push(listener);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Apply one action. Returns whether the board changed.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&mut self, action: KanbanAction) -> ApplicationResult<bool> {
        match action {
            KanbanAction::AddCard { column, title } => {
                self.add_card(&column, &title).map(|id| id.is_some())
            }
            KanbanAction::EditCard { card, title } => self.edit_card(&card, &title),
            KanbanAction::DeleteCard { card } => Ok(self.delete_card(&card)),
            KanbanAction::MoveCard {
                card,
                column,
                index,
            } => {
                let slot = index.map_or(CardSlot::End, CardSlot::Index);
                Ok(self.move_card(&card, &column, slot))
            }
            KanbanAction::DropCard { card, target } => Ok(self.drop_card(&card, &target)),
        }
    }

    /// Add a card; `None` when the column does not exist.
    pub fn add_card(&mut self, column: &ColumnId, title: &str) -> ApplicationResult<Option<CardId>> {
        let title = require_text(title, "card title")?;
        Ok(self
            .board
            .add_card(column, title, self.ids.as_ref())
            .changed()
            .map(|(board, id)| {
                self.commit(board);
                id
            }))
    }

    pub fn edit_card(&mut self, card: &CardId, title: &str) -> ApplicationResult<bool> {
        let title = require_text(title, "card title")?;
        let outcome = self.board.edit_card(card, title);
        Ok(self.settle(outcome))
    }

    pub fn delete_card(&mut self, card: &CardId) -> bool {
        let outcome = self.board.delete_card(card);
        self.settle(outcome)
    }

    pub fn move_card(&mut self, card: &CardId, column: &ColumnId, slot: CardSlot) -> bool {
        let outcome = self.board.move_card(card, column, slot);
        self.settle(outcome)
    }

    pub fn drop_card(&mut self, card: &CardId, target: &DropTarget) -> bool {
        let outcome = self.board.drop_card(card, target);
        self.settle(outcome)
    }

    fn settle(&mut self, outcome: Outcome<Board>) -> bool {
        match outcome.changed() {
            Some(board) => {
                self.commit(board);
                true
            }
            None => {
                debug!("board unchanged");
                false
            }
        }
    }

    fn commit(&mut self, board: Board) {
        self.board = board;
        let event = ChangeEvent::Board(&self.board);
        for listener in &self.listeners {
            listener.on_change(&event);
        }
    }
}
