//! Tests for the kanban mutation engine
//!
//! Every operation must leave the receiving board untouched and keep the
//! multiset of card ids intact (apart from add and delete).

use std::collections::HashSet;

use rstest::{fixture, rstest};

use boardtree::domain::{
    Board, Card, CardId, CardSlot, Column, ColumnId, DropTarget, Outcome, SequentialIds,
};

#[fixture]
fn board() -> Board {
    Board::from_columns(vec![
        Column::new("todo", "To Do").with_cards([
            Card::new("c1", "one"),
            Card::new("c2", "two"),
            Card::new("c3", "three"),
        ]),
        Column::new("doing", "Doing").with_cards([Card::new("c4", "four")]),
        Column::new("done", "Done"),
    ])
    .unwrap()
}

fn card_ids(board: &Board, column: &str) -> Vec<String> {
    board
        .column(&ColumnId::from(column))
        .unwrap()
        .cards
        .iter()
        .map(|c| c.id.to_string())
        .collect()
}

fn all_ids(board: &Board) -> Vec<CardId> {
    let mut ids: Vec<CardId> = board.iter_cards().map(|c| c.id.clone()).collect();
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    ids
}

// ============================================================
// move_card() tests
// ============================================================

#[rstest]
fn given_first_card_when_moved_to_index_two_then_lands_last(board: Board) {
    let moved = board
        .move_card(&"c1".into(), &"todo".into(), CardSlot::Index(2))
        .changed()
        .unwrap();

    assert_eq!(card_ids(&moved, "todo"), vec!["c2", "c3", "c1"]);
    // receiver untouched
    assert_eq!(card_ids(&board, "todo"), vec!["c1", "c2", "c3"]);
}

#[rstest]
#[case(0, vec!["c2", "c4"])]
#[case(1, vec!["c4", "c2"])]
#[case(99, vec!["c4", "c2"])]
fn given_index_when_moving_across_columns_then_inserted_at_clamped_position(
    board: Board,
    #[case] index: usize,
    #[case] expected: Vec<&str>,
) {
    let moved = board
        .move_card(&"c2".into(), &"doing".into(), CardSlot::Index(index))
        .changed()
        .unwrap();

    assert_eq!(card_ids(&moved, "doing"), expected);
    assert_eq!(card_ids(&moved, "todo"), vec!["c1", "c3"]);
}

#[test]
fn given_two_columns_when_moving_first_card_across_then_source_shrinks() {
    let board = Board::from_columns(vec![
        Column::new("todo", "To Do").with_cards([Card::new("a", "A"), Card::new("b", "B")]),
        Column::new("done", "Done"),
    ])
    .unwrap();

    let moved = board
        .move_card(&"a".into(), &"done".into(), CardSlot::Index(0))
        .changed()
        .unwrap();

    assert_eq!(card_ids(&moved, "todo"), vec!["b"]);
    assert_eq!(card_ids(&moved, "done"), vec!["a"]);
}

#[rstest]
fn given_empty_column_when_moving_to_end_then_card_is_only_entry(board: Board) {
    let moved = board
        .move_card(&"c4".into(), &"done".into(), CardSlot::End)
        .changed()
        .unwrap();

    assert_eq!(card_ids(&moved, "done"), vec!["c4"]);
    assert!(card_ids(&moved, "doing").is_empty());
}

#[rstest]
#[case("c2", "todo", CardSlot::Index(1))]
#[case("c3", "todo", CardSlot::End)]
#[case("c3", "todo", CardSlot::Index(7))]
#[case("c4", "doing", CardSlot::Index(0))]
fn given_current_position_when_moving_then_unchanged(
    board: Board,
    #[case] card: &str,
    #[case] column: &str,
    #[case] slot: CardSlot,
) {
    let outcome = board.move_card(&card.into(), &column.into(), slot);
    assert_eq!(outcome, Outcome::Unchanged);
}

#[rstest]
#[case("missing", "todo")]
#[case("c1", "missing")]
fn given_unknown_id_when_moving_then_unchanged(
    board: Board,
    #[case] card: &str,
    #[case] column: &str,
) {
    assert_eq!(
        board.move_card(&card.into(), &column.into(), CardSlot::End),
        Outcome::Unchanged
    );
}

// ============================================================
// drop_card() tests
// ============================================================

#[rstest]
fn given_drop_on_card_when_resolving_then_takes_that_cards_index(board: Board) {
    let moved = board
        .drop_card(&"c4".into(), &DropTarget::Card("c2".into()))
        .changed()
        .unwrap();

    assert_eq!(card_ids(&moved, "todo"), vec!["c1", "c4", "c2", "c3"]);
}

#[rstest]
fn given_drop_on_card_below_in_same_column_then_takes_its_place(board: Board) {
    let moved = board
        .drop_card(&"c1".into(), &DropTarget::Card("c3".into()))
        .changed()
        .unwrap();

    assert_eq!(card_ids(&moved, "todo"), vec!["c2", "c3", "c1"]);
}

#[rstest]
fn given_drop_on_column_when_resolving_then_appends(board: Board) {
    let moved = board
        .drop_card(&"c1".into(), &DropTarget::Column("doing".into()))
        .changed()
        .unwrap();

    assert_eq!(card_ids(&moved, "doing"), vec!["c4", "c1"]);
}

#[rstest]
fn given_drop_on_itself_when_resolving_then_unchanged(board: Board) {
    assert_eq!(
        board.drop_card(&"c2".into(), &DropTarget::Card("c2".into())),
        Outcome::Unchanged
    );
}

#[rstest]
fn given_drop_on_unknown_card_when_resolving_then_unchanged(board: Board) {
    assert_eq!(
        board.drop_card(&"c2".into(), &DropTarget::Card("ghost".into())),
        Outcome::Unchanged
    );
}

// ============================================================
// add / edit / delete tests
// ============================================================

#[rstest]
fn given_column_when_adding_card_then_appended_with_fresh_id(board: Board) {
    let ids = SequentialIds::new();

    let (next, id) = board
        .add_card(&"done".into(), "five", &ids)
        .changed()
        .unwrap();

    assert_eq!(id.as_str(), "card-1");
    assert_eq!(next.card(&id).unwrap().title, "five");
    assert_eq!(card_ids(&next, "done"), vec!["card-1"]);
    assert_eq!(board.card_count() + 1, next.card_count());
}

#[test]
fn given_seed_using_generated_ids_when_adding_then_skips_taken_ids() {
    let board = Board::from_columns(vec![Column::new("a", "A")
        .with_cards([Card::new("card-1", "x"), Card::new("card-2", "y")])])
    .unwrap();
    let ids = SequentialIds::new();

    let (next, id) = board.add_card(&"a".into(), "z", &ids).changed().unwrap();

    assert_eq!(id.as_str(), "card-3");
    let unique: HashSet<_> = next.iter_cards().map(|c| &c.id).collect();
    assert_eq!(unique.len(), next.card_count());
}

#[rstest]
fn given_new_title_when_editing_then_only_that_card_changes(board: Board) {
    let next = board.edit_card(&"c2".into(), "TWO").changed().unwrap();

    assert_eq!(next.card(&"c2".into()).unwrap().title, "TWO");
    assert_eq!(next.card(&"c1".into()).unwrap().title, "one");
    assert_eq!(all_ids(&next), all_ids(&board));
}

#[rstest]
fn given_same_title_when_editing_then_unchanged(board: Board) {
    assert_eq!(board.edit_card(&"c2".into(), "two"), Outcome::Unchanged);
}

#[rstest]
fn given_card_when_deleting_then_removed_everywhere(board: Board) {
    let next = board.delete_card(&"c4".into()).changed().unwrap();

    assert!(next.card(&"c4".into()).is_none());
    assert_eq!(next.card_count(), board.card_count() - 1);
    assert_eq!(board.delete_card(&"nope".into()), Outcome::Unchanged);
}

// ============================================================
// invariants
// ============================================================

#[rstest]
fn given_sequence_of_moves_then_card_set_is_conserved(board: Board) {
    let before = all_ids(&board);
    let steps: [(&str, &str, CardSlot); 5] = [
        ("c1", "done", CardSlot::End),
        ("c4", "todo", CardSlot::Index(0)),
        ("c3", "doing", CardSlot::Index(3)),
        ("c1", "todo", CardSlot::Index(1)),
        ("c2", "done", CardSlot::Index(0)),
    ];

    let after = steps.iter().fold(board.clone(), |current, (card, column, slot)| {
        current
            .move_card(&(*card).into(), &(*column).into(), *slot)
            .unwrap_or_else(|| current.clone())
    });

    assert_eq!(all_ids(&after), before);
    assert_eq!(after.columns().len(), board.columns().len());
}

#[test]
fn given_duplicate_column_ids_when_building_then_rejected() {
    let result = Board::from_columns(vec![Column::new("a", "A"), Column::new("a", "B")]);
    assert!(result.is_err());
}
