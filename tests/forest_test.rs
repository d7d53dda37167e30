//! Tests for the tree mutation engine

use rstest::{fixture, rstest};

use boardtree::domain::{Children, Forest, NodeId, NodeSeed, Outcome, SequentialIds};

// src (expanded)
// ├── components
// │   ├── button   (leaf)
// │   └── card     (leaf)
// ├── utils        (lazy)
// └── index        (leaf)
// docs             (lazy)
// readme           (leaf)
#[fixture]
fn forest() -> Forest {
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
    .unwrap()
}

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

/// Ids of the children of `parent` (or the roots) in order.
fn child_ids(forest: &Forest, parent: Option<&str>) -> Vec<String> {
    let parent_idx = parent.map(|p| forest.index_of(&id(p)).unwrap());
    forest
        .siblings(parent_idx)
        .iter()
        .map(|&i| forest.get(i).unwrap().id().to_string())
        .collect()
}

fn sorted_ids(forest: &Forest) -> Vec<String> {
    let mut ids: Vec<String> = forest
        .iter()
        .map(|i| forest.get(i).unwrap().id().to_string())
        .collect();
    ids.sort();
    ids
}

// ============================================================
// find() / toggle_expand() tests
// ============================================================

#[rstest]
fn given_nested_node_when_finding_then_reports_parent_and_position(forest: Forest) {
    let location = forest.find(&id("card")).unwrap();

    assert_eq!(location.parent, forest.index_of(&id("components")));
    assert_eq!(location.position, 1);
    assert_eq!(forest.get(location.index).unwrap().name(), "Card.tsx");
    assert!(forest.find(&id("ghost")).is_none());
}

#[rstest]
fn given_root_when_finding_then_parent_is_none(forest: Forest) {
    let location = forest.find(&id("readme")).unwrap();
    assert_eq!(location.parent, None);
    assert_eq!(location.position, 2);
}

#[rstest]
fn given_branch_when_toggling_twice_then_back_to_start(forest: Forest) {
    let opened = forest.toggle_expand(&id("components")).changed().unwrap();
    assert!(opened.node(&id("components")).unwrap().is_expanded());
    assert!(!forest.node(&id("components")).unwrap().is_expanded());

    let closed = opened.toggle_expand(&id("components")).changed().unwrap();
    assert_eq!(closed, forest);
}

#[rstest]
#[case("button")]
#[case("ghost")]
fn given_leaf_or_unknown_id_when_toggling_then_unchanged(forest: Forest, #[case] node: &str) {
    assert_eq!(forest.toggle_expand(&id(node)), Outcome::Unchanged);
}

#[rstest]
fn given_lazy_node_when_toggling_then_expands(forest: Forest) {
    let next = forest.toggle_expand(&id("docs")).changed().unwrap();
    assert!(next.node(&id("docs")).unwrap().is_expanded());
}

// ============================================================
// add_child() / add_root() tests
// ============================================================

#[rstest]
fn given_collapsed_parent_when_adding_child_then_appended_and_expanded(forest: Forest) {
    let ids = SequentialIds::new();

    let (next, new_id) = forest
        .add_child(&id("components"), "Modal.tsx", &ids)
        .changed()
        .unwrap();

    assert_eq!(new_id.as_str(), "node-1");
    assert_eq!(
        child_ids(&next, Some("components")),
        vec!["button", "card", "node-1"]
    );
    assert!(next.node(&id("components")).unwrap().is_expanded());
    assert_eq!(next.node(&new_id).unwrap().children(), &Children::Unknown);
    assert_eq!(next.len(), forest.len() + 1);
}

#[rstest]
fn given_leaf_parent_when_adding_child_then_becomes_branch(forest: Forest) {
    let ids = SequentialIds::new();

    let (next, _) = forest
        .add_child(&id("readme"), "notes", &ids)
        .changed()
        .unwrap();

    assert!(matches!(
        next.node(&id("readme")).unwrap().children(),
        Children::Branch(c) if c.len() == 1
    ));
}

#[rstest]
fn given_unknown_parent_when_adding_child_then_unchanged(forest: Forest) {
    let ids = SequentialIds::new();
    assert!(!forest.add_child(&id("ghost"), "x", &ids).is_changed());
}

#[rstest]
fn given_forest_when_adding_root_then_appended_to_roots(forest: Forest) {
    let ids = SequentialIds::new();

    let (next, new_id) = forest.add_root("tests", &ids);

    assert_eq!(
        child_ids(&next, None),
        vec!["src", "docs", "readme", new_id.as_str()]
    );
}

// ============================================================
// edit_node() / delete_node() tests
// ============================================================

#[rstest]
fn given_new_name_when_editing_then_renamed(forest: Forest) {
    let next = forest.edit_node(&id("index"), "main.ts").changed().unwrap();

    assert_eq!(next.node(&id("index")).unwrap().name(), "main.ts");
    assert_eq!(forest.node(&id("index")).unwrap().name(), "index.ts");
}

#[rstest]
fn given_same_name_when_editing_then_unchanged(forest: Forest) {
    assert_eq!(forest.edit_node(&id("index"), "index.ts"), Outcome::Unchanged);
}

#[rstest]
fn given_branch_when_deleting_then_whole_subtree_removed(forest: Forest) {
    let components = forest.index_of(&id("components")).unwrap();
    let size = forest.subtree_size(components);

    let next = forest.delete_node(&id("components")).changed().unwrap();

    assert_eq!(size, 3);
    assert_eq!(next.len(), forest.len() - size);
    for gone in ["components", "button", "card"] {
        assert!(!next.contains(&id(gone)), "{} still present", gone);
    }
    assert_eq!(child_ids(&next, Some("src")), vec!["utils", "index"]);
}

#[rstest]
fn given_only_child_when_deleting_then_parent_is_known_leaf() {
    let forest = Forest::from_seeds(&[
        NodeSeed::new("p", "P").with_children([NodeSeed::leaf("c", "C")])
    ])
    .unwrap();

    let next = forest.delete_node(&id("c")).changed().unwrap();

    assert_eq!(next.node(&id("p")).unwrap().children(), &Children::Leaf);
}

#[rstest]
fn given_unknown_id_when_deleting_then_unchanged(forest: Forest) {
    assert_eq!(forest.delete_node(&id("ghost")), Outcome::Unchanged);
}

// ============================================================
// move_node() tests
// ============================================================

#[rstest]
fn given_branch_target_when_moving_then_appended_as_last_child(forest: Forest) {
    let next = forest.move_node(&id("index"), &id("components")).changed().unwrap();

    assert_eq!(
        child_ids(&next, Some("components")),
        vec!["button", "card", "index"]
    );
    assert_eq!(child_ids(&next, Some("src")), vec!["components", "utils"]);
    assert_eq!(
        next.node(&id("index")).unwrap().parent(),
        next.index_of(&id("components"))
    );
}

#[rstest]
fn given_lazy_target_when_moving_then_becomes_its_first_child(forest: Forest) {
    let next = forest.move_node(&id("readme"), &id("docs")).changed().unwrap();

    assert_eq!(child_ids(&next, Some("docs")), vec!["readme"]);
    assert_eq!(child_ids(&next, None), vec!["src", "docs"]);
}

#[rstest]
fn given_source_already_last_child_when_moving_into_parent_then_unchanged(forest: Forest) {
    assert_eq!(
        forest.move_node(&id("index"), &id("src")),
        Outcome::Unchanged
    );
}

#[rstest]
fn given_earlier_sibling_when_moving_onto_leaf_then_placed_after_it(forest: Forest) {
    // button comes before card under the same parent
    let next = forest.move_node(&id("button"), &id("card")).changed().unwrap();

    assert_eq!(child_ids(&next, Some("components")), vec!["card", "button"]);
}

#[rstest]
fn given_later_sibling_when_moving_onto_leaf_then_placed_before_it() {
    let forest = Forest::from_seeds(&[NodeSeed::new("p", "P").with_children([
        NodeSeed::leaf("a", "A"),
        NodeSeed::leaf("b", "B"),
        NodeSeed::leaf("c", "C"),
    ])])
    .unwrap();

    let next = forest.move_node(&id("c"), &id("a")).changed().unwrap();

    assert_eq!(child_ids(&next, Some("p")), vec!["c", "a", "b"]);
}

#[rstest]
fn given_higher_index_in_other_parent_when_moving_onto_leaf_then_placed_before_it(forest: Forest) {
    // readme is root #2, button is child #0 of components
    let next = forest.move_node(&id("readme"), &id("button")).changed().unwrap();

    assert_eq!(
        child_ids(&next, Some("components")),
        vec!["readme", "button", "card"]
    );
    assert_eq!(child_ids(&next, None), vec!["src", "docs"]);
}

#[rstest]
fn given_lower_index_in_other_parent_when_moving_onto_leaf_then_placed_after_it(forest: Forest) {
    // button is child #0 of components, readme is root #2
    let next = forest.move_node(&id("button"), &id("readme")).changed().unwrap();

    assert_eq!(child_ids(&next, None), vec!["src", "docs", "readme", "button"]);
    assert_eq!(child_ids(&next, Some("components")), vec!["card"]);
    assert_eq!(next.node(&id("button")).unwrap().parent(), None);
}

#[rstest]
#[case("src", "src")]
#[case("src", "components")]
#[case("src", "card")]
#[case("components", "button")]
fn given_target_inside_source_when_moving_then_rejected(
    forest: Forest,
    #[case] source: &str,
    #[case] target: &str,
) {
    assert_eq!(forest.move_node(&id(source), &id(target)), Outcome::Unchanged);
}

#[rstest]
#[case("ghost", "src")]
#[case("src", "ghost")]
fn given_unknown_id_when_moving_then_unchanged(
    forest: Forest,
    #[case] source: &str,
    #[case] target: &str,
) {
    assert_eq!(forest.move_node(&id(source), &id(target)), Outcome::Unchanged);
}

#[rstest]
fn given_sequence_of_moves_then_node_set_and_parent_links_hold(forest: Forest) {
    let before = sorted_ids(&forest);
    let steps = [
        ("components", "docs"),
        ("readme", "button"),
        ("utils", "components"),
        ("index", "readme"),
        ("docs", "src"),
    ];

    let after = steps.iter().fold(forest.clone(), |current, (source, target)| {
        current
            .move_node(&id(source), &id(target))
            .unwrap_or_else(|| current.clone())
    });

    assert_eq!(sorted_ids(&after), before);
    for idx in after.iter() {
        let node = after.get(idx).unwrap();
        for &child in node.children().as_slice() {
            assert_eq!(after.get(child).unwrap().parent(), Some(idx));
        }
    }
}

#[rstest]
fn given_forest_when_listing_visible_rows_then_collapsed_subtrees_hidden(forest: Forest) {
    let rows: Vec<(usize, String)> = forest
        .visible()
        .map(|row| (row.depth, row.node.id().to_string()))
        .collect();

    assert_eq!(
        rows,
        vec![
            (0, "src".to_string()),
            (1, "components".to_string()),
            (1, "utils".to_string()),
            (1, "index".to_string()),
            (0, "docs".to_string()),
            (0, "readme".to_string()),
        ]
    );
}
