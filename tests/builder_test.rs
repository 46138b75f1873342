//! Tests for TreeBuilder

use rstest::rstest;

use cattree::domain::{forest_len, DomainError, ErrorKind, Node, OrphanPolicy, TreeBuilder};
use cattree::util::testing::{flat_node, init_test_setup, sample_flat};

fn ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn given_flat_list_when_building_then_nests_children_under_parents() {
    // Arrange
    init_test_setup();
    let flat = sample_flat();

    // Act
    let forest = TreeBuilder::new().build(&flat).unwrap();

    // Assert
    assert_eq!(ids(&forest), vec!["A"]);
    let a = &forest[0];
    assert_eq!(ids(&a.children), vec!["B", "D"]);
    assert_eq!(ids(&a.children[0].children), vec!["C"]);
    assert!(a.children[1].is_leaf());
}

#[test]
fn given_flat_list_when_building_then_every_node_appears_exactly_once() {
    // Arrange
    let flat = sample_flat();

    // Act
    let forest = TreeBuilder::new().build(&flat).unwrap();

    // Assert
    assert_eq!(forest_len(&forest), flat.len());
}

#[test]
fn given_built_tree_when_inspecting_children_then_parent_refs_point_to_containing_node() {
    // Arrange
    let flat = sample_flat();

    // Act
    let forest = TreeBuilder::new().build(&flat).unwrap();

    // Assert
    let a = &forest[0];
    assert_eq!(a.parent_id(), None);
    assert!(a.parent.is_none());
    let b = &a.children[0];
    assert_eq!(b.parent_id(), Some("A"));
    assert_eq!(b.parent.as_ref().map(|p| p.name.as_str()), Some("Electronics"));
    assert_eq!(b.children[0].parent_id(), Some("B"));
}

#[test]
fn given_several_roots_when_building_then_input_order_is_kept() {
    // Arrange
    let flat = vec![
        flat_node("r2", "Second", None),
        flat_node("x", "Under second", Some("r2")),
        flat_node("r1", "First", None),
        flat_node("r3", "Third", None),
    ];

    // Act
    let forest = TreeBuilder::new().build(&flat).unwrap();

    // Assert
    assert_eq!(ids(&forest), vec!["r2", "r1", "r3"]);
    assert_eq!(ids(&forest[0].children), vec!["x"]);
}

#[test]
fn given_empty_list_when_building_then_returns_empty_forest() {
    let forest = TreeBuilder::new().build(&[]).unwrap();
    assert!(forest.is_empty());
}

#[test]
fn given_prepopulated_children_when_building_then_parent_refs_win() {
    // Arrange - A claims C as child, but C declares B as parent
    let flat = vec![
        flat_node("A", "A", None).with_children(vec![flat_node("C", "C", None)]),
        flat_node("B", "B", Some("A")),
        flat_node("C", "C", Some("B")),
    ];

    // Act
    let forest = TreeBuilder::new().build(&flat).unwrap();

    // Assert
    assert_eq!(ids(&forest[0].children), vec!["B"]);
    assert_eq!(ids(&forest[0].children[0].children), vec!["C"]);
    assert_eq!(forest_len(&forest), 3);
}

#[test]
fn given_unknown_parent_when_rejecting_then_fails_with_orphan_error() {
    // Arrange
    let flat = vec![flat_node("A", "A", None), flat_node("B", "B", Some("X"))];

    // Act
    let err = TreeBuilder::with_policy(OrphanPolicy::Reject)
        .build(&flat)
        .unwrap_err();

    // Assert
    assert_eq!(
        err,
        DomainError::OrphanParent {
            id: "B".into(),
            parent_id: "X".into()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn given_unknown_parent_when_promoting_then_node_becomes_root() {
    // Arrange
    let flat = vec![
        flat_node("A", "A", None),
        flat_node("B", "B", Some("X")),
        flat_node("C", "C", Some("B")),
    ];

    // Act
    let forest = TreeBuilder::with_policy(OrphanPolicy::Promote)
        .build(&flat)
        .unwrap();

    // Assert
    assert_eq!(ids(&forest), vec!["A", "B"]);
    assert_eq!(forest[1].parent_id(), None);
    assert_eq!(ids(&forest[1].children), vec!["C"]);
}

#[test]
fn given_duplicate_ids_when_building_then_fails() {
    let flat = vec![flat_node("A", "A", None), flat_node("A", "Again", None)];

    let err = TreeBuilder::new().build(&flat).unwrap_err();

    assert_eq!(err, DomainError::DuplicateId("A".into()));
}

#[rstest]
#[case::two_node_loop(vec![("a", Some("b")), ("b", Some("a"))])]
#[case::loop_beside_root(vec![("r", None), ("a", Some("c")), ("b", Some("a")), ("c", Some("b"))])]
#[case::self_parent(vec![("r", None), ("s", Some("s"))])]
fn given_parent_cycle_when_building_then_fails_with_cycle_error(
    #[case] links: Vec<(&str, Option<&str>)>,
) {
    // Arrange
    let flat: Vec<Node> = links
        .iter()
        .map(|(id, parent)| flat_node(id, id, *parent))
        .collect();

    // Act
    let err = TreeBuilder::new().build(&flat).unwrap_err();

    // Assert
    assert!(matches!(err, DomainError::CycleDetected(_)), "got {err:?}");
}

#[test]
fn given_builder_reused_when_building_twice_then_results_are_independent() {
    // Arrange
    let mut builder = TreeBuilder::new();
    let first = builder.build(&sample_flat()).unwrap();

    // Act
    let second = builder.build(&[flat_node("Z", "Z", None)]).unwrap();

    // Assert
    assert_eq!(forest_len(&first), 4);
    assert_eq!(ids(&second), vec!["Z"]);
}
