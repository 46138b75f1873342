//! Tests for pre-order flattening

use cattree::domain::{flatten, forest_len, render_lines, Node, TreeBuilder, DEFAULT_INDENT};
use cattree::util::testing::{flat_node, sample_flat};

fn forest() -> Vec<Node> {
    TreeBuilder::new().build(&sample_flat()).unwrap()
}

fn pairs(forest: &[Node], start_depth: usize) -> Vec<(String, usize)> {
    flatten(forest, start_depth)
        .iter()
        .map(|e| (e.node.id.clone(), e.depth))
        .collect()
}

#[test]
fn given_tree_when_flattening_then_yields_preorder_with_depths() {
    // Arrange
    let forest = forest();

    // Act
    let result = pairs(&forest, 0);

    // Assert
    let expected = vec![
        ("A".to_string(), 0),
        ("B".to_string(), 1),
        ("C".to_string(), 2),
        ("D".to_string(), 1),
    ];
    assert_eq!(result, expected);
}

#[test]
fn given_start_depth_when_flattening_then_roots_start_there() {
    let forest = forest();

    let depths: Vec<usize> = pairs(&forest, 2).into_iter().map(|(_, d)| d).collect();

    assert_eq!(depths, vec![2, 3, 4, 3]);
}

#[test]
fn given_tree_when_flattening_then_length_equals_node_count() {
    let forest = forest();
    assert_eq!(flatten(&forest, 0).len(), forest_len(&forest));
}

#[test]
fn given_tree_when_flattening_twice_then_results_are_equal() {
    let forest = forest();
    assert_eq!(pairs(&forest, 0), pairs(&forest, 0));
}

#[test]
fn given_tree_when_flattening_then_parent_precedes_its_whole_subtree() {
    // Arrange
    let forest = forest();

    // Act
    let entries = flatten(&forest, 0);

    // Assert - every child appears after its parent, one level deeper
    for (pos, entry) in entries.iter().enumerate() {
        if let Some(parent_id) = entry.node.parent_id() {
            let parent_pos = entries
                .iter()
                .position(|e| e.node.id == parent_id)
                .unwrap();
            assert!(parent_pos < pos);
            assert_eq!(entries[parent_pos].depth + 1, entry.depth);
        }
    }
}

#[test]
fn given_level_hint_when_flattening_then_depth_is_recomputed() {
    // Arrange - server level disagrees with actual nesting
    let mut child = flat_node("c", "Child", None);
    child.level = Some(7);
    let forest = vec![flat_node("r", "Root", None).with_children(vec![child])];

    // Act
    let entries = flatten(&forest, 0);

    // Assert
    assert_eq!(entries[1].depth, 1);
}

#[test]
fn given_empty_forest_when_flattening_then_returns_nothing() {
    assert!(flatten(&[], 0).is_empty());
}

#[test]
fn given_entries_when_rendering_then_indents_by_depth() {
    // Arrange
    let forest = forest();
    let entries = flatten(&forest, 0);

    // Act
    let lines = render_lines(&entries, DEFAULT_INDENT);

    // Assert
    assert_eq!(
        lines,
        vec!["Electronics", "  Computers", "    Laptops", "  Phones"]
    );
    assert_eq!(render_lines(&entries, "--")[2], "----Laptops");
}
