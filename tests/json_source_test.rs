//! Tests for JsonFileSource

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use cattree::application::services::HierarchyService;
use cattree::domain::{flatten, forest_len, OrphanPolicy, SubCategoryUpdate};
use cattree::infrastructure::json_source::JsonFileSource;
use cattree::infrastructure::traits::{NullNotifier, SourceError, SubCategorySource};

fn write_json(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("sub-categories.json");
    std::fs::write(&path, content).expect("write json file");
    path
}

const NESTED: &str = r#"{
  "success": true,
  "statusCode": 200,
  "message": "ok",
  "data": [
    {
      "id": "A", "name": "Electronics", "level": 0, "parent": null,
      "category": {"id": "cat-1", "name": "IT", "hasLocation": true},
      "children": [
        {"id": "B", "name": "Computers", "level": 1,
         "children": [{"id": "C", "name": "Laptops", "level": 2, "children": null}]},
        {"id": "D", "name": "Phones", "level": 1}
      ],
      "assetProperties": [{"id": "p1", "name": "Serial", "dataType": "string"}]
    },
    {
      "id": "X", "name": "Desks",
      "category": {"id": "cat-2", "name": "Furniture"},
      "children": []
    }
  ]
}"#;

const FLAT: &str = r#"[
  {"id": "A", "name": "Electronics", "category": {"id": "cat-1", "name": "IT"}},
  {"id": "B", "name": "Computers", "parentId": "A", "category": {"id": "cat-1", "name": "IT"}},
  {"id": "C", "name": "Laptops", "parent": {"id": "B", "name": "Computers"}, "category": {"id": "cat-1", "name": "IT"}}
]"#;

/// Backend list shape: every entry at top level, each listing only its direct children.
const ONE_LEVEL: &str = r#"[
  {"id": "A", "name": "Electronics", "category": {"id": "cat-1", "name": "IT"},
   "children": [{"id": "B", "name": "Computers", "parentId": "A"},
                {"id": "D", "name": "Phones", "parentId": "A"}]},
  {"id": "B", "name": "Computers", "parentId": "A", "category": {"id": "cat-1", "name": "IT"},
   "children": [{"id": "C", "name": "Laptops", "parentId": "B"}]},
  {"id": "C", "name": "Laptops", "parentId": "B", "category": {"id": "cat-1", "name": "IT"},
   "children": []},
  {"id": "D", "name": "Phones", "parentId": "A", "category": {"id": "cat-1", "name": "IT"},
   "children": []}
]"#;

#[test]
fn given_nested_file_when_fetching_hierarchy_then_returns_category_roots() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let source = JsonFileSource::new(write_json(&temp, NESTED));

    // Act
    let roots = source.fetch_hierarchy("cat-1").unwrap();

    // Assert
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, "A");
    assert_eq!(roots[0].children.len(), 2);
    assert_eq!(roots[0].asset_properties[0].name, "Serial");
}

#[test]
fn given_nested_file_when_fetching_flat_list_then_nested_nodes_get_parent_and_category() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let source = JsonFileSource::new(write_json(&temp, NESTED));

    // Act
    let flat = source.fetch_flat_list(Some("cat-1")).unwrap();

    // Assert
    let ids: Vec<&str> = flat.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C", "D"]);
    assert!(flat.iter().all(|n| n.is_leaf()));
    assert_eq!(flat[2].parent_id(), Some("B"));
    assert_eq!(flat[3].parent_id(), Some("A"));
}

#[test]
fn given_nested_file_when_fetching_all_then_includes_every_category() {
    let temp = TempDir::new().unwrap();
    let source = JsonFileSource::new(write_json(&temp, NESTED));

    let flat = source.fetch_flat_list(None).unwrap();

    assert_eq!(flat.len(), 5);
}

#[test]
fn given_flat_file_when_fetching_hierarchy_then_reports_unsupported() {
    let temp = TempDir::new().unwrap();
    let source = JsonFileSource::new(write_json(&temp, FLAT));

    let err = source.fetch_hierarchy("cat-1").unwrap_err();

    assert!(matches!(err, SourceError::HierarchyUnsupported));
}

#[test]
fn given_flat_file_when_fetching_flat_list_then_keeps_declared_parents() {
    let temp = TempDir::new().unwrap();
    let source = JsonFileSource::new(write_json(&temp, FLAT));

    let flat = source.fetch_flat_list(Some("cat-1")).unwrap();

    assert_eq!(flat[1].parent_id(), Some("A"));
    assert_eq!(flat[2].parent_id(), Some("B"));
}

#[test]
fn given_unknown_category_when_fetching_then_fails_category_not_found() {
    let temp = TempDir::new().unwrap();
    let source = JsonFileSource::new(write_json(&temp, NESTED));

    let err = source.fetch_flat_list(Some("cat-9")).unwrap_err();

    assert!(matches!(err, SourceError::CategoryNotFound(id) if id == "cat-9"));
}

#[test]
fn given_malformed_json_when_fetching_then_fails_decode() {
    let temp = TempDir::new().unwrap();
    let source = JsonFileSource::new(write_json(&temp, "{ not json"));

    let err = source.fetch_flat_list(None).unwrap_err();

    assert!(matches!(err, SourceError::Decode { .. }));
}

#[test]
fn given_missing_file_when_fetching_then_fails_io() {
    let temp = TempDir::new().unwrap();
    let source = JsonFileSource::new(temp.path().join("absent.json"));

    let err = source.fetch_flat_list(None).unwrap_err();

    assert!(matches!(err, SourceError::Io { .. }));
}

#[test]
fn given_direct_children_only_when_fetching_hierarchy_then_reports_unsupported() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let source = JsonFileSource::new(write_json(&temp, ONE_LEVEL));

    // Act
    let err = source.fetch_hierarchy("cat-1").unwrap_err();

    // Assert
    assert!(matches!(err, SourceError::HierarchyUnsupported));
}

#[test]
fn given_direct_children_only_when_loading_via_service_then_no_node_is_dropped() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let source = Arc::new(JsonFileSource::new(write_json(&temp, ONE_LEVEL)));
    let service = HierarchyService::new(source, Arc::new(NullNotifier), OrphanPolicy::Reject);

    // Act
    let forest = service.hierarchy("cat-1").unwrap();

    // Assert
    assert_eq!(forest_len(&forest), 4);
    let order: Vec<(&str, usize)> = flatten(&forest, 0)
        .iter()
        .map(|e| (e.node.id.as_str(), e.depth))
        .collect();
    assert_eq!(order, vec![("A", 0), ("B", 1), ("C", 2), ("D", 1)]);
}

#[test]
fn given_nested_file_when_fetching_one_then_finds_nested_node() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let source = JsonFileSource::new(write_json(&dir, NESTED));

    // Act
    let node = source.fetch_one("B").unwrap();
    let missing = source.fetch_one("Z");

    // Assert
    assert_eq!(node.name, "Computers");
    assert_eq!(node.children.len(), 1);
    assert!(matches!(missing, Err(SourceError::SubCategoryNotFound(id)) if id == "Z"));
}

#[test]
fn given_file_source_when_updating_then_fails_read_only_and_file_is_unchanged() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = write_json(&dir, FLAT);
    let source = JsonFileSource::new(path.clone());
    let payload = SubCategoryUpdate {
        name: "Laptops".to_string(),
        category_id: "cat-1".to_string(),
        parent_id: Some("A".to_string()),
    };

    // Act
    let result = source.update("C", &payload);

    // Assert
    assert!(matches!(result, Err(SourceError::ReadOnly(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), FLAT);
}
