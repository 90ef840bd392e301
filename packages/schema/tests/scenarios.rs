//! End-to-end scenarios over the pure tree API

use serde_json::json;
use std::sync::Arc;
use uischema::factory::{create_empty_schema, create_node};
use uischema::tree::{
    add_child_node, clone_node, count_nodes, find_node_by_id, find_parent_node, move_node,
};
use uischema::{ComponentType, Props, Schema, MAX_NODES};

#[test]
fn test_empty_schema_has_box_root() {
    let schema = create_empty_schema();

    assert_eq!(schema.root.component_type, ComponentType::Box);
    assert_eq!(schema.root.children, Some(vec![]));
    assert_eq!(count_nodes(&schema.root), 1);
}

#[test]
fn test_leaf_child_then_rejected_grandchild() {
    let schema = create_empty_schema();
    let text = create_node(ComponentType::Typography, None);
    let text_id = text.id.clone();

    let root = add_child_node(&schema.root, &schema.root.id, text, None);
    assert_eq!(count_nodes(&root), 2);

    let stored = find_node_by_id(&root, &text_id).unwrap();
    assert!(stored.children.is_none());
    let json = serde_json::to_value(stored.as_ref()).unwrap();
    assert!(json.get("children").is_none());

    let button = create_node(ComponentType::Button, None);
    let rejected = add_child_node(&root, &text_id, button, None);
    assert!(Arc::ptr_eq(&root, &rejected));
    assert_eq!(count_nodes(&rejected), 2);
}

#[test]
fn test_duplicate_keeps_props_with_new_id() {
    let schema = create_empty_schema();
    let mut props = Props::new();
    props.insert("text".to_string(), json!("Welcome"));
    let text = create_node(ComponentType::Typography, Some(props));
    let text_id = text.id.clone();
    let root = add_child_node(&schema.root, &schema.root.id, text, None);

    let original = find_node_by_id(&root, &text_id).unwrap();
    let copy = clone_node(original);
    let copy_id = copy.id.clone();
    let root = add_child_node(&root, &schema.root.id, copy, Some(1));

    assert_eq!(count_nodes(&root), 3);
    let copy = find_node_by_id(&root, &copy_id).unwrap();
    assert_ne!(copy.id, text_id);
    assert_eq!(copy.props["text"], json!("Welcome"));
}

#[test]
fn test_ceiling_stops_growth_at_limit() {
    let schema = create_empty_schema();
    let root_id = schema.root.id.clone();
    let mut root = schema.root;

    while count_nodes(&root) < MAX_NODES {
        root = add_child_node(&root, &root_id, create_node(ComponentType::Chip, None), None);
    }
    assert_eq!(count_nodes(&root), 200);

    let refused = add_child_node(&root, &root_id, create_node(ComponentType::Chip, None), None);
    assert!(Arc::ptr_eq(&root, &refused));
    assert_eq!(count_nodes(&refused), 200);
}

#[test]
fn test_move_into_own_grandchild_is_refused() {
    let schema = create_empty_schema();
    let child = create_node(ComponentType::Stack, None);
    let grand = create_node(ComponentType::Box, None);
    let great = create_node(ComponentType::Paper, None);
    let (child_id, grand_id, great_id) = (child.id.clone(), grand.id.clone(), great.id.clone());

    let root = add_child_node(&schema.root, &schema.root.id, child, None);
    let root = add_child_node(&root, &child_id, grand, None);
    let root = add_child_node(&root, &grand_id, great, None);

    let attempted = move_node(&root, &child_id, &great_id, None);
    assert!(Arc::ptr_eq(&root, &attempted));

    let attempted = move_node(&root, &child_id, &grand_id, Some(0));
    assert!(Arc::ptr_eq(&root, &attempted));
    assert_eq!(find_parent_node(&root, &child_id).unwrap().id, schema.root.id);
}

#[test]
fn test_serialized_document_loads_back() {
    let schema = create_empty_schema();
    let list = create_node(ComponentType::List, None);
    let list_id = list.id.clone();
    let root = add_child_node(&schema.root, &schema.root.id, list, None);
    let root = add_child_node(&root, &list_id, create_node(ComponentType::ListItem, None), None);
    let schema = Schema::new(root);

    let pretty = schema.to_json_pretty().unwrap();
    let loaded = Schema::from_json(&pretty).unwrap();

    assert_eq!(loaded, schema);
    assert_eq!(count_nodes(&loaded.root), 3);
}
