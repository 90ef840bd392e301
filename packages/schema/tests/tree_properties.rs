//! Property tests for the tree invariants

use proptest::prelude::*;
use std::sync::Arc;
use uischema::factory::{create_empty_schema, create_node};
use uischema::registry::{can_be_child_of, child_policy};
use uischema::tree::{
    add_child_node, clone_node, collect_ids, count_nodes, find_node_by_id, flatten_tree,
    move_node, remove_node,
};
use uischema::validation::{is_descendant, validate_schema};
use uischema::{ChildPolicy, ComponentType, Schema, SchemaNode, MAX_NODES};

fn component_type() -> impl Strategy<Value = ComponentType> {
    proptest::sample::select(ComponentType::ALL.to_vec())
}

/// Grow a tree by repeatedly attaching random kinds to random existing nodes
fn build_tree(steps: &[(ComponentType, usize)]) -> Arc<SchemaNode> {
    let mut root = create_empty_schema().root;

    for (component_type, pick) in steps {
        let ids = collect_ids(&root);
        let parent_id = &ids[pick % ids.len()];
        root = add_child_node(&root, parent_id, create_node(*component_type, None), None);
    }

    root
}

fn steps() -> impl Strategy<Value = Vec<(ComponentType, usize)>> {
    proptest::collection::vec((component_type(), any::<usize>()), 0..60)
}

proptest! {
    #[test]
    fn leaf_parents_accept_nothing(child in component_type(), parent in component_type()) {
        if child_policy(parent) == ChildPolicy::None {
            prop_assert!(!can_be_child_of(child, parent));
        }
    }

    #[test]
    fn removing_root_is_identity(steps in steps()) {
        let root = build_tree(&steps);
        let result = remove_node(&root, &root.id);
        prop_assert!(Arc::ptr_eq(&root, &result));
    }

    #[test]
    fn grown_trees_stay_valid(steps in steps()) {
        let root = build_tree(&steps);

        prop_assert!(count_nodes(&root) <= MAX_NODES);
        prop_assert!(validate_schema(&Schema::new(root.clone())).is_empty());
        prop_assert_eq!(flatten_tree(&root).len(), count_nodes(&root));
    }

    #[test]
    fn clones_never_reuse_ids(steps in steps()) {
        let root = build_tree(&steps);
        let copy = clone_node(&root);

        let originals = collect_ids(&root);
        for id in collect_ids(&copy) {
            prop_assert!(!originals.contains(&id));
        }
    }

    #[test]
    fn added_node_is_found_unchanged(steps in steps(), pick in any::<usize>()) {
        let root = build_tree(&steps);
        let child = create_node(ComponentType::Typography, None);
        let ids = collect_ids(&root);
        let parent_id = &ids[pick % ids.len()];

        let result = add_child_node(&root, parent_id, child.clone(), None);
        if !Arc::ptr_eq(&root, &result) {
            let found = find_node_by_id(&result, &child.id).unwrap();
            prop_assert_eq!(found.as_ref(), &child);
        }
    }

    #[test]
    fn moving_into_own_subtree_changes_nothing(
        steps in steps(),
        a in any::<usize>(),
        b in any::<usize>(),
    ) {
        let root = build_tree(&steps);
        let ids = collect_ids(&root);
        let node_id = &ids[a % ids.len()];
        let target_id = &ids[b % ids.len()];

        if node_id == target_id || is_descendant(&root, node_id, target_id) {
            let result = move_node(&root, node_id, target_id, None);
            prop_assert!(Arc::ptr_eq(&root, &result));
        }
    }

    #[test]
    fn moves_preserve_node_count(steps in steps(), a in any::<usize>(), b in any::<usize>()) {
        let root = build_tree(&steps);
        let ids = collect_ids(&root);

        let result = move_node(&root, &ids[a % ids.len()], &ids[b % ids.len()], None);

        prop_assert_eq!(count_nodes(&result), count_nodes(&root));
        prop_assert!(validate_schema(&Schema::new(result)).is_empty());
    }
}
