//! # Tree Operations
//!
//! Pure functions over an immutable tree of `Arc<SchemaNode>`.
//!
//! ## Semantics
//!
//! - Every operation returns a new root and leaves its input untouched.
//! - Only the path from the changed node up to the root is rebuilt; every
//!   other subtree is shared with the input by reference.
//! - When the change is refused or its target does not exist, the input root
//!   itself is returned (`Arc::ptr_eq(&input, &output)` holds), so callers can
//!   attempt a mutation optimistically and simply ignore an unchanged result.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::factory::generate_id;
use crate::node::{NodeId, Props, SchemaNode};
use crate::validation::{self, MAX_NODES};

/// One row of a linear (indented) view of the tree
#[derive(Debug, Clone, Copy)]
pub struct FlatNode<'a> {
    pub node: &'a Arc<SchemaNode>,
    pub depth: usize,
}

/// Depth-first lookup by id
pub fn find_node_by_id<'a>(root: &'a Arc<SchemaNode>, id: &str) -> Option<&'a Arc<SchemaNode>> {
    if root.id == id {
        return Some(root);
    }

    root.children()
        .iter()
        .find_map(|child| find_node_by_id(child, id))
}

/// Immediate parent of `id`; `None` for the root or an unknown id
pub fn find_parent_node<'a>(root: &'a Arc<SchemaNode>, id: &str) -> Option<&'a Arc<SchemaNode>> {
    for child in root.children() {
        if child.id == id {
            return Some(root);
        }

        if let Some(parent) = find_parent_node(child, id) {
            return Some(parent);
        }
    }

    None
}

/// Ids from the root down to `id`, inclusive
pub fn find_node_path(root: &Arc<SchemaNode>, id: &str) -> Option<Vec<NodeId>> {
    fn walk(node: &SchemaNode, id: &str, path: &mut Vec<NodeId>) -> bool {
        path.push(node.id.clone());

        if node.id == id || node.children().iter().any(|child| walk(child, id, path)) {
            return true;
        }

        path.pop();
        false
    }

    let mut path = Vec::new();
    walk(root, id, &mut path).then_some(path)
}

/// Position of `id` within its parent's children
pub fn child_index(root: &Arc<SchemaNode>, id: &str) -> Option<usize> {
    find_parent_node(root, id)?
        .children()
        .iter()
        .position(|child| child.id == id)
}

/// Every id in the tree, pre-order
pub fn collect_ids(root: &SchemaNode) -> Vec<NodeId> {
    let mut ids = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        ids.push(node.id.clone());
        stack.extend(node.children().iter().rev().map(|child| child.as_ref()));
    }

    ids
}

/// Deep copy of `node` with a fresh id at every level
pub fn clone_node(node: &SchemaNode) -> SchemaNode {
    SchemaNode {
        id: generate_id(),
        component_type: node.component_type,
        props: node.props.clone(),
        children: node
            .children
            .as_ref()
            .map(|children| children.iter().map(|child| Arc::new(clone_node(child))).collect()),
    }
}

/// Insert `child` under `parent_id` at `index` (clamped; defaults to the end).
///
/// Refused when the parent is missing, the registry policy rejects the
/// pairing, a single-child parent is already occupied, the child's id is
/// already in the tree, or the node ceiling would be exceeded.
pub fn add_child_node(
    root: &Arc<SchemaNode>,
    parent_id: &str,
    child: impl Into<Arc<SchemaNode>>,
    index: Option<usize>,
) -> Arc<SchemaNode> {
    let child = child.into();

    let Some(parent) = find_node_by_id(root, parent_id) else {
        debug!(parent_id, "add_child_node: parent not found");
        return Arc::clone(root);
    };

    if find_node_by_id(root, &child.id).is_some() {
        warn!(node_id = %child.id, "add_child_node: id already present in tree");
        return Arc::clone(root);
    }

    let checked = validation::check_placement(child.component_type, parent)
        .and_then(|_| validation::check_capacity(root, count_nodes(&child), MAX_NODES));

    if let Err(e) = checked {
        warn!(
            parent_id,
            child_type = %child.component_type,
            error = %e,
            "add_child_node refused"
        );
        return Arc::clone(root);
    }

    rebuild(root, parent_id, &mut |parent: &SchemaNode| {
        let mut children = parent.children.clone()?;
        let at = index.unwrap_or(children.len()).min(children.len());
        children.insert(at, Arc::clone(&child));
        Some(parent.with_children(Some(children)))
    })
    .unwrap_or_else(|| Arc::clone(root))
}

/// Remove `id` and its whole subtree. The root is never removed.
pub fn remove_node(root: &Arc<SchemaNode>, id: &str) -> Arc<SchemaNode> {
    if root.id == id {
        debug!(node_id = id, "remove_node: root is permanent");
        return Arc::clone(root);
    }

    remove_descendant(root, id).unwrap_or_else(|| {
        debug!(node_id = id, "remove_node: node not found");
        Arc::clone(root)
    })
}

fn remove_descendant(node: &Arc<SchemaNode>, id: &str) -> Option<Arc<SchemaNode>> {
    let children = node.children.as_ref()?;

    if let Some(pos) = children.iter().position(|child| child.id == id) {
        let mut remaining = children.clone();
        remaining.remove(pos);
        return Some(Arc::new(node.with_children(Some(remaining))));
    }

    children.iter().enumerate().find_map(|(index, child)| {
        remove_descendant(child, id).map(|replaced| {
            let mut rebuilt = children.clone();
            rebuilt[index] = replaced;
            Arc::new(node.with_children(Some(rebuilt)))
        })
    })
}

/// Shallow-merge `partial` over the target's props
pub fn update_node_props(root: &Arc<SchemaNode>, id: &str, partial: &Props) -> Arc<SchemaNode> {
    let result = rebuild(root, id, &mut |node: &SchemaNode| {
        let unchanged = partial
            .iter()
            .all(|(key, value)| node.props.get(key) == Some(value));
        if unchanged {
            return None;
        }

        let mut updated = node.with_children(node.children.clone());
        updated
            .props
            .extend(partial.iter().map(|(key, value)| (key.clone(), value.clone())));
        Some(updated)
    });

    result.unwrap_or_else(|| {
        debug!(node_id = id, "update_node_props: nothing to change");
        Arc::clone(root)
    })
}

/// Detach `node_id` and re-insert it under `new_parent_id`.
///
/// Ids of the moved subtree are preserved. `index` refers to the parent's
/// children after the node has been detached. If the insert is refused
/// (including a target inside the moved subtree, which no longer exists once
/// detached) the original root is returned.
pub fn move_node(
    root: &Arc<SchemaNode>,
    node_id: &str,
    new_parent_id: &str,
    index: Option<usize>,
) -> Arc<SchemaNode> {
    if root.id == node_id {
        debug!(node_id, "move_node: root cannot move");
        return Arc::clone(root);
    }

    let Some(node) = find_node_by_id(root, node_id) else {
        debug!(node_id, "move_node: node not found");
        return Arc::clone(root);
    };
    let node = Arc::clone(node);

    let detached = remove_node(root, node_id);
    let moved = add_child_node(&detached, new_parent_id, node, index);

    if Arc::ptr_eq(&moved, &detached) {
        return Arc::clone(root);
    }

    moved
}

/// Move a child of `parent_id` from `from_index` to `to_index` (clamped)
pub fn reorder_children(
    root: &Arc<SchemaNode>,
    parent_id: &str,
    from_index: usize,
    to_index: usize,
) -> Arc<SchemaNode> {
    let result = rebuild(root, parent_id, &mut |parent: &SchemaNode| {
        let children = parent.children.as_ref()?;
        if from_index >= children.len() {
            return None;
        }

        let to_index = to_index.min(children.len() - 1);
        if to_index == from_index {
            return None;
        }

        let mut reordered = children.clone();
        let item = reordered.remove(from_index);
        reordered.insert(to_index, item);
        Some(parent.with_children(Some(reordered)))
    });

    result.unwrap_or_else(|| Arc::clone(root))
}

/// Root plus all descendants
pub fn count_nodes(root: &SchemaNode) -> usize {
    1 + root.children().iter().map(|child| count_nodes(child)).sum::<usize>()
}

pub fn validate_node_count(root: &SchemaNode, max_nodes: usize) -> bool {
    count_nodes(root) <= max_nodes
}

/// Pre-order `(node, depth)` rows, depth 0 at the root
pub fn flatten_tree(root: &Arc<SchemaNode>) -> Vec<FlatNode<'_>> {
    flatten_tree_with(root, |_| true)
}

/// Like [`flatten_tree`], but only descends into nodes for which `descend`
/// returns true (e.g. the expanded rows of a layer panel)
pub fn flatten_tree_with<'a, F>(root: &'a Arc<SchemaNode>, descend: F) -> Vec<FlatNode<'a>>
where
    F: Fn(&SchemaNode) -> bool,
{
    fn walk<'a, F: Fn(&SchemaNode) -> bool>(
        node: &'a Arc<SchemaNode>,
        depth: usize,
        descend: &F,
        rows: &mut Vec<FlatNode<'a>>,
    ) {
        rows.push(FlatNode { node, depth });

        if descend(node.as_ref()) {
            for child in node.children() {
                walk(child, depth + 1, descend, rows);
            }
        }
    }

    let mut rows = Vec::new();
    walk(root, 0, &descend, &mut rows);
    rows
}

/// Rebuild the spine from `node` down to `id`, replacing the target with
/// `replace(target)`. Returns `None` if the target is missing or `replace`
/// declines.
fn rebuild<F>(node: &Arc<SchemaNode>, id: &str, replace: &mut F) -> Option<Arc<SchemaNode>>
where
    F: FnMut(&SchemaNode) -> Option<SchemaNode>,
{
    if node.id == id {
        return replace(node.as_ref()).map(Arc::new);
    }

    let children = node.children.as_ref()?;
    for (index, child) in children.iter().enumerate() {
        if let Some(replaced) = rebuild(child, id, replace) {
            let mut rebuilt = children.clone();
            rebuilt[index] = replaced;
            return Some(Arc::new(node.with_children(Some(rebuilt))));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;
    use crate::factory::{create_empty_schema, create_node};
    use serde_json::json;

    /// root Box → [Stack → [Typography, Button], Card]
    fn sample() -> (Arc<SchemaNode>, NodeId, NodeId, NodeId, NodeId) {
        let root: Arc<SchemaNode> = create_empty_schema().root;
        let stack = create_node(ComponentType::Stack, None);
        let text = create_node(ComponentType::Typography, None);
        let button = create_node(ComponentType::Button, None);
        let card = create_node(ComponentType::Card, None);
        let (stack_id, text_id, button_id, card_id) =
            (stack.id.clone(), text.id.clone(), button.id.clone(), card.id.clone());

        let root_id = root.id.clone();
        let root = add_child_node(&root, &root_id, stack, None);
        let root = add_child_node(&root, &stack_id, text, None);
        let root = add_child_node(&root, &stack_id, button, None);
        let root = add_child_node(&root, &root_id, card, None);

        (root, stack_id, text_id, button_id, card_id)
    }

    #[test]
    fn test_find_node_and_parent() {
        let (root, stack_id, text_id, _, _) = sample();

        assert_eq!(find_node_by_id(&root, &text_id).unwrap().id, text_id);
        assert_eq!(find_parent_node(&root, &text_id).unwrap().id, stack_id);
        assert!(find_parent_node(&root, &root.id).is_none());
        assert!(find_node_by_id(&root, "missing").is_none());
        assert!(find_parent_node(&root, "missing").is_none());
    }

    #[test]
    fn test_node_path_and_index() {
        let (root, stack_id, _, button_id, card_id) = sample();

        assert_eq!(
            find_node_path(&root, &button_id).unwrap(),
            vec![root.id.clone(), stack_id, button_id.clone()]
        );
        assert_eq!(child_index(&root, &button_id), Some(1));
        assert_eq!(child_index(&root, &card_id), Some(1));
        assert_eq!(child_index(&root, &root.id), None);
        assert!(find_node_path(&root, "missing").is_none());
    }

    #[test]
    fn test_add_shares_untouched_subtrees() {
        let (root, stack_id, _, _, card_id) = sample();
        let chip = create_node(ComponentType::Chip, None);

        let updated = add_child_node(&root, &card_id, chip, None);

        let old_stack = find_node_by_id(&root, &stack_id).unwrap();
        let new_stack = find_node_by_id(&updated, &stack_id).unwrap();
        assert!(Arc::ptr_eq(old_stack, new_stack));
        assert!(!Arc::ptr_eq(&root, &updated));
        assert_eq!(count_nodes(&root), 5);
        assert_eq!(count_nodes(&updated), 6);
    }

    #[test]
    fn test_add_clamps_index() {
        let (root, stack_id, text_id, button_id, _) = sample();
        let chip = create_node(ComponentType::Chip, None);
        let chip_id = chip.id.clone();

        let updated = add_child_node(&root, &stack_id, chip, Some(99));
        let ids: Vec<_> = find_node_by_id(&updated, &stack_id)
            .unwrap()
            .children()
            .iter()
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(ids, vec![text_id, button_id, chip_id]);
    }

    #[test]
    fn test_add_under_leaf_is_refused() {
        let (root, _, text_id, _, _) = sample();
        let button = create_node(ComponentType::Button, None);

        let updated = add_child_node(&root, &text_id, button, None);
        assert!(Arc::ptr_eq(&root, &updated));
    }

    #[test]
    fn test_add_same_node_twice_is_refused() {
        let (root, stack_id, _, _, card_id) = sample();
        let chip = Arc::new(create_node(ComponentType::Chip, None));

        let once = add_child_node(&root, &stack_id, Arc::clone(&chip), None);
        let twice = add_child_node(&once, &card_id, chip, None);
        assert!(Arc::ptr_eq(&once, &twice));
    }

    #[test]
    fn test_single_policy_holds_one_child() {
        let root = create_empty_schema().root;
        let tooltip = create_node(ComponentType::Tooltip, None);
        let tooltip_id = tooltip.id.clone();
        let root_id = root.id.clone();

        let root = add_child_node(&root, &root_id, tooltip, None);
        let button = create_node(ComponentType::Button, None);
        let root = add_child_node(&root, &tooltip_id, button, None);
        let chip = create_node(ComponentType::Chip, None);
        let refused = add_child_node(&root, &tooltip_id, chip, None);

        assert!(Arc::ptr_eq(&root, &refused));
    }

    #[test]
    fn test_remove_root_is_noop() {
        let (root, ..) = sample();
        let updated = remove_node(&root, &root.id);
        assert!(Arc::ptr_eq(&root, &updated));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let (root, stack_id, text_id, _, card_id) = sample();

        let updated = remove_node(&root, &stack_id);

        assert_eq!(count_nodes(&updated), 2);
        assert!(find_node_by_id(&updated, &text_id).is_none());
        let card = find_node_by_id(&updated, &card_id).unwrap();
        assert!(Arc::ptr_eq(card, find_node_by_id(&root, &card_id).unwrap()));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (root, ..) = sample();
        assert!(Arc::ptr_eq(&root, &remove_node(&root, "missing")));
    }

    #[test]
    fn test_update_props_merges_shallowly() {
        let (root, _, text_id, _, _) = sample();
        let mut partial = Props::new();
        partial.insert("text".to_string(), json!("Hello"));

        let updated = update_node_props(&root, &text_id, &partial);
        let node = find_node_by_id(&updated, &text_id).unwrap();

        assert_eq!(node.props["text"], json!("Hello"));
        assert_eq!(node.props["variant"], json!("body1"));
        assert_ne!(find_node_by_id(&root, &text_id).unwrap().props["text"], json!("Hello"));
    }

    #[test]
    fn test_update_props_without_change_is_noop() {
        let (root, _, text_id, _, _) = sample();
        let mut partial = Props::new();
        partial.insert("variant".to_string(), json!("body1"));

        assert!(Arc::ptr_eq(&root, &update_node_props(&root, &text_id, &partial)));
        assert!(Arc::ptr_eq(&root, &update_node_props(&root, "missing", &partial)));
    }

    #[test]
    fn test_move_preserves_ids() {
        let (root, stack_id, text_id, _, card_id) = sample();

        let updated = move_node(&root, &stack_id, &card_id, None);

        assert_eq!(find_parent_node(&updated, &stack_id).unwrap().id, card_id);
        assert_eq!(find_parent_node(&updated, &text_id).unwrap().id, stack_id);
        assert_eq!(count_nodes(&updated), count_nodes(&root));
    }

    #[test]
    fn test_move_into_own_subtree_is_refused() {
        let (root, stack_id, ..) = sample();
        let inner = create_node(ComponentType::Box, None);
        let inner_id = inner.id.clone();
        let root = add_child_node(&root, &stack_id, inner, None);

        assert!(Arc::ptr_eq(&root, &move_node(&root, &stack_id, &inner_id, None)));
        assert!(Arc::ptr_eq(&root, &move_node(&root, &stack_id, &stack_id, None)));
    }

    #[test]
    fn test_move_to_disallowed_parent_keeps_node() {
        let (root, _, text_id, button_id, _) = sample();

        let updated = move_node(&root, &button_id, &text_id, None);

        assert!(Arc::ptr_eq(&root, &updated));
        assert!(find_node_by_id(&updated, &button_id).is_some());
    }

    #[test]
    fn test_reorder_children() {
        let (root, stack_id, text_id, button_id, _) = sample();

        let updated = reorder_children(&root, &stack_id, 0, 5);
        let ids: Vec<_> = find_node_by_id(&updated, &stack_id)
            .unwrap()
            .children()
            .iter()
            .map(|c| c.id.clone())
            .collect();

        assert_eq!(ids, vec![button_id, text_id.clone()]);
        assert!(Arc::ptr_eq(&root, &reorder_children(&root, &stack_id, 4, 0)));
        assert!(Arc::ptr_eq(&root, &reorder_children(&root, &text_id, 0, 1)));
    }

    #[test]
    fn test_clone_assigns_fresh_ids() {
        let (root, stack_id, ..) = sample();
        let stack = find_node_by_id(&root, &stack_id).unwrap();

        let copy = clone_node(stack);

        assert_eq!(count_nodes(&copy), count_nodes(stack));
        for (original, cloned) in collect_ids(stack).iter().zip(collect_ids(&copy)) {
            assert_ne!(*original, cloned);
        }
        assert_eq!(copy.children()[0].props, stack.children()[0].props);
    }

    #[test]
    fn test_flatten_is_preorder_with_depth() {
        let (root, stack_id, text_id, button_id, card_id) = sample();

        let rows: Vec<_> = flatten_tree(&root)
            .iter()
            .map(|row| (row.node.id.clone(), row.depth))
            .collect();

        assert_eq!(
            rows,
            vec![
                (root.id.clone(), 0),
                (stack_id.clone(), 1),
                (text_id, 2),
                (button_id, 2),
                (card_id.clone(), 1),
            ]
        );

        let collapsed = flatten_tree_with(&root, |node| node.id != stack_id);
        assert_eq!(collapsed.len(), 3);
    }

    #[test]
    fn test_collect_ids_matches_flatten_order() {
        let (root, ..) = sample();
        let flat: Vec<_> = flatten_tree(&root).iter().map(|r| r.node.id.clone()).collect();
        assert_eq!(collect_ids(&root), flat);
    }

    #[test]
    fn test_validate_node_count() {
        let (root, ..) = sample();
        assert!(validate_node_count(&root, 5));
        assert!(!validate_node_count(&root, 4));
    }
}
