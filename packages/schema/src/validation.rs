//! # Validation Layer
//!
//! Checks that gate every structural change before it takes effect, plus a
//! whole-document check for schemas loaded from outside.
//!
//! - **Placement**: registry policy via [`can_be_child_of`], plus the
//!   one-child limit of `single` parents
//! - **Capacity**: the document never exceeds [`MAX_NODES`] nodes
//! - **Structure**: the root is never moved, removed or duplicated, and a
//!   node is never moved into its own subtree

use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use crate::component::{ChildPolicy, ComponentType};
use crate::error::ValidationError;
use crate::node::{NodeId, Schema, SchemaNode};
use crate::registry::{self, can_be_child_of};
use crate::tree::{count_nodes, find_node_by_id, find_parent_node};

/// Hard ceiling on the number of nodes in a schema, root included
pub const MAX_NODES: usize = 200;

/// A problem found in a loaded document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("{component_type} node {node_id} cannot have children")]
    UnexpectedChildren {
        node_id: NodeId,
        component_type: ComponentType,
    },

    #[error("{component_type} node {node_id} is missing its children list")]
    MissingChildren {
        node_id: NodeId,
        component_type: ComponentType,
    },

    #[error("{child} node {node_id} cannot be placed inside {parent}")]
    InvalidPlacement {
        node_id: NodeId,
        child: ComponentType,
        parent: ComponentType,
    },

    #[error("{component_type} node {node_id} holds {count} children but accepts one")]
    TooManyChildren {
        node_id: NodeId,
        component_type: ComponentType,
        count: usize,
    },

    #[error("Schema holds {count} nodes, limit is {max}")]
    TooManyNodes { count: usize, max: usize },

    #[error("Root {node_id} is a {component_type}, which cannot hold children")]
    LeafRoot {
        node_id: NodeId,
        component_type: ComponentType,
    },
}

/// Whether `node_id` lies strictly inside the subtree of `ancestor_id`
pub fn is_descendant(root: &Arc<SchemaNode>, ancestor_id: &str, node_id: &str) -> bool {
    find_node_by_id(root, ancestor_id)
        .map(|ancestor| {
            ancestor
                .children()
                .iter()
                .any(|child| find_node_by_id(child, node_id).is_some())
        })
        .unwrap_or(false)
}

/// Can a `child_type` node be appended to `parent` as it stands?
pub fn check_placement(
    child_type: ComponentType,
    parent: &SchemaNode,
) -> Result<(), ValidationError> {
    if !can_be_child_of(child_type, parent.component_type) {
        return Err(ValidationError::PolicyViolation {
            child: child_type,
            parent: parent.component_type,
        });
    }

    if registry::child_policy(parent.component_type) == ChildPolicy::Single
        && !parent.children().is_empty()
    {
        return Err(ValidationError::ChildLimitReached {
            parent: parent.component_type,
        });
    }

    Ok(())
}

/// Would `incoming` more nodes still fit under `max`?
pub fn check_capacity(
    root: &SchemaNode,
    incoming: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let current = count_nodes(root);

    if current + incoming > max {
        return Err(ValidationError::CapacityExceeded {
            current,
            incoming,
            max,
        });
    }

    Ok(())
}

/// Gate for inserting a new subtree of `incoming` nodes under `parent_id`
pub fn check_add(
    root: &Arc<SchemaNode>,
    parent_id: &str,
    child_type: ComponentType,
    incoming: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let parent = find_node_by_id(root, parent_id)
        .ok_or_else(|| ValidationError::ParentNotFound(parent_id.to_string()))?;

    check_placement(child_type, parent)?;
    check_capacity(root, incoming, max)
}

/// Gate for relocating `node_id` under `new_parent_id`
pub fn check_move(
    root: &Arc<SchemaNode>,
    node_id: &str,
    new_parent_id: &str,
) -> Result<(), ValidationError> {
    if root.id == node_id {
        return Err(ValidationError::RootProtected("moved"));
    }

    let node = find_node_by_id(root, node_id)
        .ok_or_else(|| ValidationError::NodeNotFound(node_id.to_string()))?;

    let new_parent = find_node_by_id(root, new_parent_id)
        .ok_or_else(|| ValidationError::ParentNotFound(new_parent_id.to_string()))?;

    if node_id == new_parent_id || is_descendant(root, node_id, new_parent_id) {
        return Err(ValidationError::CycleDetected);
    }

    if !can_be_child_of(node.component_type, new_parent.component_type) {
        return Err(ValidationError::PolicyViolation {
            child: node.component_type,
            parent: new_parent.component_type,
        });
    }

    // A node already inside a single-child parent may be re-placed there
    let occupied = new_parent
        .children()
        .iter()
        .filter(|child| child.id != node_id)
        .count();

    if registry::child_policy(new_parent.component_type) == ChildPolicy::Single && occupied > 0 {
        return Err(ValidationError::ChildLimitReached {
            parent: new_parent.component_type,
        });
    }

    Ok(())
}

/// Gate for deleting `node_id`
pub fn check_remove(root: &Arc<SchemaNode>, node_id: &str) -> Result<(), ValidationError> {
    if root.id == node_id {
        return Err(ValidationError::RootProtected("deleted"));
    }

    find_node_by_id(root, node_id)
        .map(|_| ())
        .ok_or_else(|| ValidationError::NodeNotFound(node_id.to_string()))
}

/// Gate for duplicating `node_id` next to itself. Returns the subtree size.
pub fn check_duplicate(
    root: &Arc<SchemaNode>,
    node_id: &str,
    max: usize,
) -> Result<usize, ValidationError> {
    if root.id == node_id {
        return Err(ValidationError::RootProtected("duplicated"));
    }

    let node = find_node_by_id(root, node_id)
        .ok_or_else(|| ValidationError::NodeNotFound(node_id.to_string()))?;

    let parent = find_parent_node(root, node_id)
        .ok_or_else(|| ValidationError::NodeNotFound(node_id.to_string()))?;

    let incoming = count_nodes(node);
    check_placement(node.component_type, parent)?;
    check_capacity(root, incoming, max)?;

    Ok(incoming)
}

/// Every structural problem in `schema`; empty when the document is sound
pub fn validate_schema(schema: &Schema) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    let count = count_nodes(&schema.root);
    if count > MAX_NODES {
        issues.push(ValidationIssue::TooManyNodes {
            count,
            max: MAX_NODES,
        });
    }

    if !registry::child_policy(schema.root.component_type).allows_children() {
        issues.push(ValidationIssue::LeafRoot {
            node_id: schema.root.id.clone(),
            component_type: schema.root.component_type,
        });
    }

    let mut stack: Vec<&SchemaNode> = vec![schema.root.as_ref()];
    while let Some(node) = stack.pop() {
        if !seen.insert(node.id.as_str()) {
            issues.push(ValidationIssue::DuplicateId(node.id.clone()));
        }

        let policy = registry::child_policy(node.component_type);

        match (&node.children, policy.allows_children()) {
            (Some(_), false) => issues.push(ValidationIssue::UnexpectedChildren {
                node_id: node.id.clone(),
                component_type: node.component_type,
            }),
            (None, true) => issues.push(ValidationIssue::MissingChildren {
                node_id: node.id.clone(),
                component_type: node.component_type,
            }),
            _ => {}
        }

        if policy == ChildPolicy::Single && node.children().len() > 1 {
            issues.push(ValidationIssue::TooManyChildren {
                node_id: node.id.clone(),
                component_type: node.component_type,
                count: node.children().len(),
            });
        }

        for child in node.children() {
            if !can_be_child_of(child.component_type, node.component_type) {
                issues.push(ValidationIssue::InvalidPlacement {
                    node_id: child.id.clone(),
                    child: child.component_type,
                    parent: node.component_type,
                });
            }
            stack.push(child);
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{create_empty_schema, create_node};
    use crate::tree::add_child_node;

    fn with_child(component_type: ComponentType) -> (Arc<SchemaNode>, NodeId) {
        let root = create_empty_schema().root;
        let child = create_node(component_type, None);
        let child_id = child.id.clone();
        let root_id = root.id.clone();
        (add_child_node(&root, &root_id, child, None), child_id)
    }

    #[test]
    fn test_is_descendant() {
        let (root, stack_id) = with_child(ComponentType::Stack);
        let text = create_node(ComponentType::Typography, None);
        let text_id = text.id.clone();
        let root = add_child_node(&root, &stack_id, text, None);

        assert!(is_descendant(&root, &root.id, &text_id));
        assert!(is_descendant(&root, &stack_id, &text_id));
        assert!(!is_descendant(&root, &text_id, &stack_id));
        assert!(!is_descendant(&root, &stack_id, &stack_id));
        assert!(!is_descendant(&root, "missing", &stack_id));
    }

    #[test]
    fn test_check_add_reports_reason() {
        let (root, text_id) = with_child(ComponentType::Typography);

        assert_eq!(
            check_add(&root, &text_id, ComponentType::Button, 1, MAX_NODES),
            Err(ValidationError::PolicyViolation {
                child: ComponentType::Button,
                parent: ComponentType::Typography,
            })
        );
        assert_eq!(
            check_add(&root, "missing", ComponentType::Button, 1, MAX_NODES),
            Err(ValidationError::ParentNotFound("missing".to_string()))
        );
        assert!(matches!(
            check_add(&root, &root.id, ComponentType::Button, 1, 2),
            Err(ValidationError::CapacityExceeded { current: 2, incoming: 1, max: 2 })
        ));
        assert!(check_add(&root, &root.id, ComponentType::Button, 1, MAX_NODES).is_ok());
    }

    #[test]
    fn test_check_move_rejects_cycles_and_root() {
        let (root, stack_id) = with_child(ComponentType::Stack);
        let inner = create_node(ComponentType::Box, None);
        let inner_id = inner.id.clone();
        let root = add_child_node(&root, &stack_id, inner, None);

        assert_eq!(check_move(&root, &stack_id, &inner_id), Err(ValidationError::CycleDetected));
        assert_eq!(check_move(&root, &stack_id, &stack_id), Err(ValidationError::CycleDetected));
        assert_eq!(
            check_move(&root, &root.id, &stack_id),
            Err(ValidationError::RootProtected("moved"))
        );
        assert!(check_move(&root, &inner_id, &root.id).is_ok());
    }

    #[test]
    fn test_check_move_within_single_parent() {
        let (root, badge_id) = with_child(ComponentType::Badge);
        let avatar = create_node(ComponentType::Avatar, None);
        let avatar_id = avatar.id.clone();
        let root = add_child_node(&root, &badge_id, avatar, None);

        assert!(check_move(&root, &avatar_id, &badge_id).is_ok());

        let chip = create_node(ComponentType::Chip, None);
        let chip_id = chip.id.clone();
        let root_id = root.id.clone();
        let root = add_child_node(&root, &root_id, chip, None);
        assert_eq!(
            check_move(&root, &chip_id, &badge_id),
            Err(ValidationError::ChildLimitReached {
                parent: ComponentType::Badge
            })
        );
    }

    #[test]
    fn test_check_remove_and_duplicate_protect_root() {
        let (root, chip_id) = with_child(ComponentType::Chip);

        assert_eq!(check_remove(&root, &root.id), Err(ValidationError::RootProtected("deleted")));
        assert_eq!(
            check_duplicate(&root, &root.id, MAX_NODES),
            Err(ValidationError::RootProtected("duplicated"))
        );
        assert_eq!(check_duplicate(&root, &chip_id, MAX_NODES), Ok(1));
        assert!(check_remove(&root, &chip_id).is_ok());
    }

    #[test]
    fn test_validate_schema_accepts_built_documents() {
        let (root, _) = with_child(ComponentType::Stack);
        assert!(validate_schema(&Schema::new(root)).is_empty());
    }

    #[test]
    fn test_validate_schema_finds_duplicates_and_placement() {
        let mut list_item = create_node(ComponentType::ListItem, None);
        list_item.id = "dup".to_string();
        let mut root = create_node(ComponentType::Box, None);
        root.id = "dup".to_string();
        root.children = Some(vec![Arc::new(list_item)]);

        let issues = validate_schema(&Schema::new(Arc::new(root)));

        assert!(issues.contains(&ValidationIssue::DuplicateId("dup".to_string())));
        assert!(issues.contains(&ValidationIssue::InvalidPlacement {
            node_id: "dup".to_string(),
            child: ComponentType::ListItem,
            parent: ComponentType::Box,
        }));
    }

    #[test]
    fn test_validate_schema_finds_missing_children() {
        let mut root = create_node(ComponentType::Box, None);
        root.children = None;

        let issues = validate_schema(&Schema::new(Arc::new(root)));
        assert!(matches!(issues.as_slice(), [ValidationIssue::MissingChildren { .. }]));
    }

    #[test]
    fn test_validate_schema_rejects_leaf_root() {
        let root = create_node(ComponentType::Typography, None);
        let root_id = root.id.clone();

        let issues = validate_schema(&Schema::new(Arc::new(root)));
        assert_eq!(
            issues,
            vec![ValidationIssue::LeafRoot {
                node_id: root_id,
                component_type: ComponentType::Typography,
            }]
        );
    }
}
