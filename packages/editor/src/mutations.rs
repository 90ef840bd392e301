//! # Schema Mutations
//!
//! Serializable intents that collaborators (renderer, layer panel,
//! properties panel, keyboard handler) send to the store instead of touching
//! the schema themselves.
//!
//! ## Semantics
//!
//! ### AddNode / PasteNode
//! - Placement must satisfy the parent's child policy
//! - Refused once the node budget is used up; never partially applied
//!
//! ### MoveNode
//! - Ids of the moved subtree are preserved
//! - Fails on the root, on the node itself, or on any of its descendants
//!
//! ### RemoveNode / DuplicateNode
//! - The root is permanent and never duplicated
//!
//! ### UpdateNode
//! - Shallow merge over existing props; last write wins

use serde::{Deserialize, Serialize};
use uischema::{ComponentType, NodeId, Props};

/// Structural and property intents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Create a node of `component_type` under a parent
    AddNode {
        parent_id: NodeId,
        component_type: ComponentType,
        #[serde(default)]
        props: Option<Props>,
        #[serde(default)]
        index: Option<usize>,
    },

    /// Merge props into a node
    UpdateNode { node_id: NodeId, props: Props },

    /// Remove a node and its subtree
    RemoveNode { node_id: NodeId },

    /// Move a node under a new parent at index
    MoveNode {
        node_id: NodeId,
        new_parent_id: NodeId,
        #[serde(default)]
        index: Option<usize>,
    },

    /// Insert a fresh copy right after the node
    DuplicateNode { node_id: NodeId },

    /// Change a child's position inside its parent
    ReorderChildren {
        parent_id: NodeId,
        from_index: usize,
        to_index: usize,
    },

    /// Insert a fresh copy of the clipboard content
    PasteNode {
        parent_id: NodeId,
        #[serde(default)]
        index: Option<usize>,
    },
}

impl Mutation {
    /// Label shown next to undo/redo
    pub fn description(&self) -> String {
        match self {
            Mutation::AddNode { component_type, .. } => format!("Add {component_type}"),
            Mutation::UpdateNode { .. } => "Update properties".to_string(),
            Mutation::RemoveNode { .. } => "Delete node".to_string(),
            Mutation::MoveNode { .. } => "Move node".to_string(),
            Mutation::DuplicateNode { .. } => "Duplicate node".to_string(),
            Mutation::ReorderChildren { .. } => "Reorder children".to_string(),
            Mutation::PasteNode { .. } => "Paste".to_string(),
        }
    }

    /// Node the intent is aimed at (the parent for inserts)
    pub fn target_id(&self) -> &str {
        match self {
            Mutation::AddNode { parent_id, .. }
            | Mutation::ReorderChildren { parent_id, .. }
            | Mutation::PasteNode { parent_id, .. } => parent_id,
            Mutation::UpdateNode { node_id, .. }
            | Mutation::RemoveNode { node_id }
            | Mutation::MoveNode { node_id, .. }
            | Mutation::DuplicateNode { node_id } => node_id,
        }
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Whether a new schema revision was committed
    pub changed: bool,

    /// Node created or affected, if any
    pub node_id: Option<NodeId>,
}

impl MutationOutcome {
    pub(crate) fn changed(node_id: Option<NodeId>) -> Self {
        Self {
            changed: true,
            node_id,
        }
    }

    pub(crate) fn unchanged() -> Self {
        Self {
            changed: false,
            node_id: None,
        }
    }
}
