//! # Edit Session State
//!
//! UI-only state that lives next to the schema but is never part of it and
//! never enters undo history: selection, hover, inline editing, drag, and
//! which rows of the layer tree are expanded.
//!
//! ```text
//! Idle ──select──▶ Selected ──double-click──▶ Editing
//!  ▲                  │  ▲                       │
//!  └──delete/clear────┘  └───────commit/blur─────┘
//! ```

use std::collections::{BTreeSet, HashSet};
use uischema::NodeId;

/// Selection state machine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Selected(NodeId),
    Editing(NodeId),
}

/// Per-editor interaction state
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    mode: InteractionMode,
    hovered: Option<NodeId>,
    expanded: BTreeSet<NodeId>,
    dragging: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Selected node, including one being edited
    pub fn selected_node_id(&self) -> Option<&str> {
        match &self.mode {
            InteractionMode::Idle => None,
            InteractionMode::Selected(id) | InteractionMode::Editing(id) => Some(id.as_str()),
        }
    }

    pub fn editing_node_id(&self) -> Option<&str> {
        match &self.mode {
            InteractionMode::Editing(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, InteractionMode::Editing(_))
    }

    /// Select a node (leaving any inline edit) or clear the selection.
    /// Returns true if the selected id changed.
    pub fn select(&mut self, node_id: Option<NodeId>) -> bool {
        let previous = self.selected_node_id().map(str::to_string);
        self.mode = match node_id {
            Some(id) => InteractionMode::Selected(id),
            None => InteractionMode::Idle,
        };
        previous.as_deref() != self.selected_node_id()
    }

    /// Enter or leave inline editing of the selected node.
    /// Returns false when there is nothing selected to edit.
    pub fn set_editing(&mut self, editing: bool) -> bool {
        self.mode = match (std::mem::take(&mut self.mode), editing) {
            (InteractionMode::Selected(id), true) | (InteractionMode::Editing(id), true) => {
                InteractionMode::Editing(id)
            }
            (InteractionMode::Editing(id), false) | (InteractionMode::Selected(id), false) => {
                InteractionMode::Selected(id)
            }
            (InteractionMode::Idle, _) => return !editing,
        };
        true
    }

    pub fn hovered_node_id(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn set_hovered(&mut self, node_id: Option<NodeId>) {
        self.hovered = node_id;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn is_expanded(&self, node_id: &str) -> bool {
        self.expanded.contains(node_id)
    }

    pub fn expanded(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    pub fn expand(&mut self, node_id: impl Into<NodeId>) {
        self.expanded.insert(node_id.into());
    }

    pub fn collapse(&mut self, node_id: &str) {
        self.expanded.remove(node_id);
    }

    /// Flip a row; returns the new expanded state
    pub fn toggle_expanded(&mut self, node_id: &str) -> bool {
        if self.expanded.remove(node_id) {
            false
        } else {
            self.expanded.insert(node_id.to_string());
            true
        }
    }

    pub fn expand_all(&mut self, node_ids: impl IntoIterator<Item = NodeId>) {
        self.expanded.extend(node_ids);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Forget every id that no longer exists. Returns true if the
    /// selection was dropped.
    pub fn retain_existing(&mut self, existing: &HashSet<NodeId>) -> bool {
        self.expanded.retain(|id| existing.contains(id));

        if self
            .hovered
            .as_ref()
            .is_some_and(|id| !existing.contains(id))
        {
            self.hovered = None;
        }

        let selection_gone = self
            .selected_node_id()
            .is_some_and(|id| !existing.contains(id));
        if selection_gone {
            self.mode = InteractionMode::Idle;
        }

        selection_gone
    }

    /// Back to a fresh session
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
