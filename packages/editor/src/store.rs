//! # Editor Store
//!
//! The single mutation surface for a schema. Owns the current document,
//! the interaction state of the editor, the undo history and a clipboard.
//!
//! ## Flow
//!
//! ```text
//! intent ──▶ validation gate ──▶ pure tree op ──▶ commit ──▶ notify
//!               │ refused                           │
//!               ▼                                   ▼
//!         warn!, Err(_)                     snapshot into history
//! ```
//!
//! A refused intent leaves every piece of state untouched. Selection, hover
//! and expansion are never part of undo history; only the schema is.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uischema::factory::{create_empty_schema, create_node};
use uischema::validation::{self, ValidationIssue};
use uischema::{
    registry, tree, ComponentDefinition, ComponentType, FlatNode, NodeId, Props, Schema,
    SchemaError, SchemaNode, ValidationError, SCHEMA_VERSION,
};

use crate::{EditSession, EditorConfig, EditorError, Mutation, MutationOutcome, UndoStack};

pub type SubscriptionId = usize;

/// Change notification delivered to subscribers
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A new schema revision is current (commit, undo, redo or load)
    SchemaChanged(Schema),

    /// The selected node changed
    SelectionChanged(Option<NodeId>),

    HistoryChanged { can_undo: bool, can_redo: bool },
}

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Owned editor state with a fixed set of commands
pub struct EditorStore {
    config: EditorConfig,
    schema: Schema,

    /// Increments on every schema revision
    version: u64,

    session: EditSession,
    history: UndoStack,
    clipboard: Option<Arc<SchemaNode>>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorStore")
            .field("config", &self.config)
            .field("version", &self.version)
            .field("nodes", &tree::count_nodes(&self.schema.root))
            .field("session", &self.session)
            .field("history", &self.history)
            .field("clipboard", &self.clipboard.as_ref().map(|node| &node.id))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorStore {
    /// Store holding an empty schema with the default configuration
    pub fn new() -> Self {
        Self::with_parts(EditorConfig::default(), create_empty_schema())
    }

    pub fn with_config(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self::with_parts(config, create_empty_schema()))
    }

    /// Store holding an existing (validated) schema
    pub fn from_schema(schema: Schema) -> Result<Self, EditorError> {
        let mut store = Self::new();
        store.load_schema(schema)?;
        Ok(store)
    }

    fn with_parts(config: EditorConfig, schema: Schema) -> Self {
        Self {
            history: UndoStack::with_max_levels(config.history_limit),
            config,
            schema,
            version: 0,
            session: EditSession::new(),
            clipboard: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // ---- structural commands ----

    /// Create a `component_type` node under `parent_id` and select it
    pub fn add_node(
        &mut self,
        parent_id: &str,
        component_type: ComponentType,
        props: Option<Props>,
        index: Option<usize>,
    ) -> Result<NodeId, EditorError> {
        let gate = validation::check_add(
            &self.schema.root,
            parent_id,
            component_type,
            1,
            self.config.max_nodes,
        );
        if let Err(e) = gate {
            return self.refuse("add_node", e);
        }

        let node = create_node(component_type, props);
        let node_id = node.id.clone();
        let root = tree::add_child_node(&self.schema.root, parent_id, node, index);

        if !self.commit(root, format!("Add {component_type}")) {
            return self.refuse("add_node", EditorError::Unchanged("add_node"));
        }

        info!(node_id = %node_id, parent_id, component_type = %component_type, "node added");
        self.reveal(parent_id, &node_id);
        Ok(node_id)
    }

    /// Shallow-merge `props` into a node. Returns false if every value was
    /// already in place.
    pub fn update_node(&mut self, node_id: &str, props: &Props) -> Result<bool, EditorError> {
        if tree::find_node_by_id(&self.schema.root, node_id).is_none() {
            return self.refuse("update_node", ValidationError::NodeNotFound(node_id.to_string()));
        }

        let root = tree::update_node_props(&self.schema.root, node_id, props);
        let changed = self.commit(root, "Update properties".to_string());

        if changed {
            debug!(node_id, keys = props.len(), "props updated");
        }
        Ok(changed)
    }

    /// Delete a node and its subtree. Selection, hover and expansion of the
    /// removed ids are dropped.
    pub fn remove_node(&mut self, node_id: &str) -> Result<(), EditorError> {
        if let Err(e) = validation::check_remove(&self.schema.root, node_id) {
            return self.refuse("remove_node", e);
        }

        let root = tree::remove_node(&self.schema.root, node_id);
        self.commit(root, "Delete node".to_string());
        self.prune_session();

        info!(node_id, "node removed");
        Ok(())
    }

    /// Delete key: removes the selected node unless it is being edited
    pub fn delete_selected(&mut self) -> Result<(), EditorError> {
        if let Some(editing) = self.session.editing_node_id() {
            let error = EditorError::EditingInProgress(editing.to_string());
            return self.refuse("delete_selected", error);
        }

        let Some(selected) = self.session.selected_node_id().map(str::to_string) else {
            return self.refuse("delete_selected", EditorError::NothingSelected);
        };

        self.remove_node(&selected)
    }

    /// Relocate a node (keeping its ids) under `new_parent_id`
    pub fn move_node(
        &mut self,
        node_id: &str,
        new_parent_id: &str,
        index: Option<usize>,
    ) -> Result<(), EditorError> {
        if let Err(e) = validation::check_move(&self.schema.root, node_id, new_parent_id) {
            return self.refuse("move_node", e);
        }

        let root = tree::move_node(&self.schema.root, node_id, new_parent_id, index);
        if !self.commit(root, "Move node".to_string()) {
            return self.refuse("move_node", EditorError::Unchanged("move_node"));
        }

        info!(node_id, new_parent_id, "node moved");
        self.reveal(new_parent_id, node_id);
        Ok(())
    }

    /// Insert a fresh copy of a node right after it and select the copy
    pub fn duplicate_node(&mut self, node_id: &str) -> Result<NodeId, EditorError> {
        let gate = validation::check_duplicate(&self.schema.root, node_id, self.config.max_nodes);
        if let Err(e) = gate {
            return self.refuse("duplicate_node", e);
        }

        let (parent_id, index, copy) = {
            let root = &self.schema.root;
            let parent = tree::find_parent_node(root, node_id);
            let node = tree::find_node_by_id(root, node_id);
            let index = tree::child_index(root, node_id);

            match (parent, node, index) {
                (Some(parent), Some(node), Some(index)) => {
                    (parent.id.clone(), index, tree::clone_node(node))
                }
                _ => {
                    let error = ValidationError::NodeNotFound(node_id.to_string());
                    return self.refuse("duplicate_node", error);
                }
            }
        };

        let copy_id = copy.id.clone();
        let root = tree::add_child_node(&self.schema.root, &parent_id, copy, Some(index + 1));

        if !self.commit(root, "Duplicate node".to_string()) {
            return self.refuse("duplicate_node", EditorError::Unchanged("duplicate_node"));
        }

        info!(node_id, copy_id = %copy_id, "node duplicated");
        self.change_selection(Some(copy_id.clone()));
        Ok(copy_id)
    }

    /// Move a child of `parent_id` from one position to another. Returns
    /// false when the position does not change.
    pub fn reorder_children(
        &mut self,
        parent_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> Result<bool, EditorError> {
        let Some(parent) = tree::find_node_by_id(&self.schema.root, parent_id) else {
            return self.refuse(
                "reorder_children",
                ValidationError::ParentNotFound(parent_id.to_string()),
            );
        };

        let len = parent.children().len();
        let moved_id = parent.children().get(from_index).map(|child| child.id.clone());
        if from_index >= len {
            return self.refuse(
                "reorder_children",
                ValidationError::IndexOutOfRange {
                    index: from_index,
                    len,
                },
            );
        }

        let root = tree::reorder_children(&self.schema.root, parent_id, from_index, to_index);
        if !self.commit(root, "Reorder children".to_string()) {
            return Ok(false);
        }

        self.change_selection(moved_id);
        Ok(true)
    }

    // ---- clipboard ----

    /// Remember a subtree for later pasting
    pub fn copy_node(&mut self, node_id: &str) -> Result<(), EditorError> {
        let Some(node) = tree::find_node_by_id(&self.schema.root, node_id) else {
            return self.refuse("copy_node", ValidationError::NodeNotFound(node_id.to_string()));
        };

        self.clipboard = Some(Arc::clone(node));
        debug!(node_id, "node copied");
        Ok(())
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Insert a fresh copy of the clipboard under `parent_id`
    pub fn paste_node(
        &mut self,
        parent_id: &str,
        index: Option<usize>,
    ) -> Result<NodeId, EditorError> {
        let Some(source) = self.clipboard.clone() else {
            return self.refuse("paste_node", EditorError::ClipboardEmpty);
        };

        let gate = validation::check_add(
            &self.schema.root,
            parent_id,
            source.component_type,
            tree::count_nodes(&source),
            self.config.max_nodes,
        );
        if let Err(e) = gate {
            return self.refuse("paste_node", e);
        }

        let copy = tree::clone_node(&source);
        let copy_id = copy.id.clone();
        let root = tree::add_child_node(&self.schema.root, parent_id, copy, index);

        if !self.commit(root, "Paste".to_string()) {
            return self.refuse("paste_node", EditorError::Unchanged("paste_node"));
        }

        info!(node_id = %copy_id, parent_id, "clipboard pasted");
        self.reveal(parent_id, &copy_id);
        Ok(copy_id)
    }

    // ---- history ----

    /// Group the following commits into one undo step
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch(&self.schema, Some(description.into()));
    }

    /// Close the innermost batch. Returns true if an undo step was recorded.
    pub fn end_batch(&mut self) -> bool {
        let recorded = self.history.end_batch(&self.schema);
        if recorded {
            self.emit_history();
        }
        recorded
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(self.schema.clone()) else {
            debug!("undo: nothing to undo");
            return false;
        };

        self.restore(previous);
        info!(version = self.version, "undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(self.schema.clone()) else {
            debug!("redo: nothing to redo");
            return false;
        };

        self.restore(next);
        info!(version = self.version, "redo");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.emit_history();
    }

    // ---- document ----

    /// Replace the document. History, selection and expansion start over.
    pub fn load_schema(&mut self, schema: Schema) -> Result<(), EditorError> {
        if schema.version != SCHEMA_VERSION {
            return self.refuse("load_schema", SchemaError::UnsupportedVersion(schema.version));
        }

        let issues = validation::validate_schema(&schema);
        if !issues.is_empty() {
            return self.refuse("load_schema", SchemaError::Invalid { issues });
        }

        let count = tree::count_nodes(&schema.root);
        if count > self.config.max_nodes {
            let issues = vec![ValidationIssue::TooManyNodes {
                count,
                max: self.config.max_nodes,
            }];
            return self.refuse("load_schema", SchemaError::Invalid { issues });
        }

        self.replace_document(schema);
        info!(nodes = count, "schema loaded");
        Ok(())
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        let schema = match Schema::from_json(json) {
            Ok(schema) => schema,
            Err(e) => return self.refuse("load_json", e),
        };
        self.load_schema(schema)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(self.schema.to_json_pretty()?)
    }

    /// Start over with an empty document
    pub fn reset(&mut self) {
        self.replace_document(create_empty_schema());
        info!("store reset");
    }

    fn replace_document(&mut self, schema: Schema) {
        let had_selection = self.session.selected_node_id().is_some();

        self.schema = schema;
        self.version += 1;
        self.history.clear();
        self.session.reset();

        self.emit(StoreEvent::SchemaChanged(self.schema.clone()));
        if had_selection {
            self.emit(StoreEvent::SelectionChanged(None));
        }
        self.emit_history();
    }

    // ---- interaction ----

    /// Select a node, or clear the selection with `None`
    pub fn select(&mut self, node_id: Option<&str>) -> Result<(), EditorError> {
        if let Some(id) = node_id {
            if tree::find_node_by_id(&self.schema.root, id).is_none() {
                return self.refuse("select", ValidationError::NodeNotFound(id.to_string()));
            }
        }

        self.change_selection(node_id.map(str::to_string));
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.change_selection(None);
    }

    pub fn set_hovered(&mut self, node_id: Option<&str>) {
        self.session.set_hovered(node_id.map(str::to_string));
    }

    /// Enter or leave inline editing of the selected node
    pub fn set_editing(&mut self, editing: bool) -> Result<(), EditorError> {
        if !self.session.set_editing(editing) {
            return self.refuse("set_editing", EditorError::NothingSelected);
        }
        Ok(())
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.session.set_dragging(dragging);
    }

    pub fn expand(&mut self, node_id: &str) {
        self.session.expand(node_id);
    }

    pub fn collapse(&mut self, node_id: &str) {
        self.session.collapse(node_id);
    }

    pub fn toggle_expanded(&mut self, node_id: &str) -> bool {
        self.session.toggle_expanded(node_id)
    }

    /// Expand every node that can hold children
    pub fn expand_all(&mut self) {
        let containers: Vec<NodeId> = tree::flatten_tree(&self.schema.root)
            .into_iter()
            .filter(|row| !row.node.is_leaf())
            .map(|row| row.node.id.clone())
            .collect();

        self.session.expand_all(containers);
    }

    pub fn collapse_all(&mut self) {
        self.session.collapse_all();
    }

    pub fn is_expanded(&self, node_id: &str) -> bool {
        self.session.is_expanded(node_id)
    }

    // ---- queries ----

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn root(&self) -> &Arc<SchemaNode> {
        &self.schema.root
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn find_node(&self, node_id: &str) -> Option<&Arc<SchemaNode>> {
        tree::find_node_by_id(&self.schema.root, node_id)
    }

    pub fn selected_node(&self) -> Option<&Arc<SchemaNode>> {
        self.session
            .selected_node_id()
            .and_then(|id| self.find_node(id))
    }

    /// Registry entry of the selected node, for the properties panel
    pub fn selected_definition(&self) -> Option<&'static ComponentDefinition> {
        self.selected_node()
            .map(|node| registry::definition(node.component_type))
    }

    pub fn node_count(&self) -> usize {
        tree::count_nodes(&self.schema.root)
    }

    /// Rows of the layer panel: the root and every node under an expanded
    /// ancestor chain
    pub fn visible_layers(&self) -> Vec<FlatNode<'_>> {
        let root_id = self.schema.root.id.as_str();
        let session = &self.session;

        tree::flatten_tree_with(&self.schema.root, |node| {
            node.id == root_id || session.is_expanded(&node.id)
        })
    }

    // ---- notifications ----

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(subscription, _)| *subscription != id);
        self.listeners.len() != before
    }

    // ---- intents ----

    /// Apply a serialized intent from a collaborator
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationOutcome, EditorError> {
        debug!(mutation = %mutation.description(), target = mutation.target_id(), "apply");

        match mutation {
            Mutation::AddNode {
                parent_id,
                component_type,
                props,
                index,
            } => {
                let node_id = self.add_node(&parent_id, component_type, props, index)?;
                Ok(MutationOutcome::changed(Some(node_id)))
            }

            Mutation::UpdateNode { node_id, props } => {
                if self.update_node(&node_id, &props)? {
                    Ok(MutationOutcome::changed(Some(node_id)))
                } else {
                    Ok(MutationOutcome::unchanged())
                }
            }

            Mutation::RemoveNode { node_id } => {
                self.remove_node(&node_id)?;
                Ok(MutationOutcome::changed(None))
            }

            Mutation::MoveNode {
                node_id,
                new_parent_id,
                index,
            } => {
                self.move_node(&node_id, &new_parent_id, index)?;
                Ok(MutationOutcome::changed(Some(node_id)))
            }

            Mutation::DuplicateNode { node_id } => {
                let copy_id = self.duplicate_node(&node_id)?;
                Ok(MutationOutcome::changed(Some(copy_id)))
            }

            Mutation::ReorderChildren {
                parent_id,
                from_index,
                to_index,
            } => {
                if self.reorder_children(&parent_id, from_index, to_index)? {
                    Ok(MutationOutcome::changed(Some(parent_id)))
                } else {
                    Ok(MutationOutcome::unchanged())
                }
            }

            Mutation::PasteNode { parent_id, index } => {
                let copy_id = self.paste_node(&parent_id, index)?;
                Ok(MutationOutcome::changed(Some(copy_id)))
            }
        }
    }

    // ---- internals ----

    /// Make `root` current and snapshot the previous schema. Returns false
    /// (and records nothing) when the tree operation was a no-op.
    fn commit(&mut self, root: Arc<SchemaNode>, description: String) -> bool {
        if Arc::ptr_eq(&root, &self.schema.root) {
            return false;
        }

        let next = Schema {
            root,
            version: self.schema.version.clone(),
        };
        let previous = std::mem::replace(&mut self.schema, next);
        self.history.record(previous, Some(description));
        self.version += 1;

        self.emit(StoreEvent::SchemaChanged(self.schema.clone()));
        self.emit_history();
        true
    }

    /// Swap in a snapshot from history
    fn restore(&mut self, schema: Schema) {
        self.schema = schema;
        self.version += 1;

        self.emit(StoreEvent::SchemaChanged(self.schema.clone()));
        self.prune_session();
        self.emit_history();
    }

    /// Expand the parent (if configured) and select the affected node
    fn reveal(&mut self, parent_id: &str, node_id: &str) {
        if self.config.auto_expand {
            self.session.expand(parent_id);
        }
        self.change_selection(Some(node_id.to_string()));
    }

    fn change_selection(&mut self, node_id: Option<NodeId>) {
        if self.session.select(node_id) {
            let selected = self.session.selected_node_id().map(str::to_string);
            self.emit(StoreEvent::SelectionChanged(selected));
        }
    }

    fn prune_session(&mut self) {
        let existing: HashSet<NodeId> = tree::collect_ids(&self.schema.root).into_iter().collect();

        if self.session.retain_existing(&existing) {
            self.emit(StoreEvent::SelectionChanged(None));
        }
    }

    fn refuse<T>(
        &self,
        action: &'static str,
        error: impl Into<EditorError>,
    ) -> Result<T, EditorError> {
        let error = error.into();
        warn!(action, error = %error, "intent refused");
        Err(error)
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn emit_history(&mut self) {
        let event = StoreEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        };
        self.emit(event);
    }
}
