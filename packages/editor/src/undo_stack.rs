//! # Undo/Redo Stack
//!
//! Snapshot history of the schema.
//!
//! ## Design
//!
//! - Each committed change records the schema as it was *before* the change
//! - A snapshot is just a root `Arc`; unchanged subtrees are shared, so
//!   storing one costs no more than the rebuilt spine
//! - Undo swaps the current schema for the newest snapshot and keeps the
//!   current one on the redo stack; redo does the reverse
//! - New changes clear the redo stack
//! - Batches group several changes into a single undo step
//! - The oldest snapshot is dropped once `max_levels` is exceeded
//!
//! ## Example
//!
//! ```rust
//! use uischema::factory::create_empty_schema;
//! use uischema_editor::UndoStack;
//!
//! let before = create_empty_schema();
//! let after = create_empty_schema();
//!
//! let mut stack = UndoStack::new();
//! stack.record(before.clone(), Some("Replace document".to_string()));
//!
//! let restored = stack.undo(after).unwrap();
//! assert!(restored.same_root(&before));
//! assert!(stack.can_redo());
//! ```

use uischema::Schema;

/// One undo step: the schema before a change and a label for it
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub schema: Schema,
    pub description: Option<String>,
}

#[derive(Debug)]
struct PendingBatch {
    before: Schema,
    description: Option<String>,
    depth: usize,

    /// A change was committed since the batch opened
    changed: bool,
}

/// Undo/redo stack of schema snapshots
#[derive(Debug)]
pub struct UndoStack {
    /// Snapshots to return to (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Snapshots that were undone (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<PendingBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (50)
    pub fn new() -> Self {
        Self::with_max_levels(50)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record the schema as it was before a committed change.
    ///
    /// Inside a batch the snapshot taken at `begin_batch` stands for the
    /// whole group, so this only clears the redo stack.
    pub fn record(&mut self, previous: Schema, description: Option<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.changed = true;
            self.redo_stack.clear();
            return;
        }

        self.push_entry(HistoryEntry {
            schema: previous,
            description,
        });
    }

    /// Start grouping changes. Nested calls join the outer batch.
    pub fn begin_batch(&mut self, current: &Schema, description: Option<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.depth += 1;
            return;
        }

        self.current_batch = Some(PendingBatch {
            before: current.clone(),
            description,
            depth: 1,
            changed: false,
        });
    }

    /// Close the current batch level. Returns true if a step was recorded.
    pub fn end_batch(&mut self, current: &Schema) -> bool {
        let Some(batch) = &mut self.current_batch else {
            return false;
        };

        batch.depth -= 1;
        if batch.depth > 0 {
            return false;
        }

        self.flush_batch(current)
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Close every open batch level at once
    fn flush_batch(&mut self, current: &Schema) -> bool {
        match self.current_batch.take() {
            Some(batch) if !batch.before.same_root(current) => {
                self.push_entry(HistoryEntry {
                    schema: batch.before,
                    description: batch.description,
                });
                true
            }
            _ => false,
        }
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New change invalidates the undone future
        self.redo_stack.clear();
    }

    /// Step back. Returns the schema to restore, or `None` if there is no
    /// history. An open batch is closed first.
    pub fn undo(&mut self, current: Schema) -> Option<Schema> {
        self.flush_batch(&current);

        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(HistoryEntry {
            schema: current,
            description: entry.description.clone(),
        });

        Some(entry.schema)
    }

    /// Step forward again after an undo. An open batch is closed first.
    pub fn redo(&mut self, current: Schema) -> Option<Schema> {
        self.flush_batch(&current);

        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(HistoryEntry {
            schema: current,
            description: entry.description.clone(),
        });

        Some(entry.schema)
    }

    /// True if `undo` would restore something, counting changes made
    /// inside an open batch
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.current_batch.as_ref().is_some_and(|b| b.changed)
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
