//! # UI Schema Editor
//!
//! Stateful editing engine on top of the `uischema` document model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ collaborators: renderer, layer panel,       │
//! │ properties panel, keyboard handler          │
//! └─────────────────────────────────────────────┘
//!                     ↓ Mutation / commands
//! ┌─────────────────────────────────────────────┐
//! │ store: EditorStore                          │
//! │  - Validate, then apply pure tree ops       │
//! │  - Snapshot history (undo/redo, batches)    │
//! │  - Selection, hover, expansion, clipboard   │
//! │  - Notify subscribers                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ uischema: registry, factory, tree ops       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Single mutation surface**: only the store replaces the schema
//! 2. **Fail safe**: a refused intent returns `Err` and changes nothing
//! 3. **Cheap snapshots**: history entries share unchanged subtrees
//! 4. **UI state is not history**: undo restores the schema only
//!
//! ## Usage
//!
//! ```rust
//! use uischema::ComponentType;
//! use uischema_editor::{EditorStore, Mutation};
//!
//! let mut store = EditorStore::new();
//! let root_id = store.root().id.clone();
//!
//! let outcome = store
//!     .apply(Mutation::AddNode {
//!         parent_id: root_id,
//!         component_type: ComponentType::Button,
//!         props: None,
//!         index: None,
//!     })
//!     .unwrap();
//!
//! assert!(outcome.changed);
//! assert_eq!(store.node_count(), 2);
//!
//! store.undo();
//! assert_eq!(store.node_count(), 1);
//! ```

mod config;
mod errors;
mod mutations;
mod session;
mod store;
mod undo_stack;

pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationOutcome};
pub use session::{EditSession, InteractionMode};
pub use store::{EditorStore, StoreEvent, SubscriptionId};
pub use undo_stack::{HistoryEntry, UndoStack};
