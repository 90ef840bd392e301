//! # UI Schema
//!
//! Tree-structured document model behind the WYSIWYG layout builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ registry: per-type metadata + child policy  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ factory: typed nodes with default props     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ validation: policy, cardinality, capacity,  │
//! │             cycle checks                    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ tree: pure operations over Arc'd nodes      │
//! │  - find / clone / add / remove / move       │
//! │  - only the changed spine is rebuilt        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Strict tree**: every non-root node has exactly one parent
//! 2. **Immutable snapshots**: operations return a new root and never touch
//!    the input; unchanged subtrees are shared by `Arc`
//! 3. **Fail safe**: a refused or unresolvable operation returns the input
//!    root itself, so `Arc::ptr_eq` tells the caller nothing happened
//! 4. **Bounded**: a schema never holds more than [`MAX_NODES`] nodes
//!
//! ## Usage
//!
//! ```rust
//! use uischema::{factory, tree, ComponentType};
//!
//! let schema = factory::create_empty_schema();
//! let text = factory::create_node(ComponentType::Typography, None);
//! let root = tree::add_child_node(&schema.root, &schema.root.id, text, None);
//!
//! assert_eq!(tree::count_nodes(&root), 2);
//! ```

pub mod component;
pub mod error;
pub mod factory;
pub mod node;
pub mod registry;
pub mod tree;
pub mod validation;

pub use component::{Category, ChildPolicy, ComponentType};
pub use error::{SchemaError, ValidationError};
pub use node::{NodeId, Props, Schema, SchemaNode, SCHEMA_VERSION};
pub use registry::{can_be_child_of, ComponentDefinition, ControlKind, PropDefinition};
pub use tree::FlatNode;
pub use validation::{ValidationIssue, MAX_NODES};
