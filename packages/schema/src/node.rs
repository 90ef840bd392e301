//! # Schema Document
//!
//! A schema is a single root [`SchemaNode`] plus a format tag. Children are
//! held behind `Arc` so a new revision of the tree can share every subtree
//! it did not touch with the previous one.
//!
//! ## Serialized shape
//!
//! ```json
//! {
//!   "root": {
//!     "id": "6f1c...",
//!     "type": "Box",
//!     "props": { "sx": { "minHeight": "100%" } },
//!     "children": [
//!       { "id": "0a9e...", "type": "Typography", "props": { "text": "Hello" } }
//!     ]
//!   },
//!   "version": "1.0"
//! }
//! ```
//!
//! Leaf kinds never carry a `children` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::component::ComponentType;
use crate::error::SchemaError;
use crate::registry;
use crate::validation;

/// Current serialized format tag
pub const SCHEMA_VERSION: &str = "1.0";

/// Node identifier, unique across the whole document
pub type NodeId = String;

/// Component-specific configuration
pub type Props = serde_json::Map<String, Value>;

/// One element of the UI tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    pub id: NodeId,

    #[serde(rename = "type")]
    pub component_type: ComponentType,

    #[serde(default)]
    pub props: Props,

    /// `None` exactly when the component's child policy is `none`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<SchemaNode>>>,
}

impl SchemaNode {
    /// Child slice, empty for leaves
    pub fn children(&self) -> &[Arc<SchemaNode>] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Copy of this node without its children, used when rebuilding a spine
    pub(crate) fn with_children(&self, children: Option<Vec<Arc<SchemaNode>>>) -> SchemaNode {
        SchemaNode {
            id: self.id.clone(),
            component_type: self.component_type,
            props: self.props.clone(),
            children,
        }
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Prop value, falling back to the registry default for this kind
    pub fn resolved_prop(&self, name: &str) -> Option<&Value> {
        self.props
            .get(name)
            .or_else(|| registry::definition(self.component_type).default_props.get(name))
    }
}

/// The document root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub root: Arc<SchemaNode>,
    pub version: String,
}

impl Schema {
    pub fn new(root: Arc<SchemaNode>) -> Self {
        Self {
            root,
            version: SCHEMA_VERSION.to_string(),
        }
    }

    /// Parse and validate a serialized schema
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;

        if schema.version != SCHEMA_VERSION {
            return Err(SchemaError::UnsupportedVersion(schema.version));
        }

        let issues = validation::validate_schema(&schema);
        if !issues.is_empty() {
            return Err(SchemaError::Invalid { issues });
        }

        Ok(schema)
    }

    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Whether two schemas share the same root allocation
    pub fn same_root(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}
