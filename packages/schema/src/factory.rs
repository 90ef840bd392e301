//! Node factory: typed nodes seeded with registry defaults.

use serde_json::json;
use uuid::Uuid;

use crate::component::ComponentType;
use crate::node::{NodeId, Props, Schema, SchemaNode};
use crate::registry;

/// Fresh, collision-free node identifier
pub fn generate_id() -> NodeId {
    Uuid::new_v4().to_string()
}

/// Create a node of `component_type`.
///
/// Caller props are merged over the registry defaults (caller wins). Kinds
/// that accept children start with an empty child list; leaves get none.
pub fn create_node(component_type: ComponentType, props: Option<Props>) -> SchemaNode {
    let definition = registry::definition(component_type);

    let mut merged = definition.default_props.clone();
    if let Some(props) = props {
        merged.extend(props);
    }

    SchemaNode {
        id: generate_id(),
        component_type,
        props: merged,
        children: definition.child_policy.allows_children().then(Vec::new),
    }
}

/// A document holding only a full-height root `Box`
pub fn create_empty_schema() -> Schema {
    let mut props = Props::new();
    props.insert("sx".to_string(), json!({ "minHeight": "100%" }));

    Schema::new(create_node(ComponentType::Box, Some(props)).into())
}
