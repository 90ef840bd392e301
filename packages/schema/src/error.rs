//! Error types for the schema engine

use thiserror::Error;

use crate::component::ComponentType;
use crate::validation::ValidationIssue;

/// Failure to load a schema document
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported schema version: {0}")]
    UnsupportedVersion(String),

    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),

    #[error("Invalid schema: {} issue(s)", .issues.len())]
    Invalid { issues: Vec<ValidationIssue> },
}

/// Why a structural change was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("{child} cannot be placed inside {parent}")]
    PolicyViolation {
        child: ComponentType,
        parent: ComponentType,
    },

    #[error("{parent} accepts a single child and already has one")]
    ChildLimitReached { parent: ComponentType },

    #[error("Node limit reached: {current} + {incoming} would exceed {max}")]
    CapacityExceeded {
        current: usize,
        incoming: usize,
        max: usize,
    },

    #[error("The root node cannot be {0}")]
    RootProtected(&'static str),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },
}
