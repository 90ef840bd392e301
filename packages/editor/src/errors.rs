//! Error types for the editor

use thiserror::Error;
use uischema::{SchemaError, ValidationError};

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Node {0} is being edited")]
    EditingInProgress(String),

    #[error("Nothing is selected")]
    NothingSelected,

    #[error("Clipboard is empty")]
    ClipboardEmpty,

    #[error("{0} had no effect")]
    Unchanged(&'static str),
}
