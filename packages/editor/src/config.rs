//! # Editor Configuration
//!
//! `uischema.config.json`, looked up in a project directory. Every field is
//! optional; a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use uischema::MAX_NODES;

use crate::EditorError;

pub const DEFAULT_CONFIG_NAME: &str = "uischema.config.json";

/// Editor store configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Node budget for the document, at most the hard ceiling
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    /// Number of undo steps kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Expand the parent in the layer tree after adding a child
    #[serde(default = "default_auto_expand")]
    pub auto_expand: bool,
}

fn default_max_nodes() -> usize {
    MAX_NODES
}

fn default_history_limit() -> usize {
    50
}

fn default_auto_expand() -> bool {
    true
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        if self.max_nodes == 0 || self.max_nodes > MAX_NODES {
            return Err(EditorError::Config(format!(
                "maxNodes must be between 1 and {MAX_NODES}, got {}",
                self.max_nodes
            )));
        }

        if self.history_limit == 0 {
            return Err(EditorError::Config("historyLimit must be at least 1".to_string()));
        }

        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            history_limit: default_history_limit(),
            auto_expand: default_auto_expand(),
        }
    }
}
