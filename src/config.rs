//! YAML configuration for resources and logging.
//!
//! Every field has a default, so an empty document is valid:
//!
//! ```yaml
//! logging:
//!   level: debug
//!   format: pretty
//! resources:
//!   create_response: minimal   # or `json`
//!   merge_path_params: true
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::logging::LogConfig;

/// Response shape of the `create` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreateResponse {
    /// `200`, JSON body of the created instance, `Location` header
    #[default]
    Json,
    /// `201`, empty body, `Location` header only
    Minimal,
}

/// Behaviour shared by every action of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub create_response: CreateResponse,
    /// Merge URL-derived attributes (e.g. `forum_id` from `/forums/3/threads`) into the
    /// create body.
    pub merge_path_params: bool,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            create_response: CreateResponse::Json,
            merge_path_params: true,
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RestConfig {
    pub logging: LogConfig,
    pub resources: ResourceConfig,
}

impl RestConfig {
    /// Parse a YAML document. Blank input yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse configuration")
    }

    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}
