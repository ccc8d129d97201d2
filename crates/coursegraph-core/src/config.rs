//! Graph limits configuration
//!
//! Defaults reproduce the platform rules: ten levels (depth 0..=9) and item
//! names up to 255 characters. A deployment may load overrides from TOML:
//!
//! ```
//! use coursegraph_core::config::GraphConfig;
//!
//! let config = GraphConfig::from_toml_str("max_depth = 4").unwrap();
//! assert_eq!(config.max_depth, 4);
//! assert_eq!(config.max_name_len, 255);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CourseGraphError, Result};

/// Deepest allowed item depth (root items have depth 0)
pub const DEFAULT_MAX_DEPTH: u32 = 9;

pub const DEFAULT_MAX_NAME_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Maximum depth an item may have
    pub max_depth: u32,
    /// Maximum item name length, in characters
    pub max_name_len: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl GraphConfig {
    /// Parse a TOML document; absent keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the document does not parse, names an
    /// unknown key, or sets `max_name_len` to zero.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: GraphConfig =
            toml::from_str(source).map_err(|e| CourseGraphError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read, or for any reason
    /// [`GraphConfig::from_toml_str`] rejects its contents.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| CourseGraphError::InvalidConfig {
                reason: format!("{}: {}", path.display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` if `max_name_len` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_name_len == 0 {
            return Err(CourseGraphError::InvalidConfig {
                reason: "max_name_len must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Check an item name against the configured limits
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` for blank names or names over `max_name_len`.
    pub fn check_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(CourseGraphError::InvalidName {
                reason: "Name cannot be empty or whitespace-only".to_string(),
            });
        }
        let len = name.chars().count();
        if len > self.max_name_len {
            return Err(CourseGraphError::InvalidName {
                reason: format!("Name is {} characters, limit is {}", len, self.max_name_len),
            });
        }
        Ok(())
    }
}
