//! Configuration loading and management

use crate::core::flags::Flags;
use crate::core::policy::InvalidPolicy;
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Default ceiling on input nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Engine configuration
///
/// Every field has a default, so an empty YAML document is a valid config.
///
/// ```yaml
/// invalid_policy: verbose
/// max_depth: 16
/// default_flags: [expect-json]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Marker selection for rejected values
    #[serde(default)]
    pub invalid_policy: InvalidPolicy,

    /// Deepest nesting the recursion will follow
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Flags added to every call
    #[serde(default)]
    pub default_flags: Flags,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            invalid_policy: InvalidPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            default_flags: Flags::empty(),
        }
    }
}

impl SanitizerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_depth > 0, "max_depth must be greater than zero");
        Ok(())
    }
}
