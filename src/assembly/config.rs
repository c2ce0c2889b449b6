//! Per-part contact margins.
//!
//! Solids that are meant to touch exactly are pushed into each other (union)
//! or apart (difference) by these margins, since the boolean engine refuses
//! coincident geometry. Margins live here rather than at each call site.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::operations::boolean::BooleanOp;

use super::step::BuildContext;

/// Margins used when a tool is designed to touch the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactMargins {
    /// How far a union tool is pushed into the target, in meters (default: 0.0002)
    #[serde(default = "default_margin")]
    pub union_overlap: f64,
    /// How far a difference tool is pulled past the target surface, in meters (default: 0.0002)
    #[serde(default = "default_margin")]
    pub difference_clearance: f64,
}

impl Default for ContactMargins {
    fn default() -> Self {
        Self {
            union_overlap: default_margin(),
            difference_clearance: default_margin(),
        }
    }
}

impl ContactMargins {
    /// The margin that applies to `op`.
    ///
    /// Intersections use the union overlap: the tool has to reach into the
    /// target for there to be anything left.
    #[must_use]
    pub fn margin(&self, op: BooleanOp) -> f64 {
        match op {
            BooleanOp::Union | BooleanOp::Intersection => self.union_overlap,
            BooleanOp::Difference => self.difference_clearance,
        }
    }

    /// Checks that both margins are finite and not negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMargin`] naming `owner` and the field.
    pub fn validate(&self, owner: &str) -> std::result::Result<(), ConfigError> {
        for (field, value) in [
            ("union_overlap", self.union_overlap),
            ("difference_clearance", self.difference_clearance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidMargin {
                    owner: owner.to_owned(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Assembly-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Margins for parts without their own entry
    #[serde(default)]
    pub defaults: ContactMargins,
    /// Per-part overrides, keyed by part name
    #[serde(default)]
    pub parts: BTreeMap<String, ContactMargins>,
    /// Treat a fan-capped repair as a step failure (default: true)
    #[serde(default = "default_true")]
    pub strict_repair: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            defaults: ContactMargins::default(),
            parts: BTreeMap::new(),
            strict_repair: true,
        }
    }
}

impl AssemblyConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid and
    /// [`ConfigError::InvalidMargin`] for a negative or non-finite margin.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.defaults.validate("defaults")?;
        for (part, margins) in &config.parts {
            margins.validate(part)?;
        }
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Margins for the named part.
    #[must_use]
    pub fn margins_for(&self, part: &str) -> ContactMargins {
        self.parts.get(part).copied().unwrap_or(self.defaults)
    }

    /// Build settings for the named part.
    #[must_use]
    pub fn context_for(&self, part: &str) -> BuildContext {
        BuildContext {
            margins: self.margins_for(part),
            strict_repair: self.strict_repair,
        }
    }
}

fn default_margin() -> f64 {
    0.0002
}

fn default_true() -> bool {
    true
}
