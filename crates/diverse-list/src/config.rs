//! Controller configuration.
//!
//! [`ControllerConfig`] can be built in code with the `with_*` setters or
//! loaded from TOML. Missing keys take their defaults:
//!
//! ```
//! use diverse_list::config::ControllerConfig;
//! use diverse_list::model::SelectionMode;
//!
//! let config = ControllerConfig::from_toml_str(r#"
//!     selection_mode = "single"
//!     select_on_click = true
//! "#).unwrap();
//!
//! assert_eq!(config.selection_mode, SelectionMode::SingleSelection);
//! assert!(config.select_on_click);
//! assert!(!config.strict_types);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{SelectionMode, UpdatePolicy};

/// Configuration for a list controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Initial selection mode.
    pub selection_mode: SelectionMode,
    /// Toggle the selection of a selectable item when it is clicked.
    pub select_on_click: bool,
    /// Reject items whose type tag was never registered.
    pub strict_types: bool,
    /// How item changes are reported to the view.
    pub update_policy: UpdatePolicy,
}

impl ControllerConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Config`](crate::error::ListError::Config) if the
    /// input is not valid TOML or names an unknown value.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Serializes the configuration to TOML.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Set the initial selection mode.
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Set whether clicks toggle selection.
    pub fn with_select_on_click(mut self, enabled: bool) -> Self {
        self.select_on_click = enabled;
        self
    }

    /// Set whether unregistered type tags are rejected.
    pub fn with_strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }

    /// Set the update policy.
    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }
}
