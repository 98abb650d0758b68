//! Store configuration.
//!
//! Configuration is plain data with serde defaults, so a host can embed it
//! in its own settings file or build it in code:
//!
//! ```rust
//! use trellis_core::config::{FilterMode, StoreConfig};
//!
//! let config = StoreConfig::from_json(r#"{ "filter_mode": "per_field" }"#).unwrap();
//! assert_eq!(config.filter_mode, FilterMode::PerField);
//! assert_eq!(StoreConfig::from_json("{}").unwrap(), StoreConfig::default());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How successive `filter_data` calls on different fields combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Every field ever filtered is checked against the results list of the
    /// most recent call. This is the behaviour existing table views rely on.
    #[default]
    SharedResults,

    /// Each field is checked against the results list it was last filtered
    /// with.
    PerField,
}

/// Options for a [`TableStore`](crate::table::TableStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub filter_mode: FilterMode,
}

impl StoreConfig {
    /// Parse configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style setter for the filter mode.
    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }
}
