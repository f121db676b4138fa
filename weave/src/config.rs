//! Library-wide defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Defaults shared by data providers and widgets.
///
/// Every field has a default, so a JSON document only needs to name the
/// values it changes:
///
/// ```
/// let config = weave::config::WeaveConfig::from_json(r#"{ "page_size": 20 }"#).unwrap();
/// assert_eq!(config.page_size, 20);
/// assert!(config.collapse_on_select);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    /// Items per page for new data providers.
    pub page_size: usize,

    /// Choices offered by the pagination page-size menu.
    pub page_size_options: Vec<usize>,

    /// Whether data providers allow more than one selected item.
    pub multi_select: bool,

    /// Whether single selects and dropdowns built with `with_config` close
    /// after an item is chosen.
    pub collapse_on_select: bool,
}

impl Default for WeaveConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![10, 20, 50, 100],
            multi_select: true,
            collapse_on_select: true,
        }
    }
}

impl WeaveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants `from_json` enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.page_size_options.is_empty() {
            return Err(ConfigError::NoPageSizeOptions);
        }
        Ok(())
    }

    /// Set the page size.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the page-size menu choices.
    pub fn page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    /// Restrict providers to a single selected item.
    pub fn single_select(mut self) -> Self {
        self.multi_select = false;
        self
    }

    /// Keep menus open after an item is chosen.
    pub fn keep_open_on_select(mut self) -> Self {
        self.collapse_on_select = false;
        self
    }
}
