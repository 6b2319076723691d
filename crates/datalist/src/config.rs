//! Per-entity datalist configuration.
//!
//! Configuration describes how a client widget talks to one datalist: its
//! endpoint, presentation options, the additional filter inputs it
//! forwards, and request defaults. It can be written in YAML or JSON:
//!
//! ```yaml
//! url: /datalist/products
//! title: Products
//! multi: true
//! additionalFilters: [CategoryId]
//! rows: 25
//! sort: Name
//! order: Desc
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DatalistError, Result};
use crate::ordering::SortOrder;
use crate::page::DEFAULT_ROWS;

/// Configuration of one datalist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatalistConfig {
    /// Endpoint the client requests data from.
    pub url: Option<String>,
    /// Name of the form input bound to the selection.
    pub name: Option<String>,
    /// Dialog title.
    pub title: Option<String>,
    /// Selector of the dialog element.
    pub dialog: Option<String>,
    /// Whether more than one record can be selected.
    pub multi: bool,
    pub read_only: bool,
    pub placeholder: Option<String>,
    /// Names of query parameters bound as additional filters.
    pub additional_filters: Vec<String>,
    /// Page size used when the request does not specify one.
    pub rows: i32,
    /// Sort key used when the request does not send one.
    pub sort: Option<String>,
    /// Sort direction used when the request does not send one.
    pub order: SortOrder,
}

impl Default for DatalistConfig {
    fn default() -> Self {
        DatalistConfig {
            url: None,
            name: None,
            title: None,
            dialog: None,
            multi: false,
            read_only: false,
            placeholder: None,
            additional_filters: Vec::new(),
            rows: DEFAULT_ROWS,
            sort: None,
            order: SortOrder::Asc,
        }
    }
}

impl DatalistConfig {
    /// Parses configuration from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads configuration from a file.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DatalistError::Load {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Adds an additional filter name.
    pub fn additional_filter(mut self, name: impl Into<String>) -> Self {
        self.additional_filters.push(name.into());
        self
    }

    /// Sets the default page size.
    pub fn rows(mut self, rows: i32) -> Self {
        self.rows = rows;
        self
    }

    /// Sets the default sort.
    pub fn sort(mut self, sort: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(sort.into());
        self.order = order;
        self
    }
}
