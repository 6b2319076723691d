//! The filter request sent by the client.

use serde::{Deserialize, Serialize};

use crate::config::DatalistConfig;
use crate::error::{DatalistError, Result};
use crate::filter::{AdditionalFilters, FilterValue};
use crate::ordering::SortOrder;
use crate::page::DEFAULT_ROWS;
use crate::value::OwnedValue;

/// One datalist query.
///
/// The pipeline clamps `offset` and `rows` in place, so after a call they
/// hold the values that were actually applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterRequest {
    /// Return exactly these records; every other filter is ignored.
    pub ids: Vec<String>,
    /// Restrict the results to these records.
    pub check_ids: Vec<String>,
    /// Records already chosen by the client. They are excluded from the
    /// rows and returned separately on the first page.
    pub selected: Vec<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: SortOrder,
    pub rows: i32,
    pub offset: i32,
    pub additional_filters: AdditionalFilters,
}

impl Default for FilterRequest {
    fn default() -> Self {
        FilterRequest {
            ids: Vec::new(),
            check_ids: Vec::new(),
            selected: Vec::new(),
            search: None,
            sort: None,
            order: SortOrder::Asc,
            rows: DEFAULT_ROWS,
            offset: 0,
            additional_filters: AdditionalFilters::new(),
        }
    }
}

impl FilterRequest {
    /// Creates a request with defaults taken from a configuration.
    pub fn with_defaults(config: &DatalistConfig) -> Self {
        FilterRequest {
            sort: config.sort.clone(),
            order: config.order,
            rows: config.rows,
            ..FilterRequest::default()
        }
    }

    /// Binds decoded query-string pairs.
    ///
    /// `ids`, `checkIds` and `selected` may repeat. `sort`, `order`,
    /// `offset` and `rows` override the configuration defaults when sent;
    /// a blank `order` means ascending and a blank `offset` or `rows`
    /// keeps the default. Each of the configuration's additional filter
    /// names becomes one entry: absent when not sent or blank, a scalar
    /// when sent once, a list when repeated. Other parameters are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I, config: &DatalistConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = FilterRequest::with_defaults(config);
        let mut additional: Vec<(String, Vec<OwnedValue>)> = config
            .additional_filters
            .iter()
            .map(|name| (name.clone(), Vec::new()))
            .collect();

        for (name, value) in pairs {
            let (name, value) = (name.as_ref(), value.as_ref());
            match name {
                "ids" => request.ids.push(value.to_string()),
                "checkIds" => request.check_ids.push(value.to_string()),
                "selected" => request.selected.push(value.to_string()),
                "search" => request.search = Some(value.to_string()),
                "sort" => request.sort = Some(value.to_string()),
                "order" => request.order = value.parse()?,
                "offset" => request.offset = parse_int(name, value, 0)?,
                "rows" => request.rows = parse_int(name, value, config.rows)?,
                _ => {
                    if let Some((_, values)) = additional.iter_mut().find(|(n, _)| n == name) {
                        if !value.trim().is_empty() {
                            values.push(OwnedValue::from(value));
                        }
                    }
                }
            }
        }

        for (name, mut values) in additional {
            let value = match values.len() {
                0 => None,
                1 => values.pop().map(FilterValue::Scalar),
                _ => Some(FilterValue::List(values)),
            };
            request.additional_filters.insert(name, value);
        }

        Ok(request)
    }

    /// Returns the search text if it is non-empty.
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

fn parse_int(name: &str, value: &str, default: i32) -> Result<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse()
        .map_err(|_| DatalistError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        })
}
