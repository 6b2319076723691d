//! Projected rows and the result set returned to the client.

use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::catalog::Catalog;
use crate::error::Result;

/// Synthesized row key holding the record label.
pub const LABEL_KEY: &str = "Label";

/// Synthesized row key holding the record id.
pub const ID_KEY: &str = "Id";

/// One projected record: column keys in catalog order, then `Label`, then
/// `Id`. Serializes as a JSON object that keeps this order; absent values
/// serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Row {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Sets a cell. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((key, value)),
        }
    }

    /// Returns the cell value: `None` if the key is missing, `Some(None)`
    /// if the value is absent.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = Option<&str>> {
        self.cells.iter().map(|(_, v)| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The synthesized label.
    pub fn label(&self) -> &str {
        self.get(LABEL_KEY).flatten().unwrap_or_default()
    }

    /// The synthesized id.
    pub fn id(&self) -> &str {
        self.get(ID_KEY).flatten().unwrap_or_default()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Output of one datalist query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    /// Column catalog, shared with the datalist that produced it.
    pub columns: Arc<Catalog>,
    /// The requested page of records.
    pub rows: Vec<Row>,
    /// Previously selected records, returned on the first page only.
    pub selected: Vec<Row>,
}

impl ResultSet {
    /// Creates an empty result set over a catalog.
    pub fn new(columns: Arc<Catalog>) -> Self {
        ResultSet {
            columns,
            rows: Vec::new(),
            selected: Vec::new(),
        }
    }

    /// Serializes to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResultSet", 3)?;
        state.serialize_field("Columns", self.columns.as_ref())?;
        state.serialize_field("Rows", &self.rows)?;
        state.serialize_field("Selected", &self.selected)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Column;
    use serde_json::json;

    fn row() -> Row {
        let mut row = Row::new();
        row.insert("Value", Some("9V".to_string()));
        row.insert("Date", None);
        row.insert(LABEL_KEY, Some("9V".to_string()));
        row.insert(ID_KEY, Some("9I".to_string()));
        row
    }

    #[test]
    fn row_access() {
        let row = row();
        assert_eq!(row.get("Value"), Some(Some("9V")));
        assert_eq!(row.get("Date"), Some(None));
        assert_eq!(row.get("Missing"), None);
        assert_eq!(row.label(), "9V");
        assert_eq!(row.id(), "9I");
        assert_eq!(row.keys().collect::<Vec<_>>(), ["Value", "Date", "Label", "Id"]);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut row = row();
        row.insert("Value", Some("10V".to_string()));
        assert_eq!(row.len(), 4);
        assert_eq!(row.keys().next(), Some("Value"));
        assert_eq!(row.values().next(), Some(Some("10V")));
    }

    #[test]
    fn row_serializes_in_order() {
        let json = serde_json::to_string(&row()).unwrap();
        assert_eq!(json, r#"{"Value":"9V","Date":null,"Label":"9V","Id":"9I"}"#);
    }

    #[test]
    fn result_set_wire_shape() {
        let catalog = Catalog::builder()
            .column(Column::new("Value").header("Value"))
            .build()
            .unwrap();
        let mut data = ResultSet::new(Arc::new(catalog));
        data.rows.push(row());

        let json: serde_json::Value = serde_json::from_str(&data.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "Columns": [{
                    "Key": "Value",
                    "Header": "Value",
                    "Hidden": false,
                    "CssClass": "",
                    "Filterable": true
                }],
                "Rows": [{"Value": "9V", "Date": null, "Label": "9V", "Id": "9I"}],
                "Selected": []
            })
        );
        assert!(data.to_json_pretty().unwrap().contains("\n  \"Rows\""));
    }
}
