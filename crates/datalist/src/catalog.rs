//! Column catalog: which record fields are displayed, searched and sorted.
//!
//! A [`Catalog`] is built once per entity configuration and is immutable
//! afterwards. Share it between requests as `Arc<Catalog>`.

use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::{DatalistError, Result};
use crate::format::Template;
use crate::record::Record;

/// Describes one displayable column.
///
/// # Example
///
/// ```
/// use datalist::Column;
///
/// let column = Column::new("Count")
///     .header("Value")
///     .filterable(false)
///     .position(8);
///
/// assert_eq!(column.key, "Count");
/// assert!(!column.filterable);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Record field rendered in this column; also the row key.
    pub key: String,
    /// Header text shown by the client.
    pub header: String,
    /// Hidden columns are neither displayed nor searched.
    pub hidden: bool,
    /// CSS class the client applies to the column.
    pub css_class: String,
    /// Whether text search looks at this column.
    pub filterable: bool,
    /// Format template applied to the raw value.
    pub format: Option<String>,
    /// Catalog ordering; ties keep declaration order.
    pub position: i32,
}

impl Column {
    /// Creates a visible, filterable column for the given field.
    pub fn new(key: impl Into<String>) -> Self {
        Column {
            key: key.into(),
            header: String::new(),
            hidden: false,
            css_class: String::new(),
            filterable: true,
            format: None,
            position: 0,
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn css_class(mut self, css_class: impl Into<String>) -> Self {
        self.css_class = css_class.into();
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn format(mut self, template: impl Into<String>) -> Self {
        self.format = Some(template.into());
        self
    }

    pub fn position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Column", 5)?;
        state.serialize_field("Key", &self.key)?;
        state.serialize_field("Header", &self.header)?;
        state.serialize_field("Hidden", &self.hidden)?;
        state.serialize_field("CssClass", &self.css_class)?;
        state.serialize_field("Filterable", &self.filterable)?;
        state.end()
    }
}

/// A column paired with its parsed format template.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CatalogEntry {
    pub(crate) column: Column,
    pub(crate) template: Option<Template>,
}

/// Immutable, ordered set of columns for one entity configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Starts building a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Builds the catalog declared by a record type.
    pub fn of<T: Record>() -> Result<Catalog> {
        T::columns()
            .into_iter()
            .fold(Catalog::builder(), CatalogBuilder::column)
            .build()
    }

    /// Builds the catalog and wraps it for sharing across requests.
    pub fn shared<T: Record>() -> Result<Arc<Catalog>> {
        Catalog::of::<T>().map(Arc::new)
    }

    /// Iterates over the columns in catalog order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.entries.iter().map(|entry| &entry.column)
    }

    /// Finds a column by key.
    pub fn get(&self, key: &str) -> Option<&Column> {
        self.columns().find(|column| column.key == key)
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no columns.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key of the first visible column, used for default labels.
    pub fn label_key(&self) -> Option<&str> {
        self.columns()
            .find(|column| !column.hidden)
            .map(|column| column.key.as_str())
    }

    /// Columns that take part in text search.
    pub fn searchable(&self) -> impl Iterator<Item = &Column> {
        self.columns()
            .filter(|column| column.filterable && !column.hidden)
    }

    pub(crate) fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.columns())
    }
}

/// Builder for [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    columns: Vec<Column>,
}

impl CatalogBuilder {
    /// Appends a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Orders the columns by position and validates format templates.
    pub fn build(mut self) -> Result<Catalog> {
        self.columns.sort_by_key(|column| column.position);

        let entries = self
            .columns
            .into_iter()
            .map(|column| {
                let template = match &column.format {
                    Some(source) => Some(Template::parse(source).map_err(|reason| {
                        DatalistError::InvalidFormat {
                            column: column.key.clone(),
                            template: source.clone(),
                            reason,
                        }
                    })?),
                    None => None,
                };
                Ok(CatalogEntry { column, template })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Catalog { entries })
    }
}
