//! Datalist - searchable, filterable, paginated result sets over typed
//! record collections.
//!
//! A datalist turns a collection of records plus a client [`FilterRequest`]
//! into a [`ResultSet`] of text rows that a remote selection widget can
//! display. It supports:
//!
//! - Id lookup and exclusion through the record's key field
//! - Free-text search with ranking over the searchable text columns
//! - Equality and membership filters over any named field
//! - Sorting by any field, or keeping an upstream order
//! - Clamped paging, with the applied values echoed in the request
//! - A separate bucket for records the client has already selected
//!
//! # Quick Start
//!
//! ```rust
//! use datalist::{Catalog, Column, Datalist, FieldDef, FieldKind, FieldType, FilterRequest, Record, Value};
//! use std::sync::Arc;
//!
//! struct Task {
//!     id: u32,
//!     name: String,
//!     priority: i32,
//! }
//!
//! impl Record for Task {
//!     fn entity_name() -> &'static str {
//!         "Task"
//!     }
//!
//!     fn fields() -> &'static [FieldDef] {
//!         const FIELDS: &[FieldDef] = &[
//!             FieldDef::new("Id", FieldKind::U32),
//!             FieldDef::new("Name", FieldKind::Text),
//!             FieldDef::new("Priority", FieldKind::I32),
//!         ];
//!         FIELDS
//!     }
//!
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "Id" => self.id.to_value(),
//!             "Name" => self.name.to_value(),
//!             "Priority" => self.priority.to_value(),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let catalog = Catalog::builder()
//!     .column(Column::new("Name").header("Task"))
//!     .column(Column::new("Priority").filterable(false))
//!     .build()?;
//! let datalist = Datalist::<Task>::new(Arc::new(catalog));
//!
//! let tasks = vec![
//!     Task { id: 1, name: "Write docs".into(), priority: 3 },
//!     Task { id: 2, name: "Fix bug".into(), priority: 5 },
//!     Task { id: 3, name: "Fix build".into(), priority: 1 },
//! ];
//!
//! let mut request = datalist.bind_request([("search", "Fix"), ("sort", "Priority")])?;
//! let data = datalist.get_data(&tasks, &mut request)?;
//!
//! assert_eq!(data.rows.len(), 2);
//! assert_eq!(data.rows[0].label(), "Fix build");
//! assert_eq!(data.rows[0].get("Priority"), Some(Some("1")));
//! # Ok::<(), datalist::DatalistError>(())
//! ```
//!
//! # Wire Format
//!
//! A [`ResultSet`] serializes as:
//!
//! ```text
//! {
//!   "Columns":  [{"Key", "Header", "Hidden", "CssClass", "Filterable"}],
//!   "Rows":     [{...column keys, "Label", "Id"}],
//!   "Selected": [{...column keys, "Label", "Id"}]
//! }
//! ```
//!
//! # Field Types
//!
//! | Kind | Key | Search | Format spec |
//! |------|-----|--------|-------------|
//! | integers, floats | yes | no | `.N` |
//! | decimal | yes | no | `.N` |
//! | text | yes | yes | |
//! | uuid | yes | no | |
//! | bool | no | no | |
//! | date, datetime | no | no | strftime |

extern crate self as datalist;

mod cancel;
mod catalog;
mod config;
mod data;
mod error;
mod filter;
mod format;
mod key;
mod ordering;
mod page;
mod pipeline;
mod project;
mod record;
mod request;
mod search;
mod source;
mod value;

// Re-export public API
pub use cancel::{Cancellation, NeverCancel};
pub use catalog::{Catalog, CatalogBuilder, Column};
pub use config::DatalistConfig;
pub use data::{ResultSet, Row, ID_KEY, LABEL_KEY};
pub use error::{DatalistError, ErrorClass, Result};
pub use filter::{AdditionalFilters, FieldFilter, FilterValue};
pub use format::Template;
pub use key::{KeyField, KeySet, ID_FIELD};
pub use ordering::{compare_values, OrderBy, SortMode, SortOrder};
pub use page::{Page, DEFAULT_ROWS, MAX_ROWS, MIN_ROWS};
pub use pipeline::{Datalist, Extractor, Filtered, Stage};
pub use project::{default_id, default_label};
pub use record::{FieldDef, Record};
pub use request::FilterRequest;
pub use search::{score_field, similarity, ScoredRecord, TextSearch, RETENTION_THRESHOLD};
pub use source::{Ordered, RecordSource};
pub use value::{FieldKind, FieldType, Number, OwnedValue, Value, DATE_FORMAT, DATE_TIME_FORMAT};

// Record derive macro (requires `features = ["derive"]`)
#[cfg(feature = "derive")]
pub use datalist_macros::Record;
