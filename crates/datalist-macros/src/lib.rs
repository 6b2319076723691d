//! Proc macros for datalist.
//!
//! # Available Macros
//!
//! - [`Record`] - Generate the `Record` schema, accessor and column catalog
//!   from struct field annotations
//!
//! # Examples
//!
//! For working examples, see `datalist/tests/derive.rs`.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for datalist row types.
///
/// # Container Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `entity = "..."` | Entity name used in error messages (default: struct name) |
/// | `rename_all = "..."` | `PascalCase`, `camelCase` or `snake_case` field names |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `key` | Use this field as the record identity |
/// | `skip` | Exclude this field from the schema |
/// | `rename = "..."` | Use a custom field name |
/// | `column` | Declare a catalog column over this field |
/// | `column(...)` | Column with `position`, `header`, `hidden`, `filterable`, `css_class`, `format` |
///
/// Every field that is not skipped must implement `datalist::FieldType`.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Task::PARENT_ID`)
/// 2. `Record::fields()` with one `FieldDef` per field
/// 3. `Record::field_value()` matching on field names
/// 4. `Record::columns()` from the column attributes, in declaration order
///
/// # Example
///
/// ```ignore
/// use datalist::{Catalog, Datalist};
/// use datalist_macros::Record;
///
/// #[derive(Record)]
/// #[datalist(rename_all = "PascalCase")]
/// struct Task {
///     #[datalist(key)]
///     id: u32,
///     #[datalist(column(header = "Task"))]
///     name: String,
///     #[datalist(column(position = 2, filterable = false))]
///     priority: i32,
///     #[datalist(skip)]
///     notes: Vec<String>,
/// }
///
/// let datalist = Datalist::<Task>::from_record()?;
/// assert_eq!(Task::PRIORITY, "Priority");
/// ```
#[proc_macro_derive(Record, attributes(datalist))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
