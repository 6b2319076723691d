//! The record trait and static field schema.
//!
//! A [`Record`] exposes its fields by name through [`Value`], and declares a
//! static schema of [`FieldDef`]s so that filters, sorting and key
//! resolution can be validated even when the collection is empty.

use crate::catalog::Column;
use crate::value::{FieldKind, Value};

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name as used in requests, catalogs and rows.
    pub name: &'static str,
    /// Declared type of the field.
    pub kind: FieldKind,
    /// Explicitly designated as the record identity.
    pub key: bool,
}

impl FieldDef {
    /// Creates a plain field definition.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldDef {
            name,
            kind,
            key: false,
        }
    }

    /// Creates a field definition designated as the record key.
    pub const fn key(name: &'static str, kind: FieldKind) -> Self {
        FieldDef {
            name,
            kind,
            key: true,
        }
    }
}

/// Trait for types that can be served as datalist rows.
///
/// This trait is typically derived using `#[derive(Record)]` from the
/// `datalist-macros` crate, but can also be implemented manually.
///
/// # Derive Usage
///
/// ```ignore
/// use datalist_macros::Record;
///
/// #[derive(Record)]
/// #[datalist(rename_all = "PascalCase")]
/// struct Product {
///     #[datalist(key)]
///     sku: String,
///     #[datalist(column(header = "Name"))]
///     name: String,
///     #[datalist(column(filterable = false))]
///     stock: u32,
/// }
/// ```
///
/// # Manual Implementation
///
/// ```
/// use datalist::{FieldDef, FieldKind, FieldType, Record, Value};
///
/// struct Product {
///     sku: String,
///     stock: u32,
/// }
///
/// impl Record for Product {
///     fn entity_name() -> &'static str {
///         "Product"
///     }
///
///     fn fields() -> &'static [FieldDef] {
///         const FIELDS: &[FieldDef] = &[
///             FieldDef::key("Sku", FieldKind::Text),
///             FieldDef::new("Stock", FieldKind::U32),
///         ];
///         FIELDS
///     }
///
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "Sku" => self.sku.to_value(),
///             "Stock" => self.stock.to_value(),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Name of the entity type, used in error messages.
    fn entity_name() -> &'static str;

    /// Static schema of the queryable fields.
    fn fields() -> &'static [FieldDef];

    /// Returns the value of a field, or [`Value::None`] if the field is
    /// null or unknown.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Column catalog declared alongside the record type.
    ///
    /// Derived implementations fill this from `#[datalist(column)]`
    /// attributes. Catalogs can also be built independently with
    /// [`Catalog::builder`](crate::Catalog::builder).
    fn columns() -> Vec<Column> {
        Vec::new()
    }

    /// Looks up a field definition by name.
    fn field_def(name: &str) -> Option<&'static FieldDef>
    where
        Self: Sized,
    {
        Self::fields().iter().find(|def| def.name == name)
    }

    /// Returns a static accessor function over this record type.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldType;

    struct TestItem {
        name: String,
        count: i32,
    }

    impl Record for TestItem {
        fn entity_name() -> &'static str {
            "TestItem"
        }

        fn fields() -> &'static [FieldDef] {
            const FIELDS: &[FieldDef] = &[
                FieldDef::new("name", FieldKind::Text),
                FieldDef::new("count", FieldKind::I32),
            ];
            FIELDS
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => self.name.to_value(),
                "count" => self.count.to_value(),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn manual_impl_reads_fields() {
        let item = TestItem {
            name: "test".to_string(),
            count: 42,
        };

        assert_eq!(item.field_value("name"), Value::Text("test"));
        assert_eq!(item.field_value("unknown"), Value::None);
        assert_eq!(TestItem::accessor(&item, "name"), Value::Text("test"));
    }

    #[test]
    fn field_def_lookup() {
        assert_eq!(TestItem::field_def("count").map(|d| d.kind), Some(FieldKind::I32));
        assert!(TestItem::field_def("Count").is_none());
        assert!(TestItem::columns().is_empty());
    }

    #[test]
    fn key_constructor_marks_key() {
        assert!(FieldDef::key("Id", FieldKind::Text).key);
        assert!(!FieldDef::new("Id", FieldKind::Text).key);
    }
}
