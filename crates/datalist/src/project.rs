//! Row projection: record fields rendered as text per catalog column.

use crate::catalog::{Catalog, CatalogEntry};
use crate::data::{Row, ID_KEY, LABEL_KEY};
use crate::error::DatalistError;
use crate::key::KeyField;
use crate::record::Record;

/// Renders one catalog cell of a record.
///
/// A column with a format template always renders text, with null values
/// leaving the placeholder empty. Without a template the value's default
/// text form is used, and a null stays absent.
pub(crate) fn render_cell<T: Record>(entry: &CatalogEntry, record: &T) -> Option<String> {
    let value = record.field_value(&entry.column.key);
    match &entry.template {
        Some(template) => Some(template.render(&value)),
        None => value.to_text(),
    }
}

/// Projects a record into a row: catalog columns, then `Label`, then `Id`.
pub fn project<T: Record>(catalog: &Catalog, record: &T, label: String, id: String) -> Row {
    let mut row = Row::with_capacity(catalog.len() + 2);
    for entry in catalog.entries() {
        row.insert(entry.column.key.clone(), render_cell(entry, record));
    }
    row.insert(LABEL_KEY, Some(label));
    row.insert(ID_KEY, Some(id));
    row
}

/// Text of the first visible column, or empty.
pub fn default_label<T: Record>(catalog: &Catalog, record: &T) -> String {
    catalog
        .entries()
        .iter()
        .find(|entry| !entry.column.hidden)
        .and_then(|entry| render_cell(entry, record))
        .unwrap_or_default()
}

/// Text of the key field, or empty when the key is null or missing.
///
/// A key whose type cannot serve as an identity for id filtering (a flag or
/// a date) still renders its text here.
pub fn default_id<T: Record>(record: &T) -> String {
    let value = match KeyField::resolve::<T>() {
        Ok(key) => key.value_of(record),
        Err(DatalistError::UnsupportedKeyType { field, .. }) => record.field_value(field),
        Err(_) => return String::new(),
    };
    value.to_text().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Column;
    use crate::record::FieldDef;
    use crate::value::{FieldKind, FieldType, Value};
    use chrono::NaiveDate;

    struct Model {
        id: Option<String>,
        value: Option<String>,
        date: Option<NaiveDate>,
        count: i32,
    }

    impl Record for Model {
        fn entity_name() -> &'static str {
            "Model"
        }

        fn fields() -> &'static [FieldDef] {
            const FIELDS: &[FieldDef] = &[
                FieldDef::new("Id", FieldKind::Text),
                FieldDef::new("Value", FieldKind::Text),
                FieldDef::new("Date", FieldKind::Date),
                FieldDef::new("Count", FieldKind::I32),
            ];
            FIELDS
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "Id" => self.id.to_value(),
                "Value" => self.value.to_value(),
                "Date" => self.date.to_value(),
                "Count" => self.count.to_value(),
                _ => Value::None,
            }
        }
    }

    fn catalog() -> Catalog {
        Catalog::builder()
            .column(Column::new("Value"))
            .column(Column::new("Date").format("{:%d/%m/%Y}").position(3))
            .column(Column::new("Count").position(8))
            .build()
            .unwrap()
    }

    fn model() -> Model {
        Model {
            id: Some("9I".into()),
            value: Some("9V".into()),
            date: NaiveDate::from_ymd_opt(2014, 12, 19),
            count: 19,
        }
    }

    #[test]
    fn projects_catalog_then_label_then_id() {
        let row = project(&catalog(), &model(), "L".into(), "I".into());
        assert_eq!(row.keys().collect::<Vec<_>>(), ["Value", "Date", "Count", "Label", "Id"]);
        assert_eq!(row.get("Date"), Some(Some("19/12/2014")));
        assert_eq!(row.get("Count"), Some(Some("19")));
        assert_eq!(row.label(), "L");
        assert_eq!(row.id(), "I");
    }

    #[test]
    fn null_values() {
        let record = Model {
            value: None,
            date: None,
            ..model()
        };
        let row = project(&catalog(), &record, String::new(), String::new());
        assert_eq!(row.get("Value"), Some(None));
        assert_eq!(row.get("Date"), Some(Some("")));
        assert_eq!(row.get("Label"), Some(Some("")));
    }

    #[test]
    fn default_label_and_id() {
        let catalog = catalog();
        assert_eq!(default_label(&catalog, &model()), "9V");
        assert_eq!(default_id(&model()), "9I");

        let record = Model { id: None, value: None, ..model() };
        assert_eq!(default_label(&catalog, &record), "");
        assert_eq!(default_id(&record), "");

        let hidden_first = Catalog::builder()
            .column(Column::new("Value").hidden(true))
            .column(Column::new("Count"))
            .build()
            .unwrap();
        assert_eq!(default_label(&hidden_first, &model()), "19");
        assert_eq!(default_label(&Catalog::default(), &model()), "");
    }

    struct Dated {
        day: NaiveDate,
        flag: bool,
    }

    impl Record for Dated {
        fn entity_name() -> &'static str {
            "Dated"
        }

        fn fields() -> &'static [FieldDef] {
            const FIELDS: &[FieldDef] = &[
                FieldDef::key("Day", FieldKind::Date),
                FieldDef::new("Flag", FieldKind::Bool),
            ];
            FIELDS
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "Day" => self.day.to_value(),
                "Flag" => self.flag.to_value(),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn default_id_renders_non_identity_key() {
        let record = Dated {
            day: NaiveDate::from_ymd_opt(2014, 12, 19).unwrap(),
            flag: true,
        };
        assert!(KeyField::resolve::<Dated>().is_err());
        assert_eq!(default_id(&record), "2014-12-19");
    }
}
