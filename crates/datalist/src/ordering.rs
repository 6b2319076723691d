//! Sort direction, field ordering and the sorter stage.
//!
//! Provides [`SortOrder`] for sort direction, [`OrderBy`] for field-based
//! ordering, and [`sort`] which applies the request's sort intent to a
//! filtered sequence.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DatalistError, Result};
use crate::record::Record;
use crate::search::ScoredRecord;
use crate::value::{Number, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (smallest first).
    #[default]
    #[serde(alias = "asc", alias = "ASC")]
    Asc,
    /// Descending order (largest first).
    #[serde(alias = "desc", alias = "DESC")]
    Desc,
}

impl SortOrder {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, SortOrder::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, SortOrder::Desc)
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "Asc",
            SortOrder::Desc => "Desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = DatalistError;

    /// Parses a direction case-insensitively. Blank text means ascending.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(DatalistError::InvalidParameter {
                name: "order".to_string(),
                value: s.to_string(),
            })
        }
    }
}

/// A single ordering clause specifying a field and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub order: SortOrder,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, SortOrder::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, SortOrder::Desc)
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        OrderBy {
            field: field.into(),
            order,
        }
    }

    /// Resolves a requested sort key against a record schema.
    ///
    /// The key is trimmed; a blank or absent key yields `Ok(None)`. A key
    /// that names no field of `T` is an [`DatalistError::UnknownSortField`].
    pub fn resolve<T: Record>(sort: Option<&str>, order: SortOrder) -> Result<Option<OrderBy>> {
        let Some(field) = sort.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        match T::field_def(field) {
            Some(def) => Ok(Some(OrderBy::new(def.name, order))),
            None => Err(DatalistError::UnknownSortField {
                entity: T::entity_name(),
                field: field.to_string(),
            }),
        }
    }

    /// Compares two values according to this ordering.
    ///
    /// Nulls sort last in both directions. Returns `None` if the values
    /// cannot be compared (type mismatch or NaN).
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
        let base = compare_values(a, b)?;
        if a.is_none() || b.is_none() {
            return Some(base);
        }
        Some(self.order.apply(base))
    }

    /// Compares two records by this ordering's field.
    ///
    /// Incomparable values compare equal, so a stable sort keeps their
    /// relative order.
    pub fn compare_records<T: Record>(&self, a: &T, b: &T) -> Ordering {
        self.compare(&a.field_value(&self.field), &b.field_value(&self.field))
            .unwrap_or(Ordering::Equal)
    }
}

/// Compares two values of compatible types.
///
/// Numbers and decimals compare with each other; every other variant only
/// compares with itself. A null is greater than any other value. Returns
/// `None` on a type mismatch or NaN.
///
/// Text compares by byte value: case-sensitive, uppercase before
/// lowercase, no locale collation. [`OrderBy::compare`] does not reverse
/// null orderings, so nulls end up last in ascending and descending sorts.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        // Byte order
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Decimal(b)) => compare_number_decimal(*a, *b),
        (Value::Decimal(a), Value::Number(b)) => {
            compare_number_decimal(*b, *a).map(Ordering::reverse)
        }
        (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),

        // None values sort last
        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::None, _) => Some(Ordering::Greater),
        (_, Value::None) => Some(Ordering::Less),

        _ => None,
    }
}

fn compare_number_decimal(n: Number, d: Decimal) -> Option<Ordering> {
    match n {
        Number::I64(i) => Some(Decimal::from(i).cmp(&d)),
        Number::U64(u) => Some(Decimal::from(u).cmp(&d)),
        Number::F64(f) => f.partial_cmp(&d.to_f64()?),
    }
}

/// How the sorter treated a sequence. Reported in stage events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// No sort key and the sequence was already ordered upstream.
    PassThrough,
    /// No sort key on an unordered sequence; input order kept as the
    /// deterministic order.
    Stable,
    /// Ordered by the requested field.
    ByField,
    /// Ordered by search score, ties broken by the requested field.
    ScoreThenField,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::PassThrough => "pass-through",
            SortMode::Stable => "stable",
            SortMode::ByField => "by-field",
            SortMode::ScoreThenField => "score-then-field",
        }
    }
}

/// Applies sort intent to a filtered sequence.
///
/// `ranked` marks a sequence that came out of text search: its records
/// carry scores and it is already ordered by descending score. A ranked
/// sequence keeps score as the primary key and uses `order_by` only to
/// break ties. The sort is always stable.
pub fn sort<'a, T: Record>(
    records: &mut [ScoredRecord<'a, T>],
    order_by: Option<&OrderBy>,
    ordered: bool,
    ranked: bool,
) -> SortMode {
    match (order_by, ranked) {
        (None, _) if ordered || ranked => SortMode::PassThrough,
        (None, _) => SortMode::Stable,
        (Some(order_by), false) => {
            records.sort_by(|a, b| order_by.compare_records(a.record, b.record));
            SortMode::ByField
        }
        (Some(order_by), true) => {
            records.sort_by(|a, b| {
                b.score
                    .total_cmp(&a.score)
                    .then_with(|| order_by.compare_records(a.record, b.record))
            });
            SortMode::ScoreThenField
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldDef;
    use crate::value::{FieldKind, FieldType};
    use chrono::NaiveDate;

    struct Item {
        name: Option<String>,
        count: i32,
    }

    impl Record for Item {
        fn entity_name() -> &'static str {
            "Item"
        }

        fn fields() -> &'static [FieldDef] {
            const FIELDS: &[FieldDef] = &[
                FieldDef::new("Name", FieldKind::Text),
                FieldDef::new("Count", FieldKind::I32),
            ];
            FIELDS
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "Name" => self.name.to_value(),
                "Count" => self.count.to_value(),
                _ => Value::None,
            }
        }
    }

    fn item(name: Option<&str>, count: i32) -> Item {
        Item {
            name: name.map(str::to_string),
            count,
        }
    }

    fn names<'a>(records: &[ScoredRecord<'a, Item>]) -> Vec<Option<&'a str>> {
        records.iter().map(|r| r.record.name.as_deref()).collect()
    }

    #[test]
    fn sort_order_apply() {
        assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn sort_order_parse() {
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("Asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn sort_order_serde() {
        assert_eq!(serde_json::to_string(&SortOrder::Desc).unwrap(), "\"Desc\"");
        let order: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, SortOrder::Desc);
    }

    #[test]
    fn compare_mixed_kinds() {
        let a = Value::Number(Number::I64(10));
        let b = Value::Decimal(Decimal::new(105, 1));
        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
        assert_eq!(compare_values(&b, &a), Some(Ordering::Greater));
        assert_eq!(compare_values(&Value::Text("1"), &a), None);
    }

    #[test]
    fn compare_dates() {
        let a = Value::Date(NaiveDate::from_ymd_opt(2014, 12, 10).unwrap());
        let b = Value::Date(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
    }

    #[test]
    fn compare_text_by_bytes() {
        let upper = Value::Text("Zebra");
        let lower = Value::Text("apple");
        assert_eq!(compare_values(&upper, &lower), Some(Ordering::Less));
        assert_eq!(
            compare_values(&Value::Text("10"), &Value::Text("9")),
            Some(Ordering::Less)
        );

        let desc = OrderBy::desc("Name");
        assert_eq!(desc.compare(&Value::None, &lower), Some(Ordering::Greater));
    }

    #[test]
    fn compare_none_values() {
        let none = Value::None;
        let some = Value::Text("test");

        assert_eq!(compare_values(&none, &some), Some(Ordering::Greater));
        assert_eq!(compare_values(&some, &none), Some(Ordering::Less));
        assert_eq!(compare_values(&none, &none), Some(Ordering::Equal));
    }

    #[test]
    fn resolve_sort_key() {
        assert_eq!(
            OrderBy::resolve::<Item>(Some(" Count "), SortOrder::Desc).unwrap(),
            Some(OrderBy::desc("Count"))
        );
        assert_eq!(OrderBy::resolve::<Item>(Some("  "), SortOrder::Asc).unwrap(), None);
        assert_eq!(OrderBy::resolve::<Item>(None, SortOrder::Asc).unwrap(), None);

        let err = OrderBy::resolve::<Item>(Some("Missing"), SortOrder::Asc).unwrap_err();
        assert!(matches!(err, DatalistError::UnknownSortField { ref field, .. } if field == "Missing"));
    }

    #[test]
    fn sort_by_field_with_nulls_last() {
        let items = [item(Some("b"), 1), item(None, 2), item(Some("a"), 3)];
        let mut records: Vec<_> = items.iter().map(ScoredRecord::unscored).collect();

        let mode = sort(&mut records, Some(&OrderBy::asc("Name")), false, false);
        assert_eq!(mode, SortMode::ByField);
        assert_eq!(names(&records), [Some("a"), Some("b"), None]);

        sort(&mut records, Some(&OrderBy::desc("Name")), false, false);
        assert_eq!(names(&records), [Some("b"), Some("a"), None]);
    }

    #[test]
    fn sort_without_key_keeps_input_order() {
        let items = [item(Some("b"), 1), item(Some("a"), 2)];
        let mut records: Vec<_> = items.iter().map(ScoredRecord::unscored).collect();

        assert_eq!(sort(&mut records, None, false, false), SortMode::Stable);
        assert_eq!(sort(&mut records, None, true, false), SortMode::PassThrough);
        assert_eq!(names(&records), [Some("b"), Some("a")]);
    }

    #[test]
    fn ranked_sort_keeps_score_primary() {
        let items = [item(Some("x"), 3), item(Some("y"), 1), item(Some("z"), 2)];
        let mut records = vec![
            ScoredRecord::new(&items[0], 3.0),
            ScoredRecord::new(&items[1], 1.0),
            ScoredRecord::new(&items[2], 1.0),
        ];

        let mode = sort(&mut records, Some(&OrderBy::desc("Count")), false, true);
        assert_eq!(mode, SortMode::ScoreThenField);
        assert_eq!(names(&records), [Some("x"), Some("z"), Some("y")]);
    }
}
