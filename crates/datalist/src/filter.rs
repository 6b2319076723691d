//! Structured equality and membership filtering.
//!
//! Additional filters name record fields and carry either a scalar (the
//! field must equal it) or a list (the field must be one of its values).
//! Filter values are coerced to the field's kind before matching, so text
//! bound from a query string compares against numbers, dates and UUIDs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DatalistError, Result};
use crate::record::Record;
use crate::value::{FieldKind, OwnedValue};

/// Filters keyed by field name. A `None` entry has no effect.
pub type AdditionalFilters = BTreeMap<String, Option<FilterValue>>;

/// Value of one additional filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Membership test; an empty list matches nothing.
    List(Vec<OwnedValue>),
    /// Equality test.
    Scalar(OwnedValue),
}

impl FilterValue {
    fn values(&self) -> &[OwnedValue] {
        match self {
            FilterValue::List(values) => values,
            FilterValue::Scalar(value) => std::slice::from_ref(value),
        }
    }
}

macro_rules! scalar_filter_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_filter_from!(OwnedValue, &str, String, i32, i64, u32, u64, f64, bool);

impl<V: Into<OwnedValue>> FromIterator<V> for FilterValue {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        FilterValue::List(iter.into_iter().map(Into::into).collect())
    }
}

/// One compiled filter: a field and the values it accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    field: &'static str,
    accepted: Vec<OwnedValue>,
}

impl FieldFilter {
    /// Compiles one filter against the schema of `T`.
    pub fn compile<T: Record>(field: &str, value: &FilterValue) -> Result<FieldFilter> {
        let def = T::field_def(field).ok_or_else(|| DatalistError::UnknownFilterField {
            entity: T::entity_name(),
            field: field.to_string(),
        })?;

        let accepted = value
            .values()
            .iter()
            .map(|value| coerce(def.name, def.kind, value))
            .collect::<Result<Vec<_>>>()?;

        Ok(FieldFilter {
            field: def.name,
            accepted,
        })
    }

    /// Name of the filtered field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns `true` if the record's field equals one of the accepted
    /// values. Null fields never match.
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        let value = record.field_value(self.field);
        self.accepted.iter().any(|accepted| accepted.matches(&value))
    }
}

fn coerce(field: &str, kind: FieldKind, value: &OwnedValue) -> Result<OwnedValue> {
    value
        .clone()
        .coerce(kind)
        .ok_or_else(|| DatalistError::InvalidFilterValue {
            field: field.to_string(),
            value: value.to_string(),
            kind,
        })
}

/// Compiles every present entry of `filters`. Absent entries are skipped.
pub fn compile<T: Record>(filters: &AdditionalFilters) -> Result<Vec<FieldFilter>> {
    filters
        .iter()
        .filter_map(|(field, value)| value.as_ref().map(|value| (field, value)))
        .map(|(field, value)| FieldFilter::compile::<T>(field, value))
        .collect()
}

/// Keeps the records that satisfy every filter.
pub fn apply<'a, T, I>(filters: Vec<FieldFilter>, records: I) -> impl Iterator<Item = &'a T>
where
    T: Record + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(move |record| filters.iter().all(|filter| filter.matches(*record)))
}
