//! Key resolution and id matching.
//!
//! The key field is the record's identity: the field marked as key, or
//! else the field named `Id`. Request ids arrive as text and are parsed
//! into the key field's type before comparison, so `"07"` matches the
//! integer `7` but never the string `"7"`.

use crate::error::{DatalistError, Result};
use crate::record::{FieldDef, Record};
use crate::value::{OwnedValue, Value};

/// Conventional name of the identity field.
pub const ID_FIELD: &str = "Id";

/// Resolved identity field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyField {
    entity: &'static str,
    def: &'static FieldDef,
}

impl KeyField {
    /// Finds and validates the key field of `T`.
    ///
    /// Fails with [`DatalistError::MissingKey`] when `T` has neither a
    /// field marked as key nor a field named `Id`, and with
    /// [`DatalistError::UnsupportedKeyType`] when the field's type cannot
    /// serve as an identity.
    pub fn resolve<T: Record>() -> Result<KeyField> {
        let entity = T::entity_name();
        let def = T::fields()
            .iter()
            .find(|def| def.key)
            .or_else(|| T::field_def(ID_FIELD))
            .ok_or(DatalistError::MissingKey { entity })?;

        if !def.kind.is_identity() {
            return Err(DatalistError::UnsupportedKeyType {
                entity,
                field: def.name,
                kind: def.kind,
            });
        }

        Ok(KeyField { entity, def })
    }

    /// Name of the key field.
    pub fn name(&self) -> &'static str {
        self.def.name
    }

    /// Reads the key value of a record.
    pub fn value_of<'a, T: Record>(&self, record: &'a T) -> Value<'a> {
        record.field_value(self.def.name)
    }

    /// Parses request ids into a set of key values.
    pub fn parse_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<KeySet> {
        let values = ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                self.def.kind.parse(id).ok_or_else(|| DatalistError::IdParse {
                    entity: self.entity,
                    field: self.def.name,
                    id: id.to_string(),
                    kind: self.def.kind,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(KeySet {
            field: self.def.name,
            values,
        })
    }
}

/// Parsed set of key values.
///
/// Both membership and exclusion filtering go through [`KeySet::contains`],
/// so the two can never disagree on what matches.
#[derive(Debug, Clone, PartialEq)]
pub struct KeySet {
    field: &'static str,
    values: Vec<OwnedValue>,
}

impl KeySet {
    /// Returns `true` if the record's key is in the set.
    ///
    /// A record with a null key is never in the set.
    pub fn contains<T: Record>(&self, record: &T) -> bool {
        let key = record.field_value(self.field);
        self.values.iter().any(|value| value.matches(&key))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keeps records whose key is in the set.
    pub fn keep<'a, T, I>(self, records: I) -> impl Iterator<Item = &'a T>
    where
        T: Record + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        records.into_iter().filter(move |record| self.contains(*record))
    }

    /// Keeps records whose key is not in the set.
    pub fn exclude<'a, T, I>(self, records: I) -> impl Iterator<Item = &'a T>
    where
        T: Record + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        records.into_iter().filter(move |record| !self.contains(*record))
    }
}
