//! Runtime value types for field access.
//!
//! The [`Value`] enum represents the runtime value of a field read from a
//! record. [`FieldKind`] describes the declared type of a field, and
//! [`OwnedValue`] is the owned counterpart used by id sets and filters.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::ordering::compare_values;

/// Default text form used for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default text form used for date-times.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Runtime value of a field, borrowed from the source record.
///
/// # Example
///
/// ```
/// use datalist::{Number, Value};
///
/// struct Product {
///     name: String,
///     stock: u32,
/// }
///
/// fn accessor<'a>(product: &'a Product, field: &str) -> Value<'a> {
///     match field {
///         "Name" => Value::Text(&product.name),
///         "Stock" => Value::Number(Number::U64(product.stock as u64)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text value (borrowed).
    Text(&'a str),
    /// Integer or floating point value.
    Number(Number),
    /// Exact decimal value.
    Decimal(Decimal),
    /// UUID value.
    Uuid(Uuid),
    /// Boolean value.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without timezone.
    DateTime(NaiveDateTime),
    /// Field not present, null, or unsupported.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns `true` if this is a `Text` value.
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Extracts the text value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the default text form of this value, or `None` for nulls.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some((*s).to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Decimal(d) => Some(d.to_string()),
            Value::Uuid(u) => Some(u.hyphenated().to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
            Value::DateTime(dt) => Some(dt.format(DATE_TIME_FORMAT).to_string()),
            Value::None => None,
        }
    }

    /// Converts to an owned value. Returns `None` for nulls.
    pub fn to_owned_value(&self) -> Option<OwnedValue> {
        match self {
            Value::Text(s) => Some(OwnedValue::Text((*s).to_string())),
            Value::Number(n) => Some(OwnedValue::Number(*n)),
            Value::Decimal(d) => Some(OwnedValue::Decimal(*d)),
            Value::Uuid(u) => Some(OwnedValue::Uuid(*u)),
            Value::Bool(b) => Some(OwnedValue::Bool(*b)),
            Value::Date(d) => Some(OwnedValue::Date(*d)),
            Value::DateTime(dt) => Some(OwnedValue::DateTime(*dt)),
            Value::None => None,
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision.
/// Comparisons between different variants go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::I64(a), Number::U64(b)) => Some(compare_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed_unsigned(b, a).reverse()),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

fn compare_signed_unsigned(a: i64, b: u64) -> Ordering {
    match u64::try_from(a) {
        Ok(a) => a.cmp(&b),
        Err(_) => Ordering::Less,
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n as _)
                }
            }
        )*
    };
}

number_from! {
    i8 => I64, i16 => I64, i32 => I64, i64 => I64, isize => I64,
    u8 => U64, u16 => U64, u32 => U64, u64 => U64, usize => U64,
    f32 => F64, f64 => F64,
}

/// Declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Decimal,
    Text,
    Uuid,
    Bool,
    Date,
    DateTime,
    /// Any other type; readable but never usable as a key or filter.
    Other,
}

impl FieldKind {
    /// Returns `true` for kinds that may serve as a record identity:
    /// every integer width, floats, decimal, text and UUID.
    pub fn is_identity(self) -> bool {
        self.is_numeric() || matches!(self, FieldKind::Decimal | FieldKind::Text | FieldKind::Uuid)
    }

    /// Returns `true` for integer and floating point kinds.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldKind::I8
                | FieldKind::I16
                | FieldKind::I32
                | FieldKind::I64
                | FieldKind::Isize
                | FieldKind::U8
                | FieldKind::U16
                | FieldKind::U32
                | FieldKind::U64
                | FieldKind::Usize
                | FieldKind::F32
                | FieldKind::F64
        )
    }

    /// Returns `true` if values of this kind take part in text search.
    pub fn is_textual(self) -> bool {
        matches!(self, FieldKind::Text)
    }

    /// Parses a string into a value of this kind.
    ///
    /// Parsing is exact: integers are range-checked against the width of
    /// the kind, and nothing is trimmed. Returns `None` when the text does
    /// not represent a value of this kind.
    pub fn parse(self, text: &str) -> Option<OwnedValue> {
        fn num<T>(text: &str) -> Option<OwnedValue>
        where
            T: FromStr + Into<Number>,
        {
            text.parse::<T>().ok().map(|n| OwnedValue::Number(n.into()))
        }

        match self {
            FieldKind::I8 => num::<i8>(text),
            FieldKind::I16 => num::<i16>(text),
            FieldKind::I32 => num::<i32>(text),
            FieldKind::I64 => num::<i64>(text),
            FieldKind::Isize => num::<isize>(text),
            FieldKind::U8 => num::<u8>(text),
            FieldKind::U16 => num::<u16>(text),
            FieldKind::U32 => num::<u32>(text),
            FieldKind::U64 => num::<u64>(text),
            FieldKind::Usize => num::<usize>(text),
            FieldKind::F32 => num::<f32>(text),
            FieldKind::F64 => num::<f64>(text),
            FieldKind::Decimal => Decimal::from_str(text).ok().map(OwnedValue::Decimal),
            FieldKind::Text => Some(OwnedValue::Text(text.to_string())),
            FieldKind::Uuid => Uuid::parse_str(text).ok().map(OwnedValue::Uuid),
            FieldKind::Bool => {
                if text.eq_ignore_ascii_case("true") {
                    Some(OwnedValue::Bool(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Some(OwnedValue::Bool(false))
                } else {
                    None
                }
            }
            FieldKind::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .map(OwnedValue::Date),
            FieldKind::DateTime => text
                .parse::<NaiveDateTime>()
                .or_else(|_| NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT))
                .ok()
                .map(OwnedValue::DateTime),
            FieldKind::Other => None,
        }
    }

    /// Returns the display name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::Isize => "isize",
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::U64 => "u64",
            FieldKind::Usize => "usize",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::Decimal => "decimal",
            FieldKind::Text => "text",
            FieldKind::Uuid => "uuid",
            FieldKind::Bool => "bool",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Other => "other",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Owned value for storage in id sets and filters.
///
/// Unlike [`Value`], which borrows from the source record, `OwnedValue`
/// owns its data so it can live in a request.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedValue {
    Text(String),
    Number(Number),
    Decimal(Decimal),
    Uuid(Uuid),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl OwnedValue {
    /// Borrows this value as a [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            OwnedValue::Text(s) => Value::Text(s),
            OwnedValue::Number(n) => Value::Number(*n),
            OwnedValue::Decimal(d) => Value::Decimal(*d),
            OwnedValue::Uuid(u) => Value::Uuid(*u),
            OwnedValue::Bool(b) => Value::Bool(*b),
            OwnedValue::Date(d) => Value::Date(*d),
            OwnedValue::DateTime(dt) => Value::DateTime(*dt),
        }
    }

    /// Tests equality with a field value. A null field never matches.
    pub fn matches(&self, field: &Value<'_>) -> bool {
        if field.is_none() {
            return false;
        }
        compare_values(&self.as_value(), field) == Some(Ordering::Equal)
    }

    /// Returns `true` if this value can be compared with fields of `kind`
    /// without conversion.
    pub fn fits(&self, kind: FieldKind) -> bool {
        match self {
            OwnedValue::Text(_) => kind == FieldKind::Text,
            OwnedValue::Number(_) => kind.is_numeric(),
            OwnedValue::Decimal(_) => kind == FieldKind::Decimal,
            OwnedValue::Uuid(_) => kind == FieldKind::Uuid,
            OwnedValue::Bool(_) => kind == FieldKind::Bool,
            OwnedValue::Date(_) => kind == FieldKind::Date,
            OwnedValue::DateTime(_) => kind == FieldKind::DateTime,
        }
    }

    /// Converts this value for comparison with fields of `kind`.
    ///
    /// Text is parsed into the kind. Numbers and decimals are converted the
    /// same way parsing would: integers are range-checked against the
    /// width, floats are rounded to `f32` for `F32` fields. Returns `None`
    /// when no exact conversion exists.
    pub fn coerce(self, kind: FieldKind) -> Option<OwnedValue> {
        match self {
            OwnedValue::Text(text) => kind.parse(&text),
            OwnedValue::Number(n) => convert_number(n, kind),
            OwnedValue::Decimal(d) if kind != FieldKind::Decimal && kind.is_numeric() => {
                kind.parse(&d.normalize().to_string())
            }
            other => other.fits(kind).then_some(other),
        }
    }
}

fn convert_number(n: Number, kind: FieldKind) -> Option<OwnedValue> {
    fn int<T>(n: Number) -> Option<OwnedValue>
    where
        T: TryFrom<i64> + TryFrom<u64> + Into<Number>,
    {
        let converted = match n {
            Number::I64(i) => T::try_from(i).ok(),
            Number::U64(u) => T::try_from(u).ok(),
            Number::F64(f) if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => {
                T::try_from(f as u64).ok()
            }
            Number::F64(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < 0.0 => {
                T::try_from(f as i64).ok()
            }
            Number::F64(_) => None,
        };
        converted.map(|value| OwnedValue::Number(value.into()))
    }

    match kind {
        FieldKind::I8 => int::<i8>(n),
        FieldKind::I16 => int::<i16>(n),
        FieldKind::I32 => int::<i32>(n),
        FieldKind::I64 => int::<i64>(n),
        FieldKind::Isize => int::<isize>(n),
        FieldKind::U8 => int::<u8>(n),
        FieldKind::U16 => int::<u16>(n),
        FieldKind::U32 => int::<u32>(n),
        FieldKind::U64 => int::<u64>(n),
        FieldKind::Usize => int::<usize>(n),
        FieldKind::F32 => {
            let value = n.to_f64();
            let narrowed = value as f32;
            (narrowed.is_finite() || !value.is_finite())
                .then(|| OwnedValue::Number(Number::from(narrowed)))
        }
        FieldKind::F64 => Some(OwnedValue::Number(Number::F64(n.to_f64()))),
        FieldKind::Decimal => match n {
            Number::I64(i) => Some(OwnedValue::Decimal(Decimal::from(i))),
            Number::U64(u) => Some(OwnedValue::Decimal(Decimal::from(u))),
            Number::F64(f) => Decimal::try_from(f).ok().map(OwnedValue::Decimal),
        },
        _ => None,
    }
}

impl fmt::Display for OwnedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_value().to_text().unwrap_or_default())
    }
}

impl From<String> for OwnedValue {
    fn from(s: String) -> Self {
        OwnedValue::Text(s)
    }
}

impl From<&str> for OwnedValue {
    fn from(s: &str) -> Self {
        OwnedValue::Text(s.to_string())
    }
}

impl From<Number> for OwnedValue {
    fn from(n: Number) -> Self {
        OwnedValue::Number(n)
    }
}

impl From<Decimal> for OwnedValue {
    fn from(d: Decimal) -> Self {
        OwnedValue::Decimal(d)
    }
}

impl From<Uuid> for OwnedValue {
    fn from(u: Uuid) -> Self {
        OwnedValue::Uuid(u)
    }
}

impl From<bool> for OwnedValue {
    fn from(b: bool) -> Self {
        OwnedValue::Bool(b)
    }
}

impl From<NaiveDate> for OwnedValue {
    fn from(d: NaiveDate) -> Self {
        OwnedValue::Date(d)
    }
}

impl From<NaiveDateTime> for OwnedValue {
    fn from(dt: NaiveDateTime) -> Self {
        OwnedValue::DateTime(dt)
    }
}

impl Serialize for OwnedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            OwnedValue::Text(s) => serializer.serialize_str(s),
            OwnedValue::Number(Number::I64(n)) => serializer.serialize_i64(*n),
            OwnedValue::Number(Number::U64(n)) => serializer.serialize_u64(*n),
            OwnedValue::Number(Number::F64(n)) => serializer.serialize_f64(*n),
            OwnedValue::Bool(b) => serializer.serialize_bool(*b),
            other => serializer.collect_str(other),
        }
    }
}

/// Deserializes from a JSON-like scalar. Strings stay text until they are
/// coerced against a field kind.
impl<'de> Deserialize<'de> for OwnedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OwnedValueVisitor;

        impl Visitor<'_> for OwnedValueVisitor {
            type Value = OwnedValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number or boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<OwnedValue, E> {
                Ok(OwnedValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<OwnedValue, E> {
                Ok(OwnedValue::Number(Number::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<OwnedValue, E> {
                Ok(OwnedValue::Number(Number::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<OwnedValue, E> {
                Ok(OwnedValue::Number(Number::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<OwnedValue, E> {
                Ok(OwnedValue::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<OwnedValue, E> {
                Ok(OwnedValue::Text(v))
            }
        }

        deserializer.deserialize_any(OwnedValueVisitor)
    }
}

macro_rules! owned_number_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for OwnedValue {
                fn from(n: $ty) -> Self {
                    OwnedValue::Number(Number::from(n))
                }
            }
        )*
    };
}

owned_number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Rust types that can be exposed as record fields.
///
/// The `#[derive(Record)]` macro uses this trait to build the field schema
/// and accessor, so any field type implementing it needs no annotation.
/// `Option<T>` maps `None` to [`Value::None`].
pub trait FieldType {
    /// Declared kind of fields of this type.
    const KIND: FieldKind;

    /// Reads the value for query comparison and display.
    fn to_value(&self) -> Value<'_>;
}

macro_rules! numeric_field_type {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::$kind;

                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

numeric_field_type! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize,
    f32 => F32, f64 => F64,
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl FieldType for &'static str {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> Value<'_> {
        Value::Text(self)
    }
}

impl FieldType for Decimal {
    const KIND: FieldKind = FieldKind::Decimal;

    fn to_value(&self) -> Value<'_> {
        Value::Decimal(*self)
    }
}

impl FieldType for Uuid {
    const KIND: FieldKind = FieldKind::Uuid;

    fn to_value(&self) -> Value<'_> {
        Value::Uuid(*self)
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl FieldType for NaiveDate {
    const KIND: FieldKind = FieldKind::Date;

    fn to_value(&self) -> Value<'_> {
        Value::Date(*self)
    }
}

impl FieldType for NaiveDateTime {
    const KIND: FieldKind = FieldKind::DateTime;

    fn to_value(&self) -> Value<'_> {
        Value::DateTime(*self)
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_text_forms() {
        assert_eq!(Value::Text("abc").to_text().as_deref(), Some("abc"));
        assert_eq!(Value::Number(Number::I64(-4)).to_text().as_deref(), Some("-4"));
        assert_eq!(Value::Number(Number::F64(2.5)).to_text().as_deref(), Some("2.5"));
        assert_eq!(Value::Bool(true).to_text().as_deref(), Some("true"));
        assert_eq!(
            Value::Date(NaiveDate::from_ymd_opt(2014, 12, 19).unwrap())
                .to_text()
                .as_deref(),
            Some("2014-12-19")
        );
        assert_eq!(Value::None.to_text(), None);
    }

    #[test]
    fn number_comparisons_same_type() {
        assert_eq!(Number::I64(5).compare(Number::I64(10)), Some(Ordering::Less));
        assert_eq!(Number::U64(10).compare(Number::U64(5)), Some(Ordering::Greater));
        assert_eq!(Number::F64(5.0).compare(Number::F64(5.0)), Some(Ordering::Equal));
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(Number::I64(5).compare(Number::U64(10)), Some(Ordering::Less));
        assert_eq!(Number::I64(-1).compare(Number::U64(0)), Some(Ordering::Less));
        assert_eq!(Number::U64(u64::MAX).compare(Number::I64(i64::MAX)), Some(Ordering::Greater));
        assert_eq!(Number::I64(5).compare(Number::F64(5.0)), Some(Ordering::Equal));
    }

    #[test]
    fn number_nan_comparison() {
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
    }

    #[test]
    fn identity_kinds() {
        for kind in [
            FieldKind::I8,
            FieldKind::U64,
            FieldKind::F32,
            FieldKind::Decimal,
            FieldKind::Text,
            FieldKind::Uuid,
        ] {
            assert!(kind.is_identity(), "{kind}");
        }
        for kind in [FieldKind::Bool, FieldKind::Date, FieldKind::DateTime, FieldKind::Other] {
            assert!(!kind.is_identity(), "{kind}");
        }
    }

    #[test]
    fn parse_is_width_checked() {
        assert_eq!(FieldKind::U8.parse("255"), Some(OwnedValue::Number(Number::U64(255))));
        assert_eq!(FieldKind::U8.parse("256"), None);
        assert_eq!(FieldKind::I32.parse("-7"), Some(OwnedValue::Number(Number::I64(-7))));
        assert_eq!(FieldKind::I32.parse(" 7"), None);
        assert_eq!(FieldKind::I32.parse("7.5"), None);
        assert_eq!(FieldKind::U32.parse("-1"), None);
    }

    #[test]
    fn parse_other_kinds() {
        assert_eq!(
            FieldKind::Decimal.parse("10.25"),
            Some(OwnedValue::Decimal(Decimal::new(1025, 2)))
        );
        assert!(FieldKind::Uuid.parse("not-a-uuid").is_none());
        assert!(FieldKind::Uuid
            .parse("67e55044-10b1-426f-9247-bb680e5fe0c8")
            .is_some());
        assert_eq!(FieldKind::Bool.parse("TRUE"), Some(OwnedValue::Bool(true)));
        assert_eq!(
            FieldKind::Date.parse("2014-12-19"),
            Some(OwnedValue::Date(NaiveDate::from_ymd_opt(2014, 12, 19).unwrap()))
        );
        assert!(FieldKind::DateTime.parse("2014-12-19T10:00:00").is_some());
        assert!(FieldKind::DateTime.parse("2014-12-19 10:00:00").is_some());
        assert_eq!(FieldKind::Other.parse("x"), None);
    }

    #[test]
    fn owned_value_matches_field() {
        assert!(OwnedValue::from(19i32).matches(&Value::Number(Number::I64(19))));
        assert!(OwnedValue::from(19i32).matches(&Value::Number(Number::U64(19))));
        assert!(!OwnedValue::from("9I").matches(&Value::Text("9i")));
        assert!(!OwnedValue::from("9I").matches(&Value::None));
        assert!(!OwnedValue::from(true).matches(&Value::Text("true")));
    }

    #[test]
    fn owned_value_coerce() {
        assert_eq!(
            OwnedValue::from("16").coerce(FieldKind::I32),
            Some(OwnedValue::Number(Number::I64(16)))
        );
        assert_eq!(OwnedValue::from("x").coerce(FieldKind::I32), None);
        assert_eq!(
            OwnedValue::from(3u8).coerce(FieldKind::I64),
            Some(OwnedValue::Number(Number::I64(3)))
        );
        assert_eq!(OwnedValue::from(true).coerce(FieldKind::Text), None);
    }

    #[test]
    fn numbers_coerce_into_field_kind() {
        assert_eq!(
            OwnedValue::from(10i64).coerce(FieldKind::Decimal),
            Some(OwnedValue::Decimal(Decimal::from(10)))
        );
        assert_eq!(
            OwnedValue::from(10.25f64).coerce(FieldKind::Decimal),
            Some(OwnedValue::Decimal(Decimal::new(1025, 2)))
        );
        assert_eq!(
            OwnedValue::from(0.1f64).coerce(FieldKind::F32),
            Some(OwnedValue::Number(Number::F64(f64::from(0.1f32))))
        );
        assert_eq!(OwnedValue::from(300i64).coerce(FieldKind::U8), None);
        assert_eq!(OwnedValue::from(-1i64).coerce(FieldKind::U32), None);
        assert_eq!(OwnedValue::from(7.5f64).coerce(FieldKind::I32), None);
        assert_eq!(
            OwnedValue::from(7.0f64).coerce(FieldKind::I32),
            Some(OwnedValue::Number(Number::I64(7)))
        );
        assert_eq!(
            OwnedValue::Decimal(Decimal::new(120, 1)).coerce(FieldKind::U16),
            Some(OwnedValue::Number(Number::U64(12)))
        );
        assert_eq!(OwnedValue::from(1i64).coerce(FieldKind::Bool), None);
    }

    #[test]
    fn coerced_numbers_match_narrow_fields() {
        let weight = 0.1f32;
        let filter = OwnedValue::from(0.1f64).coerce(FieldKind::F32).unwrap();
        assert!(filter.matches(&weight.to_value()));

        let price = Decimal::from(10);
        let filter = OwnedValue::from(10i64).coerce(FieldKind::Decimal).unwrap();
        assert!(filter.matches(&price.to_value()));
    }

    #[test]
    fn owned_value_serde() {
        let values: Vec<OwnedValue> = serde_json::from_str(r#"["5V", 16, -2, 1.5, true]"#).unwrap();
        assert_eq!(
            values,
            [
                OwnedValue::from("5V"),
                OwnedValue::Number(Number::U64(16)),
                OwnedValue::Number(Number::I64(-2)),
                OwnedValue::Number(Number::F64(1.5)),
                OwnedValue::Bool(true),
            ]
        );
        let date = OwnedValue::Date(NaiveDate::from_ymd_opt(2014, 12, 19).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2014-12-19\"");
    }

    #[test]
    fn option_field_type() {
        let present: Option<String> = Some("x".into());
        let absent: Option<String> = None;
        assert_eq!(present.to_value(), Value::Text("x"));
        assert_eq!(absent.to_value(), Value::None);
        assert_eq!(<Option<u16> as FieldType>::KIND, FieldKind::U16);
    }
}
