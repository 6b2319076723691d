//! Error types for the datalist crate.

use thiserror::Error;

use crate::value::FieldKind;

/// Errors that can occur when configuring a datalist or serving a request.
///
/// Every error aborts the whole invocation; no partial result set is
/// produced. Use [`DatalistError::class`] to decide how the host should
/// report it.
#[derive(Debug, Error)]
pub enum DatalistError {
    /// The entity has neither a field marked as key nor a field named `Id`.
    #[error("'{entity}' type does not have key or field named 'Id', required for automatic id filtering")]
    MissingKey { entity: &'static str },

    /// The resolved key field is not a string, UUID or number.
    #[error("'{entity}.{field}' field type has to be a string, uuid or a number, found {kind}")]
    UnsupportedKeyType {
        entity: &'static str,
        field: &'static str,
        kind: FieldKind,
    },

    /// A requested id does not parse into the key field type.
    #[error("id '{id}' is not a valid {kind} value for '{entity}.{field}'")]
    IdParse {
        entity: &'static str,
        field: &'static str,
        id: String,
        kind: FieldKind,
    },

    /// An additional filter names a field the entity does not have.
    #[error("'{entity}' type does not have a field named '{field}' to filter by")]
    UnknownFilterField { entity: &'static str, field: String },

    /// The sort key names a field the entity does not have.
    #[error("'{entity}' type does not have a field named '{field}' to sort by")]
    UnknownSortField { entity: &'static str, field: String },

    /// An additional filter value cannot be compared with the field type.
    #[error("filter value '{value}' is not a valid {kind} value for field '{field}'")]
    InvalidFilterValue {
        field: String,
        value: String,
        kind: FieldKind,
    },

    /// A request parameter could not be bound.
    #[error("invalid value '{value}' for request parameter '{name}'")]
    InvalidParameter { name: String, value: String },

    /// A column format template is malformed.
    #[error("invalid format template '{template}' for column '{column}': {reason}")]
    InvalidFormat {
        column: String,
        template: String,
        reason: &'static str,
    },

    /// A configuration file could not be read.
    #[error("failed to load datalist configuration: {message}")]
    Load { message: String },

    /// YAML configuration could not be parsed.
    #[error("invalid datalist configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    /// JSON configuration or output could not be processed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The host cancelled the invocation between two stages.
    #[error("datalist query cancelled before {stage}")]
    Cancelled { stage: &'static str },
}

/// Broad category of a [`DatalistError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Static setup problem; retrying will not help.
    Configuration,
    /// Caller input problem; the caller must correct the request.
    Request,
    /// Cooperative cancellation requested by the host.
    Cancelled,
}

impl DatalistError {
    /// Returns the category of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            DatalistError::MissingKey { .. }
            | DatalistError::UnsupportedKeyType { .. }
            | DatalistError::InvalidFormat { .. }
            | DatalistError::Load { .. }
            | DatalistError::Config(_)
            | DatalistError::Json(_) => ErrorClass::Configuration,

            DatalistError::IdParse { .. }
            | DatalistError::UnknownFilterField { .. }
            | DatalistError::UnknownSortField { .. }
            | DatalistError::InvalidFilterValue { .. }
            | DatalistError::InvalidParameter { .. } => ErrorClass::Request,

            DatalistError::Cancelled { .. } => ErrorClass::Cancelled,
        }
    }

    /// Returns `true` if the caller can fix this error by changing the request.
    pub fn is_request_error(&self) -> bool {
        self.class() == ErrorClass::Request
    }
}

/// Result type for datalist operations.
pub type Result<T> = std::result::Result<T, DatalistError>;
