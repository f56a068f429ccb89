//! Model error types.

use std::fmt;

use thiserror::Error;

use crate::ids::RecordKind;

/// Errors raised while converting, validating or identifying records.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An identifier is already registered for this record kind.
    #[error("duplicate {kind} identifier: {id}")]
    DuplicateIdentifier { kind: RecordKind, id: u32 },

    /// The element handed to a schema does not carry the schema's tag.
    #[error("element <{found}> is not valid for <{expected}> records")]
    TagMismatch {
        expected: &'static str,
        found: String,
    },

    /// A record violates one of its invariants.
    #[error("invalid <{tag}> record: {reason}")]
    Validation { tag: &'static str, reason: String },

    /// An attribute could not be coerced to its field type.
    #[error("invalid value {value:?} for attribute '{attribute}' of <{tag}>")]
    InvalidAttribute {
        tag: &'static str,
        attribute: &'static str,
        value: String,
    },

    /// The schema named a field the record does not declare.
    #[error("<{tag}> records have no field '{field}'")]
    UnknownField { tag: &'static str, field: String },

    /// Malformed XML or a writer failure.
    #[error("xml error: {message}")]
    Xml { message: String },
}

impl ModelError {
    pub(crate) fn xml(err: impl fmt::Display) -> Self {
        Self::Xml {
            message: err.to_string(),
        }
    }

    pub(crate) fn validation(tag: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            tag,
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_field(tag: &'static str, field: &str) -> Self {
        Self::UnknownField {
            tag,
            field: field.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
