//! Database error types.
//!
//! Every operation returns a structured error that can be turned into a
//! user-facing message and an optional remediation hint.

use std::path::PathBuf;

use ldb_model::ModelError;
use thiserror::Error;

use crate::section::Section;

/// Language database operation error.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The document is not a language database.
    #[error("invalid language database format: {reason}")]
    Format { reason: String },

    /// A required section element is absent (escalated load warning).
    #[error("missing top-level <{}> section", .section.tag())]
    MissingSection { section: Section },

    /// An equal record is already stored.
    #[error("duplicate {} record with id {id}", .section.kind())]
    DuplicateModel { section: Section, id: u32 },

    /// `save` was called without a path and the database has none.
    #[error("no filename given for saving the language database")]
    MissingFilename,

    /// Collections and XML tree disagree about a record.
    #[error("no {} record with id {id}", .section.kind())]
    UnknownModel { section: Section, id: u32 },

    /// A foreign key points at a record that does not exist.
    #[error("{} {id} referenced but not present", .section.kind())]
    MissingReference { section: Section, id: u32 },

    /// Creating a record was requested but disabled by configuration.
    #[error("creating a new {} ({name:?}) is not allowed", .section.kind())]
    CreationNotAllowed { section: Section, name: String },

    /// Record conversion, validation or identity failure.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// File I/O error.
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be read or written.
    #[error("invalid configuration file: {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DatabaseError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Format { reason } => {
                format!("The file is not a valid language database: {reason}")
            }
            Self::MissingSection { section } => format!(
                "The language database has no \"{}\" section.",
                section.tag()
            ),
            Self::DuplicateModel { section, id } => format!(
                "A {} with id {id} already exists in the database.",
                section.kind()
            ),
            Self::MissingFilename => "No file name was given to save the database to.".to_string(),
            Self::UnknownModel { section, id } => format!(
                "The database is inconsistent: {} {id} could not be found.",
                section.kind()
            ),
            Self::MissingReference { section, id } => format!(
                "The referenced {} (id {id}) does not exist.",
                section.kind()
            ),
            Self::CreationNotAllowed { section, name } => {
                format!("Adding the new {} \"{name}\" is not allowed.", section.kind())
            }
            Self::Model(err) => err.to_string(),
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the file to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::Config { path, .. } => {
                format!("The configuration file {} could not be used.", path.display())
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Format { .. } => {
                Some("Make sure you selected a language database (.xldb) file.".into())
            }
            Self::MissingSection { .. } => {
                Some("Open the database without strict checking; an empty section is created.".into())
            }
            Self::MissingFilename => Some("Choose a file name with \"save as\".".into()),
            Self::MissingReference { .. } => {
                Some("Re-classify the record or add the missing entry first.".into())
            }
            Self::CreationNotAllowed { .. } => {
                Some("Enable may_create_pos in the configuration or pick an existing entry.".into())
            }
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
            Self::Config { .. } => Some("Fix or delete the configuration file.".into()),
            Self::DuplicateModel { .. } | Self::UnknownModel { .. } | Self::Model(_) => None,
        }
    }
}

/// Result type alias for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
