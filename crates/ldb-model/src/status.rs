//! Classification status of a surface form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Where a surface form is in the annotation workflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceFormStatus {
    /// Imported, waiting for an annotator.
    #[default]
    Todo,
    /// Assigned a root.
    Classified,
    /// Deliberately skipped.
    Ignored,
    /// Not a word of the language.
    Rejected,
}

impl SurfaceFormStatus {
    pub const ALL: [SurfaceFormStatus; 4] = [
        SurfaceFormStatus::Todo,
        SurfaceFormStatus::Classified,
        SurfaceFormStatus::Ignored,
        SurfaceFormStatus::Rejected,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Classified => "classified",
            Self::Ignored => "ignored",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Todo)
    }
}

impl fmt::Display for SurfaceFormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceFormStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                ModelError::validation(
                    "surface_form",
                    format!("unknown status {s:?} (expected todo, classified, ignored or rejected)"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        for status in SurfaceFormStatus::ALL {
            assert_eq!(status.as_str().parse::<SurfaceFormStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let err = "done".parse::<SurfaceFormStatus>().unwrap_err();
        assert!(matches!(err, ModelError::Validation { tag: "surface_form", .. }));
        assert!("".parse::<SurfaceFormStatus>().is_err());
    }
}
