//! The five top-level sections of a language database document.

use std::fmt;
use std::str::FromStr;

use ldb_model::RecordKind;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    PartsOfSpeech,
    Roots,
    Sources,
    SurfaceForms,
    Users,
}

impl Section {
    /// Sections in document order.
    pub const ALL: [Section; 5] = [
        Section::PartsOfSpeech,
        Section::Roots,
        Section::Sources,
        Section::SurfaceForms,
        Section::Users,
    ];

    /// Tag of the section element.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::PartsOfSpeech => "parts_of_speech",
            Self::Roots => "roots",
            Self::Sources => "sources",
            Self::SurfaceForms => "surface_forms",
            Self::Users => "users",
        }
    }

    /// Kind of the records held in this section.
    #[must_use]
    pub const fn kind(self) -> RecordKind {
        match self {
            Self::PartsOfSpeech => RecordKind::PartOfSpeech,
            Self::Roots => RecordKind::Root,
            Self::Sources => RecordKind::Source,
            Self::SurfaceForms => RecordKind::SurfaceForm,
            Self::Users => RecordKind::User,
        }
    }

    #[must_use]
    pub const fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::PartOfSpeech => Self::PartsOfSpeech,
            RecordKind::Root => Self::Roots,
            RecordKind::Source => Self::Sources,
            RecordKind::SurfaceForm => Self::SurfaceForms,
            RecordKind::User => Self::Users,
        }
    }

    /// Look a section up by its tag or its record tag.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|section| section.tag() == name || section.kind().tag() == name)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            format!(
                "unknown section {s:?} (expected one of: {})",
                Self::ALL.map(Section::tag).join(", ")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_both_ways() {
        assert_eq!(Section::from_name("surface_forms"), Some(Section::SurfaceForms));
        assert_eq!(Section::from_name("surface_form"), Some(Section::SurfaceForms));
        assert_eq!(Section::from_name("words"), None);
        for section in Section::ALL {
            assert_eq!(Section::for_kind(section.kind()), section);
        }
    }
}
