//! Record search.
//!
//! A [`Query`] matches a record when its id equals the queried id, or when
//! its fields satisfy the field/value pairs. Field values are compared with
//! the record's serialized form, so `("root_id", "3")` and
//! `("status", "todo")` work the same way as text fields.

use ldb_model::{
    Element, PartOfSpeech, Record, RecordKind, Result as ModelResult, Root, Source, SurfaceForm,
    UNASSIGNED_ID, User,
};

use crate::section::Section;

/// How field/value pairs combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// At least one pair must match.
    #[default]
    Any,
    /// Every pair must match.
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    id: u32,
    section: Option<Section>,
    fields: Vec<(String, String)>,
    mode: MatchMode,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    /// Restrict to a section by name; unknown names search every section.
    #[must_use]
    pub fn in_section_named(mut self, name: &str) -> Self {
        self.section = Section::from_name(name);
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn match_all(self) -> Self {
        self.with_mode(MatchMode::All)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn section(&self) -> Option<Section> {
        self.section
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Sections this query searches, in document order.
    pub fn sections(&self) -> Vec<Section> {
        match self.section {
            Some(section) => vec![section],
            None => Section::ALL.to_vec(),
        }
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        if self.id != UNASSIGNED_ID && record.id() == self.id {
            return true;
        }
        if self.fields.is_empty() {
            return false;
        }
        let pair_matches =
            |(name, value): &(String, String)| record.field(name).as_deref() == Some(value.as_str());
        match self.mode {
            MatchMode::Any => self.fields.iter().any(pair_matches),
            MatchMode::All => self.fields.iter().all(pair_matches),
        }
    }
}

/// A borrowed record of any kind, as returned by searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef<'a> {
    PartOfSpeech(&'a PartOfSpeech),
    Root(&'a Root),
    Source(&'a Source),
    SurfaceForm(&'a SurfaceForm),
    User(&'a User),
}

impl<'a> RecordRef<'a> {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::PartOfSpeech(_) => RecordKind::PartOfSpeech,
            Self::Root(_) => RecordKind::Root,
            Self::Source(_) => RecordKind::Source,
            Self::SurfaceForm(_) => RecordKind::SurfaceForm,
            Self::User(_) => RecordKind::User,
        }
    }

    pub fn section(&self) -> Section {
        Section::for_kind(self.kind())
    }

    pub fn id(&self) -> u32 {
        match self {
            Self::PartOfSpeech(record) => record.id(),
            Self::Root(record) => record.id(),
            Self::Source(record) => record.id(),
            Self::SurfaceForm(record) => record.id(),
            Self::User(record) => record.id(),
        }
    }

    pub fn field(&self, name: &str) -> Option<String> {
        match self {
            Self::PartOfSpeech(record) => record.field(name),
            Self::Root(record) => record.field(name),
            Self::Source(record) => record.field(name),
            Self::SurfaceForm(record) => record.field(name),
            Self::User(record) => record.field(name),
        }
    }

    /// Human-readable name of the record: its value or name field.
    pub fn label(&self) -> &'a str {
        match *self {
            Self::PartOfSpeech(record) => &record.name,
            Self::Root(record) => &record.value,
            Self::Source(record) => &record.name,
            Self::SurfaceForm(record) => &record.value,
            Self::User(record) => &record.name,
        }
    }

    pub fn to_element(&self) -> ModelResult<Element> {
        match self {
            Self::PartOfSpeech(record) => record.to_element(),
            Self::Root(record) => record.to_element(),
            Self::Source(record) => record.to_element(),
            Self::SurfaceForm(record) => record.to_element(),
            Self::User(record) => record.to_element(),
        }
    }

    pub fn as_part_of_speech(&self) -> Option<&'a PartOfSpeech> {
        match *self {
            Self::PartOfSpeech(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_root(&self) -> Option<&'a Root> {
        match *self {
            Self::Root(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_source(&self) -> Option<&'a Source> {
        match *self {
            Self::Source(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_surface_form(&self) -> Option<&'a SurfaceForm> {
        match *self {
            Self::SurfaceForm(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&'a User> {
        match *self {
            Self::User(record) => Some(record),
            _ => None,
        }
    }
}
