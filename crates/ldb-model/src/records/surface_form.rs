//! Word tokens awaiting or having received classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::RecordKind;
use crate::schema::{
    ID_ATTRIBUTE, Record, RecordSchema, format_timestamp, now, parse_id, parse_timestamp,
    require_non_empty, sealed,
};
use crate::status::SurfaceFormStatus;

pub static SURFACE_FORM_SCHEMA: RecordSchema = RecordSchema::new(
    "surface_form",
    &[ID_ATTRIBUTE, "user_id", "date", "source_id", "root_id"],
    &["value", "status"],
);

/// A word as it appeared in a source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceForm {
    id: u32,
    pub value: String,
    pub status: SurfaceFormStatus,
    pub user_id: u32,
    /// Last status change.
    pub date: DateTime<Utc>,
    pub source_id: u32,
    /// [`Root`](crate::Root) id, 0 until the form is classified.
    pub root_id: u32,
}

impl SurfaceForm {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            date: now(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: SurfaceFormStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_user(mut self, user_id: u32) -> Self {
        self.user_id = user_id;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source_id: u32) -> Self {
        self.source_id = source_id;
        self
    }

    #[must_use]
    pub fn with_root(mut self, root_id: u32) -> Self {
        self.root_id = root_id;
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Secondary identity: same word attached to the same root.
    pub fn same_word(&self, other: &SurfaceForm) -> bool {
        self.value == other.value && self.root_id == other.root_id
    }

    /// Attach the form to `root_id` and mark it classified.
    ///
    /// The user is only re-credited when the root actually changes.
    pub fn classify(&mut self, root_id: u32, user_id: u32, at: DateTime<Utc>) {
        if self.root_id != root_id {
            self.root_id = root_id;
            self.user_id = user_id;
        }
        self.status = SurfaceFormStatus::Classified;
        self.date = at;
    }

    pub fn ignore(&mut self, at: DateTime<Utc>) {
        self.status = SurfaceFormStatus::Ignored;
        self.date = at;
    }

    pub fn reject(&mut self, at: DateTime<Utc>) {
        self.status = SurfaceFormStatus::Rejected;
        self.date = at;
    }
}

impl Default for SurfaceForm {
    fn default() -> Self {
        Self {
            id: 0,
            value: String::new(),
            status: SurfaceFormStatus::Todo,
            user_id: 0,
            date: DateTime::<Utc>::UNIX_EPOCH,
            source_id: 0,
            root_id: 0,
        }
    }
}

impl sealed::Identified for SurfaceForm {
    fn id_mut(&mut self) -> &mut u32 {
        &mut self.id
    }
}

impl Record for SurfaceForm {
    const KIND: RecordKind = RecordKind::SurfaceForm;

    fn schema() -> &'static RecordSchema {
        &SURFACE_FORM_SCHEMA
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            ID_ATTRIBUTE => Some(self.id.to_string()),
            "user_id" => Some(self.user_id.to_string()),
            "date" => Some(format_timestamp(&self.date)),
            "source_id" => Some(self.source_id.to_string()),
            "root_id" => Some(self.root_id.to_string()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, raw: &str) -> Result<()> {
        let tag = SURFACE_FORM_SCHEMA.tag;
        match name {
            "user_id" => self.user_id = parse_id(tag, "user_id", raw)?,
            "date" => self.date = parse_timestamp(tag, "date", raw)?,
            "source_id" => self.source_id = parse_id(tag, "source_id", raw)?,
            "root_id" => self.root_id = parse_id(tag, "root_id", raw)?,
            _ => return Err(ModelError::unknown_field(tag, name)),
        }
        Ok(())
    }

    fn value(&self, name: &str) -> Option<String> {
        match name {
            "value" => Some(self.value.clone()),
            "status" => Some(self.status.as_str().to_string()),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, text: Option<String>) -> Result<()> {
        match name {
            "value" => self.value = text.unwrap_or_default(),
            "status" => self.status = text.unwrap_or_default().parse()?,
            _ => return Err(ModelError::unknown_field(SURFACE_FORM_SCHEMA.tag, name)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(SURFACE_FORM_SCHEMA.tag, "value", &self.value)
    }
}
