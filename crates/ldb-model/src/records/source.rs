//! Texts that surface forms were imported from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::RecordKind;
use crate::schema::{
    ID_ATTRIBUTE, Record, RecordSchema, format_timestamp, now, parse_id, parse_timestamp,
    require_non_empty, sealed,
};

pub static SOURCE_SCHEMA: RecordSchema = RecordSchema::new(
    "source",
    &[ID_ATTRIBUTE, "date", "import_user_id"],
    &["name", "filename", "description"],
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    id: u32,
    pub name: String,
    pub filename: String,
    pub description: Option<String>,
    /// When the source was imported.
    pub date: DateTime<Utc>,
    pub import_user_id: u32,
}

impl Source {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: now(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_import_user(mut self, user_id: u32) -> Self {
        self.import_user_id = user_id;
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
}

impl Default for Source {
    fn default() -> Self {
        Self {
            id: 0,
            name: "<unknown>".to_string(),
            filename: String::new(),
            description: None,
            date: DateTime::<Utc>::UNIX_EPOCH,
            import_user_id: 0,
        }
    }
}

impl sealed::Identified for Source {
    fn id_mut(&mut self) -> &mut u32 {
        &mut self.id
    }
}

impl Record for Source {
    const KIND: RecordKind = RecordKind::Source;

    fn schema() -> &'static RecordSchema {
        &SOURCE_SCHEMA
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            ID_ATTRIBUTE => Some(self.id.to_string()),
            "date" => Some(format_timestamp(&self.date)),
            "import_user_id" => Some(self.import_user_id.to_string()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, raw: &str) -> Result<()> {
        let tag = SOURCE_SCHEMA.tag;
        match name {
            "date" => self.date = parse_timestamp(tag, "date", raw)?,
            "import_user_id" => self.import_user_id = parse_id(tag, "import_user_id", raw)?,
            _ => return Err(ModelError::unknown_field(tag, name)),
        }
        Ok(())
    }

    fn value(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "filename" => Some(self.filename.clone()),
            "description" => self.description.clone(),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, text: Option<String>) -> Result<()> {
        match name {
            "name" => self.name = text.unwrap_or_default(),
            "filename" => self.filename = text.unwrap_or_default(),
            "description" => self.description = text,
            _ => return Err(ModelError::unknown_field(SOURCE_SCHEMA.tag, name)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(SOURCE_SCHEMA.tag, "name", &self.name)
    }
}
