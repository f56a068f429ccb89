//! Annotators credited with changes.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::RecordKind;
use crate::schema::{ID_ATTRIBUTE, Record, RecordSchema, require_non_empty, sealed};

pub static USER_SCHEMA: RecordSchema = RecordSchema::new("user", &[ID_ATTRIBUTE], &["name"]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: u32,
    pub name: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new("<unknown>")
    }
}

impl sealed::Identified for User {
    fn id_mut(&mut self) -> &mut u32 {
        &mut self.id
    }
}

impl Record for User {
    const KIND: RecordKind = RecordKind::User;

    fn schema() -> &'static RecordSchema {
        &USER_SCHEMA
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<String> {
        (name == ID_ATTRIBUTE).then(|| self.id.to_string())
    }

    fn set_attribute(&mut self, name: &str, _raw: &str) -> Result<()> {
        Err(ModelError::unknown_field(USER_SCHEMA.tag, name))
    }

    fn value(&self, name: &str) -> Option<String> {
        (name == "name").then(|| self.name.clone())
    }

    fn set_value(&mut self, name: &str, text: Option<String>) -> Result<()> {
        if name != "name" {
            return Err(ModelError::unknown_field(USER_SCHEMA.tag, name));
        }
        self.name = text.unwrap_or_default();
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(USER_SCHEMA.tag, "name", &self.name)
    }
}
