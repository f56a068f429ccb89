//! Word roots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::RecordKind;
use crate::schema::{
    ID_ATTRIBUTE, Record, RecordSchema, format_timestamp, now, parse_id, parse_timestamp,
    require_non_empty, sealed,
};

pub static ROOT_SCHEMA: RecordSchema = RecordSchema::new(
    "root",
    &[ID_ATTRIBUTE, "pos_id", "user_id", "date"],
    &["value", "remarks"],
);

/// A lexical root, linked to its part of speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    id: u32,
    pub value: String,
    pub remarks: Option<String>,
    /// [`PartOfSpeech`](crate::PartOfSpeech) id, 0 when not yet assigned.
    pub pos_id: u32,
    /// [`User`](crate::User) who last changed the root.
    pub user_id: u32,
    /// Last modification.
    pub date: DateTime<Utc>,
}

impl Root {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            date: now(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_part_of_speech(mut self, pos_id: u32) -> Self {
        self.pos_id = pos_id;
        self
    }

    #[must_use]
    pub fn with_user(mut self, user_id: u32) -> Self {
        self.user_id = user_id;
        self
    }

    #[must_use]
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
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

impl Default for Root {
    fn default() -> Self {
        Self {
            id: 0,
            value: String::new(),
            remarks: None,
            pos_id: 0,
            user_id: 0,
            date: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl sealed::Identified for Root {
    fn id_mut(&mut self) -> &mut u32 {
        &mut self.id
    }
}

impl Record for Root {
    const KIND: RecordKind = RecordKind::Root;

    fn schema() -> &'static RecordSchema {
        &ROOT_SCHEMA
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            ID_ATTRIBUTE => Some(self.id.to_string()),
            "pos_id" => Some(self.pos_id.to_string()),
            "user_id" => Some(self.user_id.to_string()),
            "date" => Some(format_timestamp(&self.date)),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, raw: &str) -> Result<()> {
        let tag = ROOT_SCHEMA.tag;
        match name {
            "pos_id" => self.pos_id = parse_id(tag, "pos_id", raw)?,
            "user_id" => self.user_id = parse_id(tag, "user_id", raw)?,
            "date" => self.date = parse_timestamp(tag, "date", raw)?,
            _ => return Err(ModelError::unknown_field(tag, name)),
        }
        Ok(())
    }

    fn value(&self, name: &str) -> Option<String> {
        match name {
            "value" => Some(self.value.clone()),
            "remarks" => self.remarks.clone(),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, text: Option<String>) -> Result<()> {
        match name {
            "value" => self.value = text.unwrap_or_default(),
            "remarks" => self.remarks = text,
            _ => return Err(ModelError::unknown_field(ROOT_SCHEMA.tag, name)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        require_non_empty(ROOT_SCHEMA.tag, "value", &self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::ids::IdentityRegistry;

    #[test]
    fn coerces_foreign_keys_and_date() {
        let element = Element::new("root")
            .with_attribute("id", "9")
            .with_attribute("pos_id", "2")
            .with_attribute("user_id", "1")
            .with_attribute("date", "1215000000")
            .with_child(Element::new("value").with_text("loop"));
        let root = Root::from_element(&element, &mut IdentityRegistry::new()).unwrap();
        assert_eq!(root.id(), 9);
        assert_eq!(root.pos_id, 2);
        assert_eq!(root.user_id, 1);
        assert_eq!(root.date.timestamp(), 1_215_000_000);
        assert_eq!(root.remarks, None);
    }

    #[test]
    fn bad_foreign_key_is_reported() {
        let element = Element::new("root")
            .with_attribute("id", "9")
            .with_attribute("pos_id", "noun")
            .with_child(Element::new("value").with_text("loop"));
        let err = Root::from_element(&element, &mut IdentityRegistry::new()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidAttribute {
                attribute: "pos_id",
                ..
            }
        ));
    }
}
