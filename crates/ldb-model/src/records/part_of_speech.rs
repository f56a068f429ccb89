//! Grammatical categories assigned to roots.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::RecordKind;
use crate::schema::{ID_ATTRIBUTE, Record, RecordSchema, require_non_empty, sealed};

pub static PART_OF_SPEECH_SCHEMA: RecordSchema = RecordSchema::new(
    "part_of_speech",
    &[ID_ATTRIBUTE],
    &["name", "shortcut", "remarks"],
);

/// A part of speech, e.g. noun or verb.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartOfSpeech {
    id: u32,
    pub name: String,
    /// Abbreviation or keyboard shortcut; must not be empty when set.
    pub shortcut: Option<String>,
    pub remarks: Option<String>,
}

impl PartOfSpeech {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    #[must_use]
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Propose an id; it is registered when the record joins a database.
    #[must_use]
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }
}

impl sealed::Identified for PartOfSpeech {
    fn id_mut(&mut self) -> &mut u32 {
        &mut self.id
    }
}

impl Record for PartOfSpeech {
    const KIND: RecordKind = RecordKind::PartOfSpeech;

    fn schema() -> &'static RecordSchema {
        &PART_OF_SPEECH_SCHEMA
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            ID_ATTRIBUTE => Some(self.id.to_string()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, _raw: &str) -> Result<()> {
        Err(ModelError::unknown_field(PART_OF_SPEECH_SCHEMA.tag, name))
    }

    fn value(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "shortcut" => self.shortcut.clone(),
            "remarks" => self.remarks.clone(),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, text: Option<String>) -> Result<()> {
        match name {
            "name" => self.name = text.unwrap_or_default(),
            "shortcut" => self.shortcut = text,
            "remarks" => self.remarks = text,
            _ => return Err(ModelError::unknown_field(PART_OF_SPEECH_SCHEMA.tag, name)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let tag = PART_OF_SPEECH_SCHEMA.tag;
        require_non_empty(tag, "name", &self.name)?;
        if let Some(shortcut) = &self.shortcut {
            require_non_empty(tag, "shortcut", shortcut)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::ids::IdentityRegistry;

    #[test]
    fn empty_name_fails_validation() {
        let err = PartOfSpeech::new("").to_element().unwrap_err();
        assert!(matches!(err, ModelError::Validation { tag: "part_of_speech", .. }));
    }

    #[test]
    fn empty_shortcut_fails_validation() {
        let pos = PartOfSpeech::new("noun").with_shortcut("");
        assert!(pos.validate().is_err());
        assert!(PartOfSpeech::new("noun").validate().is_ok());
    }

    #[test]
    fn reads_element_with_missing_optional_values() {
        let element = Element::new("part_of_speech")
            .with_attribute("id", "4")
            .with_child(Element::new("name").with_text("verb"));
        let mut registry = IdentityRegistry::new();
        let pos = PartOfSpeech::from_element(&element, &mut registry).unwrap();
        assert_eq!(pos.id(), 4);
        assert_eq!(pos.name, "verb");
        assert_eq!(pos.shortcut, None);
        assert_eq!(pos.remarks, None);
        assert!(registry.contains(RecordKind::PartOfSpeech, 4));
    }
}
