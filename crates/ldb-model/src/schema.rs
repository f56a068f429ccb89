//! Declarative mapping between records and XML elements.
//!
//! A [`RecordSchema`] names the element tag, the fields written as XML
//! attributes and the fields written as child elements holding text. The
//! [`Record`] trait connects a concrete record type to its schema and does
//! the per-field coercion; the schema drives the conversion itself.

use chrono::{DateTime, TimeZone, Utc};

use crate::element::Element;
use crate::error::{ModelError, Result};
use crate::ids::{IdentityRegistry, RecordKind, UNASSIGNED_ID};

/// Attribute holding the record identifier.
pub const ID_ATTRIBUTE: &str = "id";

pub(crate) mod sealed {
    /// Mutable access to the identifier slot, reserved for the registry.
    pub trait Identified {
        fn id_mut(&mut self) -> &mut u32;
    }
}

/// Element layout of one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    pub tag: &'static str,
    pub attributes: &'static [&'static str],
    pub values: &'static [&'static str],
}

impl RecordSchema {
    pub const fn new(
        tag: &'static str,
        attributes: &'static [&'static str],
        values: &'static [&'static str],
    ) -> Self {
        Self {
            tag,
            attributes,
            values,
        }
    }

    pub fn declares_attribute(&self, name: &str) -> bool {
        self.attributes.contains(&name)
    }

    pub fn declares_value(&self, name: &str) -> bool {
        self.values.contains(&name)
    }

    /// Fail with [`ModelError::TagMismatch`] unless `element` carries this tag.
    pub fn check_tag(&self, element: &Element) -> Result<()> {
        if element.name() == self.tag {
            Ok(())
        } else {
            Err(ModelError::TagMismatch {
                expected: self.tag,
                found: element.name().to_string(),
            })
        }
    }

    /// Validate `record` and build its element.
    ///
    /// Unset value fields are left out; present ones become a child element
    /// holding the text.
    pub fn to_element<R: Record>(&self, record: &R) -> Result<Element> {
        record.validate()?;
        let mut element = Element::new(self.tag);
        for &name in self.attributes {
            let value = record
                .attribute(name)
                .ok_or_else(|| ModelError::unknown_field(self.tag, name))?;
            element.set_attribute(name, value);
        }
        for &name in self.values {
            if let Some(text) = record.value(name) {
                element.push_element(Element::new(name).with_text(text));
            }
        }
        Ok(element)
    }

    /// Overwrite `record` with the contents of `element`.
    ///
    /// The identifier is re-registered with `registry`, releasing whatever id
    /// the record held before. Nothing is modified when any step fails.
    pub fn read_element<R: Record>(
        &self,
        record: &mut R,
        element: &Element,
        registry: &mut IdentityRegistry,
    ) -> Result<()> {
        self.check_tag(element)?;

        let mut staged = record.clone();
        let mut proposed_id = UNASSIGNED_ID;
        for &name in self.attributes {
            let raw = element.attribute(name).unwrap_or_default();
            if name == ID_ATTRIBUTE {
                proposed_id = parse_id(self.tag, ID_ATTRIBUTE, raw)?;
            } else {
                staged.set_attribute(name, raw)?;
            }
        }
        for &name in self.values {
            let text = element.child(name).map(Element::text);
            staged.set_value(name, text)?;
        }
        staged.validate()?;

        registry.assign(&mut staged, proposed_id)?;
        *record = staged;
        Ok(())
    }
}

/// A typed record stored as one XML element.
///
/// Implemented by the five record variants of a language database.
pub trait Record: sealed::Identified + Clone + std::fmt::Debug {
    const KIND: RecordKind;

    fn schema() -> &'static RecordSchema;

    fn id(&self) -> u32;

    /// String form of an attribute field, as written to XML.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Coerce and store a raw attribute value. `id` never reaches here.
    fn set_attribute(&mut self, name: &str, raw: &str) -> Result<()>;

    /// Text of a value field, `None` when unset.
    fn value(&self, name: &str) -> Option<String>;

    fn set_value(&mut self, name: &str, text: Option<String>) -> Result<()>;

    /// Check the record's invariants.
    fn validate(&self) -> Result<()>;

    /// Identity used for collection de-duplication.
    fn same_record(&self, other: &Self) -> bool {
        self.id() != UNASSIGNED_ID && self.id() == other.id()
    }

    /// Any schema field by name, in its serialized form.
    fn field(&self, name: &str) -> Option<String> {
        let schema = Self::schema();
        if schema.declares_attribute(name) {
            self.attribute(name)
        } else if schema.declares_value(name) {
            self.value(name)
        } else {
            None
        }
    }

    fn to_element(&self) -> Result<Element> {
        Self::schema().to_element(self)
    }

    fn from_element(element: &Element, registry: &mut IdentityRegistry) -> Result<Self>
    where
        Self: Default,
    {
        let mut record = Self::default();
        Self::schema().read_element(&mut record, element, registry)?;
        Ok(record)
    }
}

/// Parse an identifier or foreign key; an empty value means unassigned.
pub fn parse_id(tag: &'static str, attribute: &'static str, raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(UNASSIGNED_ID);
    }
    trimmed.parse().map_err(|_| ModelError::InvalidAttribute {
        tag,
        attribute,
        value: raw.to_string(),
    })
}

/// Parse a Unix timestamp in seconds. Fractions are truncated and an empty
/// value reads as the epoch.
pub fn parse_timestamp(
    tag: &'static str,
    attribute: &'static str,
    raw: &str,
) -> Result<DateTime<Utc>> {
    let invalid = || ModelError::InvalidAttribute {
        tag,
        attribute,
        value: raw.to_string(),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DateTime::<Utc>::UNIX_EPOCH);
    }
    let seconds = match trimmed.parse::<i64>() {
        Ok(seconds) => seconds,
        Err(_) => {
            let fractional: f64 = trimmed.parse().map_err(|_| invalid())?;
            if !fractional.is_finite() {
                return Err(invalid());
            }
            fractional.trunc() as i64
        }
    };
    Utc.timestamp_opt(seconds, 0).single().ok_or_else(invalid)
}

pub fn format_timestamp(date: &DateTime<Utc>) -> String {
    date.timestamp().to_string()
}

/// Current time truncated to whole seconds, the resolution stored on disk.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_opt(now.timestamp(), 0).single().unwrap_or(now)
}

pub(crate) fn require_non_empty(tag: &'static str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ModelError::validation(tag, format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}
