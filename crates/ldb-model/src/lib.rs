//! Record model for language databases.
//!
//! A language database records surface forms taken from text corpora, the
//! roots they belong to and the parts of speech of those roots. This crate
//! holds the record types and their XML mapping:
//!
//! - `ids` - [`IdentityRegistry`], per-kind identifier allocation
//! - `element` - an owned XML tree read and written with `quick-xml`
//! - `schema` - [`RecordSchema`] and the [`Record`] trait
//! - `records` - [`PartOfSpeech`], [`Root`], [`Source`], [`SurfaceForm`], [`User`]
//! - `status` - [`SurfaceFormStatus`]

pub mod element;
pub mod error;
pub mod ids;
pub mod records;
pub mod schema;
pub mod status;

pub use element::{Element, Node, parse_document, write_document};
pub use error::{ModelError, Result};
pub use ids::{IdentityRegistry, RecordKind, UNASSIGNED_ID};
pub use records::{
    PART_OF_SPEECH_SCHEMA, PartOfSpeech, ROOT_SCHEMA, Root, SOURCE_SCHEMA, SURFACE_FORM_SCHEMA,
    Source, SurfaceForm, USER_SCHEMA, User,
};
pub use schema::{ID_ATTRIBUTE, Record, RecordSchema, format_timestamp, now, parse_id, parse_timestamp};
pub use status::SurfaceFormStatus;
