//! The five record variants of a language database.

mod part_of_speech;
mod root;
mod source;
mod surface_form;
mod user;

pub use part_of_speech::{PART_OF_SPEECH_SCHEMA, PartOfSpeech};
pub use root::{ROOT_SCHEMA, Root};
pub use source::{SOURCE_SCHEMA, Source};
pub use surface_form::{SURFACE_FORM_SCHEMA, SurfaceForm};
pub use user::{USER_SCHEMA, User};
