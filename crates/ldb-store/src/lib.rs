//! XML-backed language databases.
//!
//! A [`LanguageDatabase`] keeps five sections of records (parts of speech,
//! roots, sources, surface forms and users) together with the XML document
//! they are stored in.
//!
//! # File Format
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <language_database lang="af">
//!   <parts_of_speech>...</parts_of_speech>
//!   <roots>...</roots>
//!   <sources>...</sources>
//!   <surface_forms>...</surface_forms>
//!   <users>...</users>
//! </language_database>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ldb_store::{LanguageDatabase, Query, Section};
//!
//! let mut db = LanguageDatabase::open(Path::new("af.xldb"))?.into_strict()?;
//! let todo = db.find(&Query::new().in_section(Section::SurfaceForms).field("status", "todo"));
//! db.save(None)?;
//! ```
//!
//! # Architecture
//!
//! - `database.rs` - the aggregate: load, add, find, resolve, save
//! - `annotate.rs` - classification workflow helpers
//! - `import.rs` - word-list importer
//! - `config.rs` - [`EditorConfig`]
//! - `io/` - file reading and atomic writes
//! - `error.rs` - error types with user-friendly messages

mod annotate;
mod config;
mod database;
mod error;
mod import;
mod io;
mod query;
mod section;

pub use config::{CONFIG_FILE_NAME, EditorConfig};
pub use database::{
    DatabaseOptions, FILE_EXTENSION, FormatWarning, LANG_ATTRIBUTE, LanguageDatabase,
    LoadOutcome, ROOT_TAG, SectionRecord,
};
pub use error::{DatabaseError, Result};
pub use import::{ImportRequest, ImportSummary, import_word_list};
pub use query::{MatchMode, Query, RecordRef};
pub use section::Section;
