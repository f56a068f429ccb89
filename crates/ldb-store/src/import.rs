//! Word-list import.
//!
//! A word list is a UTF-8 text file with one word per line. Blank lines
//! and lines starting with `#` are skipped, as is a leading byte-order
//! mark. Each new word becomes a `todo` surface form credited to a freshly
//! created [`Source`].

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Utc};
use ldb_model::{Source, SurfaceForm, SurfaceFormStatus, now};
use serde::Serialize;
use tracing::{debug, info};

use crate::database::LanguageDatabase;
use crate::error::{DatabaseError, Result};

const UTF8_BOM: char = '\u{feff}';

/// Metadata of the source created for an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub name: String,
    pub description: Option<String>,
    pub user_id: u32,
    pub imported_at: DateTime<Utc>,
}

impl ImportRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            user_id: 0,
            imported_at: now(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_user(mut self, user_id: u32) -> Self {
        self.user_id = user_id;
        self
    }

    #[must_use]
    pub fn with_date(mut self, at: DateTime<Utc>) -> Self {
        self.imported_at = at;
        self
    }
}

/// What an import added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub source_id: u32,
    /// New surface forms.
    pub added: usize,
    /// Words skipped because a surface form with the same value exists.
    pub duplicates: usize,
    /// Skipped comment lines.
    pub comments: usize,
}

/// Import the word list at `path` into `db`.
///
/// Records added before a failure stay in the database.
pub fn import_word_list(
    db: &mut LanguageDatabase,
    path: &Path,
    request: &ImportRequest,
) -> Result<ImportSummary> {
    let file = File::open(path).map_err(|e| DatabaseError::io("read", path, e))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let summary = import_lines(db, BufReader::new(file), &filename, request)
        .map_err(|err| match err {
            ImportError::Read(source) => DatabaseError::io("read", path, source),
            ImportError::Database(err) => err,
        })?;
    info!(
        path = %path.display(),
        source_id = summary.source_id,
        added = summary.added,
        duplicates = summary.duplicates,
        "imported word list"
    );
    Ok(summary)
}

enum ImportError {
    Read(std::io::Error),
    Database(DatabaseError),
}

impl From<DatabaseError> for ImportError {
    fn from(err: DatabaseError) -> Self {
        Self::Database(err)
    }
}

fn import_lines(
    db: &mut LanguageDatabase,
    reader: impl BufRead,
    filename: &str,
    request: &ImportRequest,
) -> std::result::Result<ImportSummary, ImportError> {
    let mut source = Source::new(request.name.as_str())
        .with_filename(filename)
        .with_import_user(request.user_id)
        .with_date(request.imported_at);
    source.description = request.description.clone();
    let source_id = db.add_source(source)?;

    let mut known: HashSet<String> = db
        .surface_forms()
        .iter()
        .map(|sf| sf.value.clone())
        .collect();
    let mut summary = ImportSummary {
        source_id,
        ..ImportSummary::default()
    };

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(ImportError::Read)?;
        let line = if index == 0 {
            line.strip_prefix(UTF8_BOM).unwrap_or(&line)
        } else {
            &line
        };
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        if word.starts_with('#') {
            summary.comments += 1;
            continue;
        }
        if !known.insert(word.to_string()) {
            debug!(line = index + 1, word, "skipping known word");
            summary.duplicates += 1;
            continue;
        }
        db.add_surface_form(
            SurfaceForm::new(word)
                .with_status(SurfaceFormStatus::Todo)
                .with_source(source_id)
                .with_user(request.user_id)
                .with_date(request.imported_at),
        )?;
        summary.added += 1;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldb_model::Record;
    use std::io::Cursor;

    fn request() -> ImportRequest {
        ImportRequest::new("news")
            .with_description("newspaper corpus")
            .with_user(3)
            .with_date(DateTime::<Utc>::UNIX_EPOCH)
    }

    #[test]
    fn skips_blank_comment_and_known_lines() {
        let mut db = LanguageDatabase::new("af");
        db.add_surface_form(SurfaceForm::new("huis")).unwrap();
        let text = "# header\n\nhuis\nkat\n  hond  \nkat\n";

        let summary = import_lines(&mut db, Cursor::new(text), "words.txt", &request())
            .ok()
            .unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                source_id: 1,
                added: 2,
                duplicates: 2,
                comments: 1,
            }
        );
        let values: Vec<_> = db.surface_forms().iter().map(|sf| sf.value.as_str()).collect();
        assert_eq!(values, ["huis", "kat", "hond"]);
    }

    #[test]
    fn byte_order_mark_is_not_part_of_the_first_line() {
        let mut db = LanguageDatabase::new("af");
        let text = "\u{feff}# header comment\nkat\n";

        let summary = import_lines(&mut db, Cursor::new(text), "words.txt", &request())
            .ok()
            .unwrap();

        assert_eq!((summary.added, summary.comments), (1, 1));
        let values: Vec<_> = db.surface_forms().iter().map(|sf| sf.value.as_str()).collect();
        assert_eq!(values, ["kat"]);
    }

    #[test]
    fn byte_order_mark_before_a_word_is_dropped() {
        let mut db = LanguageDatabase::new("af");
        db.add_surface_form(SurfaceForm::new("kat")).unwrap();
        let text = "\u{feff}kat\nhond\n";

        let summary = import_lines(&mut db, Cursor::new(text), "words.txt", &request())
            .ok()
            .unwrap();

        assert_eq!((summary.added, summary.duplicates), (1, 1));
    }

    #[test]
    fn new_forms_point_at_the_source() {
        let mut db = LanguageDatabase::new("af");
        let summary = import_lines(&mut db, Cursor::new("kat\n"), "words.txt", &request())
            .ok()
            .unwrap();

        let source = &db.sources()[0];
        assert_eq!(source.id(), summary.source_id);
        assert_eq!(source.filename, "words.txt");
        assert_eq!(source.import_user_id, 3);
        assert_eq!(source.description.as_deref(), Some("newspaper corpus"));

        let sf = &db.surface_forms()[0];
        assert_eq!(sf.status, SurfaceFormStatus::Todo);
        assert_eq!(sf.source_id, summary.source_id);
        assert_eq!(sf.user_id, 3);
    }
}
