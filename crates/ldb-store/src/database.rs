//! The language database aggregate.
//!
//! A [`LanguageDatabase`] owns one collection per section and the XML tree
//! they are persisted in. Adds write through to both; `save` regenerates
//! every record element from the live records first, so fields changed in
//! place through [`LanguageDatabase::get_mut`] are persisted as well.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use ldb_model::{
    Element, ID_ATTRIBUTE, IdentityRegistry, Node, PartOfSpeech, Record, Root, Source,
    SurfaceForm, UNASSIGNED_ID, User, parse_document, parse_id, write_document,
};
use tracing::{debug, info, warn};

use crate::error::{DatabaseError, Result};
use crate::io::{read_file, write_atomic};
use crate::query::{Query, RecordRef};
use crate::section::Section;

/// Default extension of language database files.
pub const FILE_EXTENSION: &str = "xldb";

/// Tag of the document's root element.
pub const ROOT_TAG: &str = "language_database";

/// Required attribute holding the language code.
pub const LANG_ATTRIBUTE: &str = "lang";

/// Behaviour switches for a database instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseOptions {
    /// Refuse a surface form whose value and root match an existing one.
    pub unique_surface_forms: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            unique_surface_forms: true,
        }
    }
}

/// A recoverable problem found while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatWarning {
    /// The section element was absent; an empty one was created.
    MissingSection(Section),
}

impl FormatWarning {
    pub fn into_error(self) -> DatabaseError {
        match self {
            Self::MissingSection(section) => DatabaseError::MissingSection { section },
        }
    }
}

impl fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSection(section) => write!(f, "no top-level <{}> element", section.tag()),
        }
    }
}

/// A loaded database and the warnings raised while loading it.
#[derive(Debug)]
pub struct LoadOutcome {
    pub database: LanguageDatabase,
    pub warnings: Vec<FormatWarning>,
}

impl LoadOutcome {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Treat the first warning as fatal.
    pub fn into_strict(self) -> Result<LanguageDatabase> {
        match self.warnings.into_iter().next() {
            Some(warning) => Err(warning.into_error()),
            None => Ok(self.database),
        }
    }
}

pub(crate) mod sealed {
    use super::LanguageDatabase;

    pub trait Collection: Sized {
        fn records(db: &LanguageDatabase) -> &Vec<Self>;
        fn records_mut(db: &mut LanguageDatabase) -> &mut Vec<Self>;
    }
}

/// A record type stored in one of the database sections.
pub trait SectionRecord: Record + Default + sealed::Collection {
    const SECTION: Section;

    fn as_record_ref(&self) -> RecordRef<'_>;

    /// Whether `self` may not be added next to `existing`.
    fn conflicts_with(&self, existing: &Self, _options: &DatabaseOptions) -> bool {
        self.same_record(existing)
    }
}

macro_rules! section_record {
    ($record:ty, $section:expr, $field:ident, $variant:ident) => {
        impl sealed::Collection for $record {
            fn records(db: &LanguageDatabase) -> &Vec<Self> {
                &db.$field
            }

            fn records_mut(db: &mut LanguageDatabase) -> &mut Vec<Self> {
                &mut db.$field
            }
        }

        impl SectionRecord for $record {
            const SECTION: Section = $section;

            fn as_record_ref(&self) -> RecordRef<'_> {
                RecordRef::$variant(self)
            }
        }
    };
}

section_record!(PartOfSpeech, Section::PartsOfSpeech, parts_of_speech, PartOfSpeech);
section_record!(Root, Section::Roots, roots, Root);
section_record!(Source, Section::Sources, sources, Source);
section_record!(User, Section::Users, users, User);

impl sealed::Collection for SurfaceForm {
    fn records(db: &LanguageDatabase) -> &Vec<Self> {
        &db.surface_forms
    }

    fn records_mut(db: &mut LanguageDatabase) -> &mut Vec<Self> {
        &mut db.surface_forms
    }
}

impl SectionRecord for SurfaceForm {
    const SECTION: Section = Section::SurfaceForms;

    fn as_record_ref(&self) -> RecordRef<'_> {
        RecordRef::SurfaceForm(self)
    }

    fn conflicts_with(&self, existing: &Self, options: &DatabaseOptions) -> bool {
        self.same_record(existing) || (options.unique_surface_forms && self.same_word(existing))
    }
}

/// An XML-backed language database.
#[derive(Debug, Clone)]
pub struct LanguageDatabase {
    lang: String,
    path: Option<PathBuf>,
    options: DatabaseOptions,
    document: Element,
    registry: IdentityRegistry,
    parts_of_speech: Vec<PartOfSpeech>,
    roots: Vec<Root>,
    sources: Vec<Source>,
    surface_forms: Vec<SurfaceForm>,
    users: Vec<User>,
}

impl LanguageDatabase {
    /// Create an empty database for the language `lang`.
    pub fn new(lang: impl Into<String>) -> Self {
        Self::with_options(lang, DatabaseOptions::default())
    }

    pub fn with_options(lang: impl Into<String>, options: DatabaseOptions) -> Self {
        let lang = lang.into();
        let mut document = Element::new(ROOT_TAG).with_attribute(LANG_ATTRIBUTE, lang.as_str());
        for section in Section::ALL {
            document.push_element(Element::new(section.tag()));
        }
        Self::empty(lang, options, document)
    }

    fn empty(lang: String, options: DatabaseOptions, document: Element) -> Self {
        Self {
            lang,
            path: None,
            options,
            document,
            registry: IdentityRegistry::new(),
            parts_of_speech: Vec::new(),
            roots: Vec::new(),
            sources: Vec::new(),
            surface_forms: Vec::new(),
            users: Vec::new(),
        }
    }

    /// Load a database file.
    pub fn open(path: &Path) -> Result<LoadOutcome> {
        Self::open_with(path, DatabaseOptions::default())
    }

    pub fn open_with(path: &Path, options: DatabaseOptions) -> Result<LoadOutcome> {
        let bytes = read_file(path)?;
        let mut outcome = Self::from_xml(&bytes, options)?;
        outcome.database.path = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            lang = %outcome.database.lang,
            warnings = outcome.warnings.len(),
            "loaded language database"
        );
        Ok(outcome)
    }

    /// Load a database from serialized XML.
    pub fn from_xml(bytes: &[u8], options: DatabaseOptions) -> Result<LoadOutcome> {
        Self::from_document(parse_document(bytes)?, options)
    }

    /// Load a database from a parsed document.
    pub fn from_document(mut document: Element, options: DatabaseOptions) -> Result<LoadOutcome> {
        if document.name() != ROOT_TAG {
            return Err(DatabaseError::format(format!(
                "invalid root tag: {}",
                document.name()
            )));
        }
        let lang = document
            .attribute(LANG_ATTRIBUTE)
            .ok_or_else(|| DatabaseError::format("no language code specified"))?
            .to_string();

        let mut warnings = Vec::new();
        for section in Section::ALL {
            if document.child(section.tag()).is_none() {
                warn!(section = %section, "missing section, creating an empty one");
                document.push_element(Element::new(section.tag()));
                warnings.push(FormatWarning::MissingSection(section));
            }
        }

        let mut database = Self::empty(lang, options, document);
        database.load_section::<PartOfSpeech>()?;
        database.load_section::<Root>()?;
        database.load_section::<Source>()?;
        database.load_section::<SurfaceForm>()?;
        database.load_section::<User>()?;

        Ok(LoadOutcome { database, warnings })
    }

    fn load_section<R: SectionRecord>(&mut self) -> Result<()> {
        let section = R::SECTION;
        let nodes = match self.document.child_mut(section.tag()) {
            Some(element) => std::mem::take(element.children_mut()),
            None => return Err(DatabaseError::MissingSection { section }),
        };

        // Claim declared ids first; elements without one get fresh ids above them.
        let mut explicit = Vec::with_capacity(nodes.len());
        for node in &nodes {
            if let Node::Element(element) = node {
                let raw = element.attribute(ID_ATTRIBUTE).unwrap_or_default();
                let id = parse_id(R::KIND.tag(), ID_ATTRIBUTE, raw)?;
                if id != UNASSIGNED_ID {
                    self.registry.allocate_or_validate(R::KIND, id)?;
                }
                explicit.push(id);
            }
        }

        let mut explicit = explicit.into_iter();
        let mut kept = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                Node::Element(element) => {
                    if let Some(id) = explicit.next()
                        && id != UNASSIGNED_ID
                    {
                        self.registry.release(R::KIND, id);
                    }
                    let record = R::from_element(&element, &mut self.registry)?;
                    kept.push(Node::Element(record.to_element()?));
                    R::records_mut(self).push(record);
                }
                Node::Text(text) if text.trim().is_empty() => {}
                other => kept.push(other),
            }
        }

        if let Some(element) = self.document.child_mut(section.tag()) {
            *element.children_mut() = kept;
        }
        debug!(section = %section, count = R::records(self).len(), "loaded section");
        Ok(())
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn set_lang(&mut self, lang: impl Into<String>) {
        self.lang = lang.into();
    }

    /// File the database was loaded from or last saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn options(&self) -> DatabaseOptions {
        self.options
    }

    /// The backing XML tree as of the last add, load or save.
    pub fn document(&self) -> &Element {
        &self.document
    }

    pub fn parts_of_speech(&self) -> &[PartOfSpeech] {
        &self.parts_of_speech
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn surface_forms(&self) -> &[SurfaceForm] {
        &self.surface_forms
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn records<R: SectionRecord>(&self) -> &[R] {
        R::records(self)
    }

    pub fn get<R: SectionRecord>(&self, id: u32) -> Option<&R> {
        R::records(self).iter().find(|record| record.id() == id)
    }

    /// Mutable access for in-place edits; persisted on the next save.
    pub fn get_mut<R: SectionRecord>(&mut self, id: u32) -> Option<&mut R> {
        R::records_mut(self)
            .iter_mut()
            .find(|record| record.id() == id)
    }

    /// Add `record` to its section and return its id.
    ///
    /// A zero id is replaced with a fresh one. Nothing changes on failure.
    pub fn add<R: SectionRecord>(&mut self, mut record: R) -> Result<u32> {
        let section = R::SECTION;
        let options = self.options;
        if R::records(self)
            .iter()
            .any(|existing| record.conflicts_with(existing, &options))
        {
            return Err(DatabaseError::DuplicateModel {
                section,
                id: record.id(),
            });
        }
        if self.document.child(section.tag()).is_none() {
            return Err(DatabaseError::MissingSection { section });
        }
        record.validate()?;

        let id = self.registry.register(&mut record)?;
        let element = match record.to_element() {
            Ok(element) => element,
            Err(err) => {
                self.registry.release(R::KIND, id);
                return Err(err.into());
            }
        };
        if let Some(section_element) = self.document.child_mut(section.tag()) {
            section_element.push_element(element);
        }
        R::records_mut(self).push(record);
        debug!(section = %section, id, "added record");
        Ok(id)
    }

    pub fn add_part_of_speech(&mut self, pos: PartOfSpeech) -> Result<u32> {
        self.add(pos)
    }

    pub fn add_root(&mut self, root: Root) -> Result<u32> {
        self.add(root)
    }

    pub fn add_source(&mut self, source: Source) -> Result<u32> {
        self.add(source)
    }

    pub fn add_surface_form(&mut self, surface_form: SurfaceForm) -> Result<u32> {
        self.add(surface_form)
    }

    pub fn add_user(&mut self, user: User) -> Result<u32> {
        self.add(user)
    }

    /// Search the queried sections, in section then collection order.
    pub fn find(&self, query: &Query) -> Vec<RecordRef<'_>> {
        let mut matches = Vec::new();
        for section in query.sections() {
            match section {
                Section::PartsOfSpeech => collect(&self.parts_of_speech, query, &mut matches),
                Section::Roots => collect(&self.roots, query, &mut matches),
                Section::Sources => collect(&self.sources, query, &mut matches),
                Section::SurfaceForms => collect(&self.surface_forms, query, &mut matches),
                Section::Users => collect(&self.users, query, &mut matches),
            }
        }
        matches
    }

    /// Typed search within the section of `R`; the query's section is ignored.
    pub fn select<R: SectionRecord>(&self, query: &Query) -> Vec<&R> {
        R::records(self)
            .iter()
            .filter(|record| query.matches(*record))
            .collect()
    }

    /// Follow a foreign key. Zero means "not set" and yields `None`.
    pub fn resolve<R: SectionRecord>(&self, id: u32) -> Result<Option<&R>> {
        if id == UNASSIGNED_ID {
            return Ok(None);
        }
        self.get::<R>(id)
            .map(Some)
            .ok_or(DatabaseError::MissingReference {
                section: R::SECTION,
                id,
            })
    }

    pub fn root_of(&self, surface_form: &SurfaceForm) -> Result<Option<&Root>> {
        self.resolve(surface_form.root_id)
    }

    pub fn source_of(&self, surface_form: &SurfaceForm) -> Result<Option<&Source>> {
        self.resolve(surface_form.source_id)
    }

    pub fn part_of_speech_of(&self, root: &Root) -> Result<Option<&PartOfSpeech>> {
        self.resolve(root.pos_id)
    }

    /// The annotator credited on `surface_form`.
    pub fn user_of(&self, surface_form: &SurfaceForm) -> Result<Option<&User>> {
        self.resolve(surface_form.user_id)
    }

    pub fn user(&self, id: u32) -> Result<Option<&User>> {
        self.resolve(id)
    }

    /// Rebuild every record element from the live records.
    ///
    /// Fails with [`DatabaseError::UnknownModel`] when an element has no
    /// record or a record has no element. Both mean the document and the
    /// collections went out of step, which `add` and loading never do.
    pub fn sync_document(&mut self) -> Result<()> {
        self.document
            .set_attribute(LANG_ATTRIBUTE, self.lang.as_str());
        self.sync_section::<PartOfSpeech>()?;
        self.sync_section::<Root>()?;
        self.sync_section::<Source>()?;
        self.sync_section::<SurfaceForm>()?;
        self.sync_section::<User>()?;
        Ok(())
    }

    fn sync_section<R: SectionRecord>(&mut self) -> Result<()> {
        let section = R::SECTION;
        let mut fresh: HashMap<u32, Element> = HashMap::with_capacity(R::records(self).len());
        for record in R::records(self) {
            fresh.insert(record.id(), record.to_element()?);
        }

        let section_element = self
            .document
            .child_mut(section.tag())
            .ok_or(DatabaseError::MissingSection { section })?;
        for element in section_element.child_elements_mut() {
            let id = element
                .attribute(ID_ATTRIBUTE)
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(UNASSIGNED_ID);
            *element = fresh
                .remove(&id)
                .ok_or(DatabaseError::UnknownModel { section, id })?;
        }
        if let Some(&id) = fresh.keys().min() {
            return Err(DatabaseError::UnknownModel { section, id });
        }
        Ok(())
    }

    /// Serialize the whole database as UTF-8 XML.
    pub fn to_xml(&mut self) -> Result<Vec<u8>> {
        self.sync_document()?;
        Ok(write_document(&self.document)?)
    }

    /// Write the database to `path`, or to the file it came from.
    ///
    /// The document is serialized before the file is touched and replaced
    /// atomically, so a failed save leaves the previous file intact.
    pub fn save(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => self.path.clone().ok_or(DatabaseError::MissingFilename)?,
        };
        let bytes = self.to_xml()?;
        write_atomic(&target, &bytes)?;
        info!(path = %target.display(), "saved language database");
        self.path = Some(target.clone());
        Ok(target)
    }

    /// One-line description, the same text as `Display`.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// Record count per section, in document order.
    pub fn counts(&self) -> [(Section, usize); 5] {
        [
            (Section::PartsOfSpeech, self.parts_of_speech.len()),
            (Section::Roots, self.roots.len()),
            (Section::Sources, self.sources.len()),
            (Section::SurfaceForms, self.surface_forms.len()),
            (Section::Users, self.users.len()),
        ]
    }
}

fn collect<'a, R: SectionRecord>(records: &'a [R], query: &Query, out: &mut Vec<RecordRef<'a>>) {
    out.extend(
        records
            .iter()
            .filter(|record| query.matches(*record))
            .map(R::as_record_ref),
    );
}

impl fmt::Display for LanguageDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageDatabase[lang=\"{}\"]", self.lang)?;
        match &self.path {
            Some(path) => write!(f, "[file=\"{}\"]", path.display())?,
            None => f.write_str("[no file]")?,
        }
        write!(
            f,
            "[POS {}|R {}|SRC {}|SF {}|U {}]",
            self.parts_of_speech.len(),
            self.roots.len(),
            self.sources.len(),
            self.surface_forms.len(),
            self.users.len()
        )
    }
}
