//! Loading, saving and searching language database files.

use std::fs;

use chrono::{DateTime, Utc};
use ldb_model::{ModelError, PartOfSpeech, Record, Root, SurfaceForm, SurfaceFormStatus, User};
use ldb_store::{
    DatabaseError, DatabaseOptions, FormatWarning, ImportRequest, LanguageDatabase, Query,
    Section, import_word_list,
};
use tempfile::tempdir;

const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<language_database lang="af">
  <parts_of_speech>
    <part_of_speech id="1">
      <name>noun</name>
      <shortcut>n</shortcut>
    </part_of_speech>
  </parts_of_speech>
  <roots>
    <root id="1" pos_id="1" user_id="1" date="1700000000">
      <value>huis</value>
    </root>
  </roots>
  <sources>
    <source id="1" date="1700000000" import_user_id="1">
      <name>news</name>
      <filename>words.txt</filename>
    </source>
  </sources>
  <surface_forms>
    <!-- imported from words.txt -->
    <surface_form id="5" user_id="1" date="1700000000" source_id="1" root_id="1">
      <value>huise</value>
      <status>classified</status>
    </surface_form>
    <surface_form id="6" user_id="1" date="1700000000" source_id="1" root_id="0">
      <value>loop</value>
      <status>todo</status>
    </surface_form>
  </surface_forms>
  <users>
    <user id="1">
      <name>annotator</name>
    </user>
  </users>
</language_database>
"#;

fn load(xml: &str) -> LanguageDatabase {
    LanguageDatabase::from_xml(xml.as_bytes(), DatabaseOptions::default())
        .unwrap()
        .into_strict()
        .unwrap()
}

#[test]
fn loads_every_section() {
    let db = load(SAMPLE);
    assert_eq!(db.lang(), "af");
    assert_eq!(db.parts_of_speech().len(), 1);
    assert_eq!(db.roots().len(), 1);
    assert_eq!(db.sources().len(), 1);
    assert_eq!(db.surface_forms().len(), 2);
    assert_eq!(db.users().len(), 1);

    let sf = db.get::<SurfaceForm>(5).unwrap();
    assert_eq!(sf.status, SurfaceFormStatus::Classified);
    assert_eq!(db.root_of(sf).unwrap().unwrap().value, "huis");
    assert_eq!(db.source_of(sf).unwrap().unwrap().name, "news");
    assert_eq!(db.user_of(sf).unwrap().unwrap().name, "annotator");
    let root = db.get::<Root>(1).unwrap();
    assert_eq!(db.part_of_speech_of(root).unwrap().unwrap().name, "noun");
}

#[test]
fn loading_twice_gives_equal_records() {
    let first = load(SAMPLE);
    let second = load(SAMPLE);
    assert_eq!(first.surface_forms(), second.surface_forms());
    assert_eq!(first.roots(), second.roots());
    assert_eq!(first.document(), second.document());
}

#[test]
fn save_is_idempotent() {
    let mut db = load(SAMPLE);
    let first = db.to_xml().unwrap();
    let mut reloaded =
        LanguageDatabase::from_xml(&first, DatabaseOptions::default()).unwrap().into_strict().unwrap();
    let second = reloaded.to_xml().unwrap();
    assert_eq!(String::from_utf8(first).unwrap(), String::from_utf8(second).unwrap());
}

#[test]
fn comments_survive_a_round_trip() {
    let mut db = load(SAMPLE);
    let xml = String::from_utf8(db.to_xml().unwrap()).unwrap();
    assert!(xml.contains("<!-- imported from words.txt -->"));
}

#[test]
fn missing_section_is_a_warning() {
    let xml = SAMPLE.replace(
        "  <users>\n    <user id=\"1\">\n      <name>annotator</name>\n    </user>\n  </users>\n",
        "",
    );
    let outcome = LanguageDatabase::from_xml(xml.as_bytes(), DatabaseOptions::default()).unwrap();
    assert_eq!(outcome.warnings, vec![FormatWarning::MissingSection(Section::Users)]);
    assert!(outcome.database.users().is_empty());
    assert!(outcome.database.document().child("users").is_some());

    let err = outcome.into_strict().unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::MissingSection {
            section: Section::Users
        }
    ));
}

#[test]
fn wrong_root_tag_is_a_format_error() {
    let err = LanguageDatabase::from_xml(b"<dictionary lang=\"af\"/>", DatabaseOptions::default())
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Format { .. }));
}

#[test]
fn missing_language_is_a_format_error() {
    let err = LanguageDatabase::from_xml(b"<language_database/>", DatabaseOptions::default())
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Format { .. }));
    assert!(err.suggestion().is_some());
}

#[test]
fn duplicate_ids_in_file_are_rejected() {
    let xml = SAMPLE.replace("surface_form id=\"6\"", "surface_form id=\"5\"");
    let err = LanguageDatabase::from_xml(xml.as_bytes(), DatabaseOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Model(ModelError::DuplicateIdentifier { id: 5, .. })
    ));
}

#[test]
fn element_without_id_does_not_take_a_declared_id() {
    let xml = SAMPLE.replace(
        "    <user id=\"1\">",
        "    <user>\n      <name>guest</name>\n    </user>\n    <user id=\"1\">",
    );
    let db = load(&xml);

    let users: Vec<_> = db
        .users()
        .iter()
        .map(|user| (user.id(), user.name.as_str()))
        .collect();
    assert_eq!(users, [(2, "guest"), (1, "annotator")]);
}

#[test]
fn new_records_continue_after_loaded_ids() {
    let mut db = load(SAMPLE);
    let id = db.add_surface_form(SurfaceForm::new("kat")).unwrap();
    assert_eq!(id, 7);
}

#[test]
fn find_matches_any_pair_by_default() {
    let db = load(SAMPLE);
    let query = Query::new()
        .in_section_named("surface_forms")
        .field("value", "loop")
        .field("status", "classified");
    let ids: Vec<_> = db.find(&query).iter().map(|found| found.id()).collect();
    assert_eq!(ids, [5, 6]);

    let all = db.find(&query.match_all());
    assert!(all.is_empty());
}

#[test]
fn select_returns_typed_records() {
    let db = load(SAMPLE);
    let todo = db.select::<SurfaceForm>(&Query::new().field("status", "todo"));
    assert_eq!(todo.len(), 1);
    assert_eq!(todo[0].value, "loop");
}

#[test]
fn dangling_part_of_speech_surfaces_at_lookup() {
    let xml = SAMPLE.replace("pos_id=\"1\"", "pos_id=\"9\"");
    let db = load(&xml);
    let root = db.get::<Root>(1).unwrap();
    assert!(matches!(
        db.part_of_speech_of(root),
        Err(DatabaseError::MissingReference {
            section: Section::PartsOfSpeech,
            id: 9
        })
    ));
}

#[test]
fn save_and_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("af.xldb");

    let mut db = load(SAMPLE);
    db.get_mut::<SurfaceForm>(6)
        .unwrap()
        .reject(DateTime::<Utc>::UNIX_EPOCH);
    assert_eq!(db.save(Some(&path)).unwrap(), path);
    assert_eq!(db.path(), Some(path.as_path()));

    let reopened = LanguageDatabase::open(&path).unwrap().into_strict().unwrap();
    let sf = reopened.get::<SurfaceForm>(6).unwrap();
    assert_eq!(sf.status, SurfaceFormStatus::Rejected);
    assert_eq!(sf.date, DateTime::<Utc>::UNIX_EPOCH);
    assert_eq!(
        reopened.to_string(),
        format!(
            "LanguageDatabase[lang=\"af\"][file=\"{}\"][POS 1|R 1|SRC 1|SF 2|U 1]",
            path.display()
        )
    );
}

#[test]
fn failed_save_keeps_previous_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("af.xldb");
    fs::write(&path, SAMPLE).unwrap();

    let mut db = LanguageDatabase::open(&path).unwrap().into_strict().unwrap();
    // An empty name fails validation while the document is regenerated.
    db.get_mut::<User>(1).unwrap().name.clear();
    assert!(db.save(None).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn opening_a_missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = LanguageDatabase::open(&dir.path().join("absent.xldb")).unwrap_err();
    assert!(matches!(err, DatabaseError::Io { .. }));
}

#[test]
fn fresh_database_serializes_to_a_skeleton() {
    let mut db = LanguageDatabase::new("af");
    db.add_part_of_speech(PartOfSpeech::new("noun").with_shortcut("n"))
        .unwrap();
    db.add_surface_form(SurfaceForm::new("huis").with_date(DateTime::<Utc>::UNIX_EPOCH))
        .unwrap();
    let xml = String::from_utf8(db.to_xml().unwrap()).unwrap();
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<language_database lang="af">
  <parts_of_speech>
    <part_of_speech id="1">
      <name>noun</name>
      <shortcut>n</shortcut>
    </part_of_speech>
  </parts_of_speech>
  <roots/>
  <sources/>
  <surface_forms>
    <surface_form id="1" user_id="0" date="0" source_id="0" root_id="0">
      <value>huis</value>
      <status>todo</status>
    </surface_form>
  </surface_forms>
  <users/>
</language_database>
"#);
}

#[test]
fn import_word_list_adds_todo_forms() {
    let dir = tempdir().unwrap();
    let words = dir.path().join("corpus.txt");
    fs::write(&words, "# corpus\nloop\nkat\n\nhond\n").unwrap();

    let mut db = load(SAMPLE);
    let summary = import_word_list(
        &mut db,
        &words,
        &ImportRequest::new("corpus").with_user(1),
    )
    .unwrap();

    assert_eq!(summary.source_id, 2);
    assert_eq!((summary.added, summary.duplicates, summary.comments), (2, 1, 1));
    let source = db.get::<ldb_model::Source>(2).unwrap();
    assert_eq!(source.filename, "corpus.txt");
    assert_eq!(source.id(), 2);
    assert_eq!(db.next_todo().unwrap().value, "loop");
}
