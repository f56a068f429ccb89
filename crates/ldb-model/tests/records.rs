//! Round-trip and identity tests for the record variants.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use ldb_model::{
    Element, IdentityRegistry, ModelError, PartOfSpeech, Record, RecordKind, Root, Source,
    SurfaceForm, SurfaceFormStatus, User, parse_document, write_document,
};

fn date(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).single().unwrap()
}

fn round_trip<R: Record + Default>(record: &R) -> R {
    let element = record.to_element().expect("to_element");
    let bytes = write_document(&element).expect("write");
    let parsed = parse_document(&bytes).expect("parse");
    R::from_element(&parsed, &mut IdentityRegistry::new()).expect("from_element")
}

#[test]
fn every_variant_round_trips() {
    let pos = PartOfSpeech::new("noun")
        .with_shortcut("n")
        .with_remarks("")
        .with_id(1);
    assert_eq!(round_trip(&pos), pos);

    let root = Root::new("loop")
        .with_part_of_speech(1)
        .with_user(2)
        .with_date(date(1_215_000_000))
        .with_id(3);
    assert_eq!(round_trip(&root), root);

    let source = Source::new("Corpus")
        .with_filename("corpus.txt")
        .with_description("News & views <2008>")
        .with_import_user(2)
        .with_date(date(1_215_000_100))
        .with_id(4);
    assert_eq!(round_trip(&source), source);

    let sf = SurfaceForm::new("loops")
        .with_status(SurfaceFormStatus::Classified)
        .with_user(2)
        .with_source(4)
        .with_root(3)
        .with_date(date(1_215_000_200))
        .with_id(5);
    assert_eq!(round_trip(&sf), sf);

    let user = User::new("annotator").with_id(2);
    assert_eq!(round_trip(&user), user);
}

#[test]
fn element_layout_follows_schema() {
    let root = Root::new("loop").with_date(date(7)).with_id(3);
    let element = root.to_element().unwrap();
    assert_eq!(element.name(), "root");
    let attributes: Vec<_> = element.attributes().collect();
    assert_eq!(
        attributes,
        vec![("id", "3"), ("pos_id", "0"), ("user_id", "0"), ("date", "7")]
    );
    assert_eq!(element.child("value").unwrap().text(), "loop");
    assert!(element.child("remarks").is_none());
}

#[test]
fn tag_mismatch_is_rejected() {
    let element = Element::new("root").with_attribute("id", "1");
    let err = User::from_element(&element, &mut IdentityRegistry::new()).unwrap_err();
    assert!(matches!(
        err,
        ModelError::TagMismatch {
            expected: "user",
            ..
        }
    ));
}

#[test]
fn rereading_a_record_releases_its_previous_id() {
    let mut registry = IdentityRegistry::new();
    let first = Element::new("user")
        .with_attribute("id", "1")
        .with_child(Element::new("name").with_text("a"));
    let second = Element::new("user")
        .with_attribute("id", "2")
        .with_child(Element::new("name").with_text("b"));

    let mut user = User::from_element(&first, &mut registry).unwrap();
    User::schema()
        .read_element(&mut user, &second, &mut registry)
        .unwrap();

    assert_eq!(user.id(), 2);
    assert_eq!(user.name, "b");
    assert!(!registry.contains(RecordKind::User, 1));
    assert!(registry.contains(RecordKind::User, 2));
}

#[test]
fn failed_reread_keeps_record_and_registration() {
    let mut registry = IdentityRegistry::new();
    let first = Element::new("user")
        .with_attribute("id", "1")
        .with_child(Element::new("name").with_text("a"));
    let mut user = User::from_element(&first, &mut registry).unwrap();
    registry.allocate_or_validate(RecordKind::User, 2).unwrap();

    let clash = Element::new("user")
        .with_attribute("id", "2")
        .with_child(Element::new("name").with_text("b"));
    let err = User::schema()
        .read_element(&mut user, &clash, &mut registry)
        .unwrap_err();

    assert!(matches!(err, ModelError::DuplicateIdentifier { id: 2, .. }));
    assert_eq!(user.id(), 1);
    assert_eq!(user.name, "a");
    assert!(registry.contains(RecordKind::User, 1));
}

#[test]
fn missing_id_attribute_allocates_one() {
    let mut registry = IdentityRegistry::new();
    registry.allocate_or_validate(RecordKind::User, 10).unwrap();
    let element = Element::new("user").with_child(Element::new("name").with_text("new"));
    let user = User::from_element(&element, &mut registry).unwrap();
    assert_eq!(user.id(), 11);
}

#[test]
fn records_serialize_to_json() {
    let sf = SurfaceForm::new("hello").with_date(date(0)).with_id(5);
    let json = serde_json::to_value(&sf).unwrap();
    assert_eq!(json["value"], "hello");
    assert_eq!(json["status"], "todo");
}

fn word() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z '&<>-]{0,20}"
}

proptest! {
    #[test]
    fn surface_forms_round_trip(
        value in word(),
        status in prop::sample::select(SurfaceFormStatus::ALL.to_vec()),
        id in 1u32..10_000,
        user_id in 0u32..100,
        source_id in 0u32..100,
        root_id in 0u32..100,
        seconds in 0i64..4_000_000_000,
    ) {
        let sf = SurfaceForm::new(value)
            .with_status(status)
            .with_user(user_id)
            .with_source(source_id)
            .with_root(root_id)
            .with_date(date(seconds))
            .with_id(id);
        prop_assert_eq!(round_trip(&sf), sf);
    }

    #[test]
    fn parts_of_speech_round_trip(
        name in word(),
        shortcut in prop::option::of("[a-z]{1,3}"),
        remarks in prop::option::of("[a-zA-Z ]{0,30}"),
        id in 1u32..10_000,
    ) {
        let mut pos = PartOfSpeech::new(name).with_id(id);
        pos.shortcut = shortcut;
        pos.remarks = remarks;
        prop_assert_eq!(round_trip(&pos), pos);
    }
}
