//! Annotation workflow on top of the database: picking the next word to
//! classify and finding or creating the entries a classification needs.

use chrono::{DateTime, Utc};
use ldb_model::{PartOfSpeech, Record, Root, SurfaceForm, SurfaceFormStatus};
use tracing::{debug, info};

use crate::database::LanguageDatabase;
use crate::error::{DatabaseError, Result};
use crate::section::Section;

impl LanguageDatabase {
    /// First surface form still waiting for classification, in word-list order.
    pub fn next_todo(&self) -> Option<&SurfaceForm> {
        self.surface_forms()
            .iter()
            .find(|sf| sf.status == SurfaceFormStatus::Todo)
    }

    /// Number of surface forms per status.
    pub fn status_counts(&self) -> [(SurfaceFormStatus, usize); 4] {
        SurfaceFormStatus::ALL.map(|status| {
            let count = self
                .surface_forms()
                .iter()
                .filter(|sf| sf.status == status)
                .count();
            (status, count)
        })
    }

    /// Look up a part of speech by name or shortcut, adding it when absent.
    ///
    /// Returns the id and whether a new entry was created. With
    /// `may_create` unset a missing entry is an error.
    pub fn find_or_create_part_of_speech(
        &mut self,
        name: &str,
        shortcut: Option<&str>,
        may_create: bool,
    ) -> Result<(u32, bool)> {
        let name = name.trim();
        let shortcut = shortcut.map(str::trim).filter(|s| !s.is_empty());
        let existing = self.parts_of_speech().iter().find(|pos| {
            pos.name == name
                || pos.shortcut.as_deref() == Some(name)
                || (shortcut.is_some() && pos.shortcut.as_deref() == shortcut)
        });
        if let Some(pos) = existing {
            return Ok((pos.id(), false));
        }
        if !may_create {
            return Err(DatabaseError::CreationNotAllowed {
                section: Section::PartsOfSpeech,
                name: name.to_string(),
            });
        }

        let mut pos = PartOfSpeech::new(name);
        pos.shortcut = shortcut.map(str::to_string);
        let id = self.add_part_of_speech(pos)?;
        info!(id, name, "created part of speech");
        Ok((id, true))
    }

    /// Look up a root by value and part of speech, adding it when absent.
    pub fn find_or_create_root(
        &mut self,
        value: &str,
        pos_id: u32,
        user_id: u32,
        at: DateTime<Utc>,
    ) -> Result<(u32, bool)> {
        let value = value.trim();
        if let Some(root) = self
            .roots()
            .iter()
            .find(|root| root.value == value && root.pos_id == pos_id)
        {
            return Ok((root.id(), false));
        }
        self.resolve::<PartOfSpeech>(pos_id)?;

        let root = Root::new(value)
            .with_part_of_speech(pos_id)
            .with_user(user_id)
            .with_date(at);
        let id = self.add_root(root)?;
        info!(id, value, pos_id, "created root");
        Ok((id, true))
    }

    /// Attach surface form `sf_id` to root `root_id` and mark it classified.
    pub fn classify_surface_form(
        &mut self,
        sf_id: u32,
        root_id: u32,
        user_id: u32,
        at: DateTime<Utc>,
    ) -> Result<&SurfaceForm> {
        self.resolve::<Root>(root_id)?;
        let sf = self.surface_form_mut(sf_id)?;
        sf.classify(root_id, user_id, at);
        debug!(sf_id, root_id, user_id, "classified surface form");
        Ok(&*sf)
    }

    pub fn ignore_surface_form(&mut self, sf_id: u32, at: DateTime<Utc>) -> Result<&SurfaceForm> {
        let sf = self.surface_form_mut(sf_id)?;
        sf.ignore(at);
        debug!(sf_id, "ignored surface form");
        Ok(&*sf)
    }

    pub fn reject_surface_form(&mut self, sf_id: u32, at: DateTime<Utc>) -> Result<&SurfaceForm> {
        let sf = self.surface_form_mut(sf_id)?;
        sf.reject(at);
        debug!(sf_id, "rejected surface form");
        Ok(&*sf)
    }

    fn surface_form_mut(&mut self, id: u32) -> Result<&mut SurfaceForm> {
        self.get_mut::<SurfaceForm>(id)
            .ok_or(DatabaseError::UnknownModel {
                section: Section::SurfaceForms,
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ldb_model::User;

    fn at() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn database() -> LanguageDatabase {
        let mut db = LanguageDatabase::new("af");
        db.add_user(User::new("annotator")).unwrap();
        db.add_part_of_speech(PartOfSpeech::new("noun").with_shortcut("n"))
            .unwrap();
        for word in ["huis", "huise", "loop"] {
            db.add_surface_form(SurfaceForm::new(word)).unwrap();
        }
        db
    }

    #[test]
    fn next_todo_follows_word_list_order() {
        let mut db = database();
        assert_eq!(db.next_todo().unwrap().value, "huis");
        db.ignore_surface_form(1, at()).unwrap();
        assert_eq!(db.next_todo().unwrap().value, "huise");
    }

    #[test]
    fn part_of_speech_is_found_by_name_or_shortcut() {
        let mut db = database();
        assert_eq!(
            db.find_or_create_part_of_speech("noun", None, false).unwrap(),
            (1, false)
        );
        assert_eq!(
            db.find_or_create_part_of_speech("n", None, false).unwrap(),
            (1, false)
        );
        assert_eq!(
            db.find_or_create_part_of_speech("verb", Some("v"), true)
                .unwrap(),
            (2, true)
        );
        assert_eq!(db.parts_of_speech()[1].shortcut.as_deref(), Some("v"));
    }

    #[test]
    fn part_of_speech_creation_can_be_disabled() {
        let mut db = database();
        let err = db
            .find_or_create_part_of_speech("verb", None, false)
            .unwrap_err();
        assert!(matches!(err, DatabaseError::CreationNotAllowed { .. }));
        assert_eq!(db.parts_of_speech().len(), 1);
    }

    #[test]
    fn root_is_reused_for_same_value_and_part_of_speech() {
        let mut db = database();
        let (first, created) = db.find_or_create_root("huis", 1, 1, at()).unwrap();
        assert!(created);
        assert_eq!(
            db.find_or_create_root("huis", 1, 1, at()).unwrap(),
            (first, false)
        );
        let (other, created) = db.find_or_create_root("huis", 0, 1, at()).unwrap();
        assert!(created);
        assert_ne!(first, other);
    }

    #[test]
    fn root_with_unknown_part_of_speech_is_refused() {
        let mut db = database();
        let err = db.find_or_create_root("huis", 9, 1, at()).unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::MissingReference {
                section: Section::PartsOfSpeech,
                id: 9
            }
        ));
        assert!(db.roots().is_empty());
    }

    #[test]
    fn classify_marks_form_and_credits_user() {
        let mut db = database();
        let (root_id, _) = db.find_or_create_root("huis", 1, 1, at()).unwrap();
        let sf = db.classify_surface_form(2, root_id, 1, at()).unwrap();
        assert_eq!(sf.status, SurfaceFormStatus::Classified);
        assert_eq!(sf.root_id, root_id);
        assert_eq!(sf.user_id, 1);
        assert_eq!(sf.date, at());
    }

    #[test]
    fn classify_needs_existing_root_and_form() {
        let mut db = database();
        assert!(matches!(
            db.classify_surface_form(1, 7, 1, at()),
            Err(DatabaseError::MissingReference { .. })
        ));
        let (root_id, _) = db.find_or_create_root("huis", 1, 1, at()).unwrap();
        assert!(matches!(
            db.classify_surface_form(99, root_id, 1, at()),
            Err(DatabaseError::UnknownModel { id: 99, .. })
        ));
    }

    #[test]
    fn status_counts_cover_every_status() {
        let mut db = database();
        db.reject_surface_form(3, at()).unwrap();
        let counts = db.status_counts();
        assert_eq!(counts[0], (SurfaceFormStatus::Todo, 2));
        assert_eq!(counts[3], (SurfaceFormStatus::Rejected, 1));
    }
}
