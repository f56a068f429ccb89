//! Record identifiers and the per-kind identity registry.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::schema::Record;
use crate::schema::sealed::Identified;

/// Identifier value meaning "no id assigned yet".
pub const UNASSIGNED_ID: u32 = 0;

/// The five kinds of record stored in a language database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    PartOfSpeech,
    Root,
    Source,
    SurfaceForm,
    User,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::PartOfSpeech,
        RecordKind::Root,
        RecordKind::Source,
        RecordKind::SurfaceForm,
        RecordKind::User,
    ];

    /// XML tag of a single record of this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::PartOfSpeech => "part_of_speech",
            Self::Root => "root",
            Self::Source => "source",
            Self::SurfaceForm => "surface_form",
            Self::User => "user",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PartOfSpeech => "part of speech",
            Self::Root => "root",
            Self::Source => "source",
            Self::SurfaceForm => "surface form",
            Self::User => "user",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tracks which identifiers are in use, per record kind.
///
/// A registry is owned by a single database; two databases open in the same
/// process never share identifiers.
#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    allocated: BTreeMap<RecordKind, BTreeSet<u32>>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `proposed` for `kind`, or pick a free id when it is zero.
    ///
    /// Fresh ids continue after the largest id in use. Once `u32::MAX` is
    /// taken the smallest free id is used instead.
    pub fn allocate_or_validate(&mut self, kind: RecordKind, proposed: u32) -> Result<u32> {
        let ids = self.allocated.entry(kind).or_default();
        if proposed != UNASSIGNED_ID {
            if !ids.insert(proposed) {
                return Err(ModelError::DuplicateIdentifier { kind, id: proposed });
            }
            return Ok(proposed);
        }

        let next = match ids.last() {
            None => Some(1),
            Some(&max) => max.checked_add(1),
        };
        let id = match next {
            Some(id) => id,
            None => (1..=u32::MAX)
                .find(|candidate| !ids.contains(candidate))
                .ok_or(ModelError::DuplicateIdentifier {
                    kind,
                    id: u32::MAX,
                })?,
        };
        ids.insert(id);
        tracing::trace!(%kind, id, "allocated identifier");
        Ok(id)
    }

    /// Forget `id` for `kind`. Unknown ids are ignored.
    pub fn release(&mut self, kind: RecordKind, id: u32) {
        if let Some(ids) = self.allocated.get_mut(&kind) {
            ids.remove(&id);
        }
    }

    #[must_use]
    pub fn contains(&self, kind: RecordKind, id: u32) -> bool {
        self.allocated
            .get(&kind)
            .is_some_and(|ids| ids.contains(&id))
    }

    #[must_use]
    pub fn len(&self, kind: RecordKind) -> usize {
        self.allocated.get(&kind).map_or(0, BTreeSet::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocated.values().all(BTreeSet::is_empty)
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.allocated.clear();
    }

    /// Register a record that is not registered yet, keeping its proposed
    /// id or allocating one when it is zero.
    pub fn register<R: Record>(&mut self, record: &mut R) -> Result<u32> {
        let id = self.allocate_or_validate(R::KIND, record.id())?;
        *record.id_mut() = id;
        Ok(id)
    }

    /// Give `record` the id `proposed` (or a fresh one when zero).
    ///
    /// The record's previous id is released first and restored if the new
    /// one cannot be registered, so a failed assignment changes nothing.
    pub fn assign<R: Record>(&mut self, record: &mut R, proposed: u32) -> Result<u32> {
        let previous = record.id();
        if previous != UNASSIGNED_ID {
            self.release(R::KIND, previous);
        }
        match self.allocate_or_validate(R::KIND, proposed) {
            Ok(id) => {
                *record.id_mut() = id;
                Ok(id)
            }
            Err(err) => {
                if previous != UNASSIGNED_ID {
                    self.allocated.entry(R::KIND).or_default().insert(previous);
                }
                Err(err)
            }
        }
    }
}
