//! Editor configuration.
//!
//! Stored as pretty-printed JSON. A missing file means defaults.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::DatabaseOptions;
use crate::error::{DatabaseError, Result};
use crate::io::write_atomic;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "langdb.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Annotator credited on imports and classifications, 0 for unknown.
    pub user_id: u32,
    /// Database reopened when none is named explicitly.
    pub previous_database_path: Option<PathBuf>,
    /// Whether classification may add parts of speech on the fly.
    pub may_create_pos: bool,
    /// Refuse surface forms repeating the value and root of another.
    pub unique_surface_forms: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            user_id: 0,
            previous_database_path: None,
            may_create_pos: true,
            unique_surface_forms: true,
        }
    }
}

impl EditorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(DatabaseError::io("read", path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| DatabaseError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut bytes =
            serde_json::to_vec_pretty(self).map_err(|source| DatabaseError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        bytes.push(b'\n');
        write_atomic(path, &bytes)
    }

    pub fn database_options(&self) -> DatabaseOptions {
        DatabaseOptions {
            unique_surface_forms: self.unique_surface_forms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = EditorConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert!(config.may_create_pos);
        assert!(config.database_options().unique_surface_forms);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "user_id": 4 }"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.user_id, 4);
        assert!(config.unique_surface_forms);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = EditorConfig {
            user_id: 2,
            previous_database_path: Some(PathBuf::from("af.xldb")),
            may_create_pos: false,
            unique_surface_forms: false,
        };
        config.save(&path).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            EditorConfig::load(&path),
            Err(DatabaseError::Config { .. })
        ));
    }
}
