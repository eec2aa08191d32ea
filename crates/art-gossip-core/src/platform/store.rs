//! Durable session blob on disk.

use super::SessionSettings;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures reading or writing the session file.
#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("session file IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path} is not valid session JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Write `contents` to a fresh file readable only by the owner (on Unix).
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// JSON file holding the serialized [`SessionSettings`].
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// a crash mid-write never leaves a truncated blob behind. The blob carries
/// bearer tokens, so it is created with owner-only permissions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the stored settings, `None` when no blob exists yet.
    pub fn load(&self) -> Result<Option<SessionSettings>, SessionStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            SessionStoreError::Io {
                path: self.path.clone(),
                source,
            }
        })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| SessionStoreError::Json {
                path: self.path.clone(),
                source,
            })
    }

    /// Persist the settings, replacing any previous blob.
    pub fn save(&self, settings: &SessionSettings) -> Result<(), SessionStoreError> {
        let io_err = |source| SessionStoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json =
            serde_json::to_string_pretty(settings).map_err(|source| SessionStoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let written = write_private(&tmp_path, json.as_bytes())
            .and_then(|()| std::fs::rename(&tmp_path, &self.path));
        if let Err(source) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(io_err(source));
        }
        tracing::debug!("Session saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.load().unwrap().is_none());
        assert!(!store.exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/state/session.json"));

        let mut settings = SessionSettings::fresh();
        settings.authorization = Some("Bearer IGT:2:abc".to_string());
        settings.user_id = Some("42".to_string());
        store.save(&settings).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap(), Some(settings));
        assert!(!dir.path().join("nested/state/session.json.tmp").exists());
    }

    #[test]
    fn test_save_overwrites_previous_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        store.save(&SessionSettings::fresh()).unwrap();
        let second = SessionSettings::fresh();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), Some(second));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_blob_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&SessionSettings::fresh()).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("session.json");
        // A non-empty directory in the way makes the rename fail
        std::fs::create_dir_all(target.join("occupied")).unwrap();

        let err = SessionStore::new(&target)
            .save(&SessionSettings::fresh())
            .unwrap_err();
        assert!(matches!(err, SessionStoreError::Io { .. }));
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn test_load_corrupt_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = SessionStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SessionStoreError::Json { .. }));
    }
}
