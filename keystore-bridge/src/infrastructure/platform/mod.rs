//! Platform storage backends
//!
//! Raw byte key-value storage underneath the encrypted preferences. Nothing at
//! this layer is encrypted; callers hand in ciphertext and opaque entry names.

use crate::shared::constants::PREFERENCES_FILE_EXTENSION;
use crate::shared::error::WalletError;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Platform-specific storage implementation
pub trait PlatformStorage {
    /// Store data, replacing any previous entry
    fn store(&self, key: &str, data: &[u8]) -> Result<(), WalletError>;

    /// Retrieve data, `None` when absent
    fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, WalletError>;

    /// Check if data exists
    fn exists(&self, key: &str) -> Result<bool, WalletError>;

    /// List all stored keys
    fn list_keys(&self) -> Result<Vec<String>, WalletError>;
}

/// One file per entry in a private directory
///
/// Entry names must be filesystem-safe; the encrypted preferences layer only
/// ever passes base64url names.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for entries, creating it private (0700) when missing
    ///
    /// An existing directory keeps its permissions and must not hold anything
    /// besides preference entries.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, WalletError> {
        let dir = dir.into();
        if dir.is_dir() {
            Self::check_existing(&dir)?;
        } else {
            fs::create_dir_all(&dir)?;
            #[cfg(unix)]
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;
        }
        Ok(Self { dir })
    }

    fn check_existing(dir: &Path) -> Result<(), WalletError> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let extension = path.extension().and_then(|e| e.to_str());
            // .tmp files are left behind by an interrupted store
            if extension != Some(PREFERENCES_FILE_EXTENSION) && extension != Some("tmp") {
                return Err(WalletError::storage(format!(
                    "Refusing to use {} for preferences: it contains other files",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, key: &str) -> Result<PathBuf, WalletError> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(WalletError::storage(format!("Invalid storage entry name: {}", key)));
        }
        Ok(self.dir.join(format!("{}.{}", key, PREFERENCES_FILE_EXTENSION)))
    }
}

impl PlatformStorage for FileStorage {
    fn store(&self, key: &str, data: &[u8]) -> Result<(), WalletError> {
        let path = self.file_path(key)?;
        let tmp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&tmp_path)?;
            #[cfg(unix)]
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, WalletError> {
        let path = self.file_path(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, WalletError> {
        Ok(self.file_path(key)?.exists())
    }

    fn list_keys(&self) -> Result<Vec<String>, WalletError> {
        let mut keys = vec![];
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PREFERENCES_FILE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                keys.push(name.to_string());
            }
        }
        Ok(keys)
    }
}

/// Process-local storage, for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, WalletError> {
        self.data.lock()
            .map_err(|_| WalletError::internal("Memory storage lock poisoned"))
    }
}

impl PlatformStorage for MemoryStorage {
    fn store(&self, key: &str, data: &[u8]) -> Result<(), WalletError> {
        self.lock()?.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, WalletError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn exists(&self, key: &str) -> Result<bool, WalletError> {
        Ok(self.lock()?.contains_key(key))
    }

    fn list_keys(&self) -> Result<Vec<String>, WalletError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = FileStorage::new(dir.path()).expect("Failed to create file storage");

        assert_eq!(storage.retrieve("entry").expect("Failed to read"), None);
        storage.store("entry", b"payload").expect("Failed to store");
        assert!(storage.exists("entry").expect("Failed to check existence"));
        assert_eq!(storage.retrieve("entry").expect("Failed to read"), Some(b"payload".to_vec()));

        storage.store("entry", b"replaced").expect("Failed to overwrite");
        assert_eq!(storage.retrieve("entry").expect("Failed to read"), Some(b"replaced".to_vec()));
    }

    #[test]
    fn test_file_storage_lists_only_entries() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = FileStorage::new(dir.path()).expect("Failed to create file storage");
        storage.store("a", b"1").expect("Failed to store");
        storage.store("b-2_c", b"2").expect("Failed to store");
        fs::write(dir.path().join("stray.txt"), b"ignored").expect("Failed to write stray file");

        let mut keys = storage.list_keys().expect("Failed to list keys");
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b-2_c".to_string()]);
    }

    #[test]
    fn test_file_storage_rejects_path_like_names() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = FileStorage::new(dir.path()).expect("Failed to create file storage");
        assert!(matches!(storage.store("../escape", b"x"), Err(WalletError::Storage(_))));
        assert!(storage.retrieve("").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_permissions() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage = FileStorage::new(dir.path().join("prefs")).expect("Failed to create file storage");
        storage.store("secret", b"x").expect("Failed to store");

        let mode = fs::metadata(storage.dir().join("secret.pref"))
            .expect("Failed to stat entry")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_dir_keeps_permissions() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).expect("Failed to chmod");

        let storage = FileStorage::new(dir.path()).expect("Failed to create file storage");
        storage.store("entry", b"x").expect("Failed to store");
        FileStorage::new(dir.path()).expect("Failed to reopen file storage");

        let mode = fs::metadata(dir.path()).expect("Failed to stat dir").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_existing_dir_with_foreign_files_rejected() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("notes.txt"), b"mine").expect("Failed to write file");

        let result = FileStorage::new(dir.path());
        assert!(matches!(result, Err(WalletError::Storage(_))));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.store("k", b"v").expect("Failed to store");
        assert!(storage.exists("k").expect("Failed to check existence"));
        assert!(!storage.exists("missing").expect("Failed to check existence"));
        assert_eq!(storage.list_keys().expect("Failed to list"), vec!["k".to_string()]);
    }
}
