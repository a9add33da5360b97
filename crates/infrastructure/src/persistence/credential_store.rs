//! File-based credential store implementation.
//!
//! Tokens live in a single JSON file, by default in the platform config
//! directory. On unix the file is readable by its owner only.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tradepost_application::ports::{
    CredentialStore, CredentialStoreError, FileSystem, FileSystemError,
};
use tradepost_domain::CredentialKey;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

type Entries = BTreeMap<String, String>;

fn io_error(e: FileSystemError) -> CredentialStoreError {
    CredentialStoreError::Io(e.to_string())
}

fn serialization_error(e: SerializationError) -> CredentialStoreError {
    CredentialStoreError::Serialization(e.to_string())
}

/// File-based credential store.
///
/// Stores the tokens as a flat JSON object:
/// ```json
/// {
///   "access_token": "eyJhbGciOi...",
///   "refresh_token": "eyJhbGciOi..."
/// }
/// ```
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash never leaves a truncated file behind. The file is
/// removed once both tokens are gone.
#[derive(Debug)]
pub struct FileCredentialStore<F> {
    fs: F,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl<F: FileSystem> FileCredentialStore<F> {
    /// Creates a store backed by the file at `path`.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the credentials file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn load(&self) -> Result<Entries, CredentialStoreError> {
        if !self.fs.exists(&self.path).await {
            return Ok(Entries::new());
        }
        let content = match self.fs.read_file(&self.path).await {
            Ok(content) => content,
            Err(FileSystemError::NotFound(_)) => return Ok(Entries::new()),
            Err(e) => return Err(io_error(e)),
        };
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }
        from_json_bytes(&content).map_err(serialization_error)
    }

    async fn save(&self, entries: &Entries) -> Result<(), CredentialStoreError> {
        if entries.is_empty() {
            return match self.fs.remove_file(&self.path).await {
                Ok(()) | Err(FileSystemError::NotFound(_)) => Ok(()),
                Err(e) => Err(io_error(e)),
            };
        }

        let content = to_json_stable_bytes(entries).map_err(serialization_error)?;
        let temp = self.temp_path();
        self.fs.write_file(&temp, &content).await.map_err(io_error)?;
        self.fs.rename(&temp, &self.path).await.map_err(io_error)
    }

    async fn update(
        &self,
        apply: impl FnOnce(&mut Entries) + Send,
    ) -> Result<(), CredentialStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        apply(&mut entries);
        self.save(&entries).await
    }
}

#[async_trait]
impl<F: FileSystem> CredentialStore for FileCredentialStore<F> {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.load().await?.remove(key.as_str()))
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), CredentialStoreError> {
        let value = value.to_string();
        self.update(move |entries| {
            entries.insert(key.as_str().to_string(), value);
        })
        .await
    }

    async fn remove(&self, key: CredentialKey) -> Result<(), CredentialStoreError> {
        self.update(move |entries| {
            entries.remove(key.as_str());
        })
        .await
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.update(Entries::clear).await
    }
}
