//! Real file system implementation.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tradepost_application::ports::{FileSystem, FileSystemError};

/// Mode of files written on unix: owner read/write only.
#[cfg(unix)]
const PRIVATE_MODE: u32 = 0o600;

/// Real file system implementation using `tokio::fs`.
///
/// Files it writes hold credentials, so on unix they are created readable
/// by their owner only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn classify(path: &Path, e: std::io::Error) -> FileSystemError {
    match e.kind() {
        ErrorKind::NotFound => FileSystemError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => FileSystemError::PermissionDenied(path.to_path_buf()),
        _ => FileSystemError::Io(e),
    }
}

impl FileSystem for TokioFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        fs::read(path).await.map_err(|e| classify(path, e))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| classify(parent, e))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(PRIVATE_MODE);
        let mut file = options.open(path).await.map_err(|e| classify(path, e))?;

        // An existing file keeps its mode when opened.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(PRIVATE_MODE))
                .await
                .map_err(|e| classify(path, e))?;
        }

        file.write_all(contents).await.map_err(|e| classify(path, e))?;
        file.sync_all().await.map_err(|e| classify(path, e))
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }

    async fn remove_file(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::remove_file(path).await.map_err(|e| classify(path, e))
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        fs::rename(from, to).await.map_err(|e| classify(from, e))
    }
}
