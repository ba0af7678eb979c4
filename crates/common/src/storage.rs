//! Blob storage for note file attachments.

use std::path::{Component, Path, PathBuf};

use crate::{AppError, AppResult};

/// Prefix every attachment key starts with.
const ATTACHMENT_PREFIX: &str = "notes/files";

/// Longest file name kept from the client-supplied name.
const MAX_NAME_LEN: usize = 100;

/// Metadata about a stored blob.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Storage key (relative path).
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// File size in bytes.
    pub size: u64,
    /// MD5 hash of the contents.
    pub md5: String,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store a blob under `key`.
    async fn upload(&self, key: &str, data: &[u8]) -> AppResult<StoredFile>;

    /// Delete a blob. Missing blobs are not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !safe {
            return Err(AppError::Storage(format!("Invalid storage key: {key}")));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn upload(&self, key: &str, data: &[u8]) -> AppResult<StoredFile> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        Ok(StoredFile {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            md5: format!("{:x}", md5::compute(data)),
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {e}"))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Generate the storage key for an uploaded attachment.
///
/// Keys look like `notes/files/2025/02/15/<ulid>_<name>`; the client name is
/// reduced to ASCII alphanumerics, `.`, `-` and `_`.
#[must_use]
pub fn generate_storage_key(original_name: &str) -> String {
    let now = chrono::Utc::now();
    let date_path = now.format("%Y/%m/%d");

    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let mut name: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();
    name = name.trim_start_matches('.').to_string();
    if name.is_empty() {
        name = "file".to_string();
    }

    let id = ulid::Ulid::new().to_string().to_lowercase();
    format!("{ATTACHMENT_PREFIX}/{date_path}/{id}_{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key() {
        let key = generate_storage_key("report final.pdf");
        assert!(key.starts_with("notes/files/"));
        assert!(key.ends_with("_report_final.pdf"));
    }

    #[test]
    fn test_generate_storage_key_strips_directories() {
        let key = generate_storage_key("../../etc/passwd");
        assert!(key.ends_with("_passwd"));
        assert!(!key.contains(".."));
    }

    #[test]
    fn test_generate_storage_key_empty_name() {
        let key = generate_storage_key("");
        assert!(key.ends_with("_file"));
    }

    #[tokio::test]
    async fn test_local_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_path_buf(), "/media/".to_string());

        let stored = storage
            .upload("notes/files/2025/01/01/a_hello.txt", b"hello")
            .await
            .unwrap();
        assert_eq!(stored.size, 5);
        assert_eq!(stored.url, "/media/notes/files/2025/01/01/a_hello.txt");
        assert_eq!(stored.md5, "5d41402abc4b2a76b9719d911017c592");
        let path = dir.path().join(&stored.key);
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");

        storage.delete(&stored.key).await.unwrap();
        assert!(!path.exists());
        // Deleting twice is fine.
        storage.delete(&stored.key).await.unwrap();
    }

    #[tokio::test]
    async fn test_local_storage_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_path_buf(), "/media".to_string());

        assert!(storage.upload("../outside.txt", b"x").await.is_err());
        assert!(storage.upload("/abs.txt", b"x").await.is_err());
    }
}
