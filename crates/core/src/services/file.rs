//! File attachment service.
//!
//! Attachments are stored through a [`StorageBackend`]; the row keeps the
//! storage key and the API exposes it as a URL.

use std::sync::Arc;

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppError, AppResult, IdGenerator, StorageBackend, generate_storage_key};
use tasknote_db::entities::file;
use tasknote_db::repositories::{FileRepository, NoteRepository};
use tasknote_db::{Caller, Page};
use tracing::{info, warn};

use super::{not_found, now, owned_note};

/// A multipart upload, already read into memory.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub note: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Moving an attachment to another note. The blob itself is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilePatch {
    pub note: Option<String>,
}

#[derive(Clone)]
pub struct FileService {
    file_repo: FileRepository,
    note_repo: NoteRepository,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl FileService {
    #[must_use]
    pub fn new(
        file_repo: FileRepository,
        note_repo: NoteRepository,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            file_repo,
            note_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<file::Model>> {
        self.file_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<file::Model> {
        self.file_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("File"))
    }

    /// Store an upload and attach it to one of the caller's notes.
    pub async fn create(&self, caller: &Caller, upload: FileUpload) -> AppResult<file::Model> {
        if upload.bytes.is_empty() {
            return Err(AppError::field("file", "The submitted file is empty."));
        }
        let note = owned_note(&self.note_repo, caller, &upload.note).await?;

        let key = generate_storage_key(&upload.file_name);
        let stored = self.storage.upload(&key, &upload.bytes).await?;

        let model = file::ActiveModel {
            id: Set(self.id_gen.generate()),
            note_id: Set(note.id),
            path: Set(stored.key.clone()),
            uploaded_at: Set(now()),
        };

        match self.file_repo.create(model).await {
            Ok(file) => {
                info!(file_id = %file.id, size = stored.size, md5 = %stored.md5, "File uploaded");
                Ok(file)
            }
            Err(e) => {
                // The row failed; don't leave the blob behind.
                if let Err(cleanup) = self.storage.delete(&stored.key).await {
                    warn!(key = %stored.key, error = %cleanup, "Failed to remove orphaned blob");
                }
                Err(e)
            }
        }
    }

    pub async fn update(&self, caller: &Caller, id: &str, patch: FilePatch) -> AppResult<file::Model> {
        let file = self.get(caller, id).await?;

        let mut model: file::ActiveModel = file.into();
        if let Some(note_id) = patch.note {
            let note = owned_note(&self.note_repo, caller, &note_id).await?;
            model.note_id = Set(note.id);
        }

        self.file_repo.update(model).await
    }

    /// Delete the row, then the blob. A blob that can't be removed is logged
    /// and left behind.
    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let file = self.get(caller, id).await?;
        self.file_repo.delete(&file.id).await?;

        if let Err(e) = self.storage.delete(&file.path).await {
            warn!(key = %file.path, error = %e, "Failed to remove blob");
        }
        Ok(())
    }

    /// Public URL of an attachment.
    #[must_use]
    pub fn url(&self, file: &file::Model) -> String {
        self.storage.public_url(&file.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use tasknote_common::LocalStorage;
    use tasknote_db::entities::note;

    fn service(db: Arc<DatabaseConnection>, dir: &tempfile::TempDir) -> FileService {
        let storage = Arc::new(LocalStorage::new(
            dir.path().to_path_buf(),
            "http://localhost:8000/media".to_string(),
        ));
        FileService::new(FileRepository::new(db.clone()), NoteRepository::new(db), storage)
    }

    fn create_test_note() -> note::Model {
        note::Model {
            id: "n1".to_string(),
            user_id: "u1".to_string(),
            title: "Report".to_string(),
            content: String::new(),
            completed: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_upload_writes_blob() {
        let dir = tempfile::tempdir().unwrap();
        let stored = file::Model {
            id: "f1".to_string(),
            note_id: "n1".to_string(),
            path: "notes/files/2025/03/01/x_report.pdf".to_string(),
            uploaded_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_note()]])
                .append_query_results([[stored]])
                .into_connection(),
        );
        let service = service(db, &dir);

        let upload = FileUpload {
            note: "n1".to_string(),
            file_name: "report.pdf".to_string(),
            bytes: b"%PDF-1.4".to_vec(),
        };
        service.create(&Caller::user("u1"), upload).await.unwrap();

        let written = walk(dir.path());
        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("_report.pdf"));
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let upload = FileUpload {
            note: "n1".to_string(),
            file_name: "empty.txt".to_string(),
            bytes: vec![],
        };
        let result = service(db, &dir).create(&Caller::user("u1"), upload).await;
        assert!(matches!(result, Err(AppError::Validation(f)) if f.contains("file")));
    }

    #[tokio::test]
    async fn test_delete_removes_blob() {
        let dir = tempfile::tempdir().unwrap();
        let key = "notes/files/2025/03/01/x_a.txt";
        let blob = dir.path().join(key);
        std::fs::create_dir_all(blob.parent().unwrap()).unwrap();
        std::fs::write(&blob, b"a").unwrap();

        let stored = file::Model {
            id: "f1".to_string(),
            note_id: "n1".to_string(),
            path: key.to_string(),
            uploaded_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        service(db, &dir).delete(&Caller::user("u1"), "f1").await.unwrap();
        assert!(!blob.exists());
    }

    fn walk(dir: &std::path::Path) -> Vec<String> {
        let mut out = vec![];
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                out.extend(walk(&path));
            } else {
                out.push(path.to_string_lossy().into_owned());
            }
        }
        out
    }
}
