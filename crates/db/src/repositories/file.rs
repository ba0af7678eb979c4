//! File repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{File, file};
use crate::{Caller, Page, map_db_err, scope};

/// File repository for database operations.
#[derive(Clone)]
pub struct FileRepository {
    db: Arc<DatabaseConnection>,
}

impl FileRepository {
    /// Create a new file repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Files attached to notes owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<File> {
        scope::by_note_owner(File::find(), file::Column::NoteId, caller)
    }

    /// Find a file by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<file::Model>> {
        File::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a file within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<file::Model>> {
        Self::scoped(caller)
            .filter(file::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's files, most recent upload first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<file::Model>> {
        let query = Self::scoped(caller).order_by_desc(file::Column::UploadedAt);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new file.
    pub async fn create(&self, model: file::ActiveModel) -> AppResult<file::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a file.
    pub async fn update(&self, model: file::ActiveModel) -> AppResult<file::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a file.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<File>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn create_test_file(id: &str, note_id: &str) -> file::Model {
        file::Model {
            id: id.to_string(),
            note_id: note_id.to_string(),
            path: format!("notes/files/2025/03/01/{id}_a.txt"),
            uploaded_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_scope_uses_owned_note_subquery() {
        let sql = FileRepository::scoped(&Caller::user("u1"))
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""file"."note_id" IN (SELECT "id" FROM "note" WHERE"#));
        assert!(sql.contains(r#""note"."user_id" = 'u1'"#));
    }

    #[tokio::test]
    async fn test_find_scoped() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_file("f1", "n1")]])
                .into_connection(),
        );

        let repo = FileRepository::new(db);
        let result = repo.find_scoped(&Caller::user("u1"), "f1").await.unwrap();

        assert_eq!(result.unwrap().note_id, "n1");
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FileRepository::new(db);
        assert!(repo.delete("f1").await.is_ok());
    }
}
