//! Note history repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{NoteHistory, note_history};
use crate::{Caller, Page, map_db_err, scope};

/// Note history repository for database operations.
#[derive(Clone)]
pub struct NoteHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl NoteHistoryRepository {
    /// Create a new note history repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// History of notes owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<NoteHistory> {
        scope::by_note_owner(NoteHistory::find(), note_history::Column::NoteId, caller)
    }

    /// Find a history entry by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<note_history::Model>> {
        NoteHistory::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a history entry within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<note_history::Model>> {
        Self::scoped(caller)
            .filter(note_history::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's history entries, most recent edit first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<note_history::Model>> {
        let query = Self::scoped(caller).order_by_desc(note_history::Column::EditedAt);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new history entry.
    pub async fn create(&self, model: note_history::ActiveModel) -> AppResult<note_history::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a history entry.
    pub async fn update(&self, model: note_history::ActiveModel) -> AppResult<note_history::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a history entry.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<NoteHistory>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_scoped() {
        let entry = note_history::Model {
            id: "h1".to_string(),
            note_id: "n1".to_string(),
            edited_by_id: None,
            previous_content: "old text".to_string(),
            edited_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry]])
                .into_connection(),
        );

        let repo = NoteHistoryRepository::new(db);
        let result = repo.find_scoped(&Caller::user("u1"), "h1").await.unwrap();

        assert_eq!(result.unwrap().previous_content, "old text");
    }
}
