//! Note analysis repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{NoteAnalysis, note_analysis};
use crate::{Caller, Page, map_db_err, scope};

/// Note analysis repository for database operations.
#[derive(Clone)]
pub struct NoteAnalysisRepository {
    db: Arc<DatabaseConnection>,
}

impl NoteAnalysisRepository {
    /// Create a new analysis repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Analyses of notes owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<NoteAnalysis> {
        scope::by_note_owner(NoteAnalysis::find(), note_analysis::Column::NoteId, caller)
    }

    /// Find an analysis by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<note_analysis::Model>> {
        NoteAnalysis::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find the analysis of a note.
    pub async fn find_by_note(&self, note_id: &str) -> AppResult<Option<note_analysis::Model>> {
        NoteAnalysis::find()
            .filter(note_analysis::Column::NoteId.eq(note_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find an analysis within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<note_analysis::Model>> {
        Self::scoped(caller)
            .filter(note_analysis::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's analyses, newest first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<note_analysis::Model>> {
        let query = Self::scoped(caller).order_by_desc(note_analysis::Column::CreatedAt);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new analysis.
    pub async fn create(&self, model: note_analysis::ActiveModel) -> AppResult<note_analysis::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update an analysis.
    pub async fn update(&self, model: note_analysis::ActiveModel) -> AppResult<note_analysis::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete an analysis.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<NoteAnalysis>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::note_analysis::Sentiment;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_note() {
        let analysis = note_analysis::Model {
            id: "an1".to_string(),
            note_id: "n1".to_string(),
            summary: "Shopping list".to_string(),
            sentiment: Sentiment::Neutral,
            keywords: serde_json::json!(["milk", "eggs"]),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[analysis]])
                .into_connection(),
        );

        let repo = NoteAnalysisRepository::new(db);
        let result = repo.find_by_note("n1").await.unwrap().unwrap();

        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert_eq!(result.keywords[0], "milk");
    }
}
