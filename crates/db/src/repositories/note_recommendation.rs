//! Note recommendation repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{NoteRecommendation, note_recommendation};
use crate::{Caller, Page, map_db_err};

/// Note recommendation repository for database operations.
#[derive(Clone)]
pub struct NoteRecommendationRepository {
    db: Arc<DatabaseConnection>,
}

impl NoteRecommendationRepository {
    /// Create a new recommendation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Recommendations addressed to `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<NoteRecommendation> {
        NoteRecommendation::find()
            .filter(note_recommendation::Column::UserId.eq(caller.user_id.as_str()))
    }

    /// Find a recommendation by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<note_recommendation::Model>> {
        NoteRecommendation::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a recommendation within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<note_recommendation::Model>> {
        Self::scoped(caller)
            .filter(note_recommendation::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's recommendations, best score first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<note_recommendation::Model>> {
        let query = Self::scoped(caller)
            .order_by_desc(note_recommendation::Column::Score)
            .order_by_desc(note_recommendation::Column::CreatedAt);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new recommendation.
    pub async fn create(&self, model: note_recommendation::ActiveModel) -> AppResult<note_recommendation::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a recommendation.
    pub async fn update(&self, model: note_recommendation::ActiveModel) -> AppResult<note_recommendation::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a recommendation.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<NoteRecommendation>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    #[test]
    fn test_listing_orders_by_score_then_recency() {
        let sql = NoteRecommendationRepository::scoped(&Caller::user("u1"))
            .order_by_desc(note_recommendation::Column::Score)
            .order_by_desc(note_recommendation::Column::CreatedAt)
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#"ORDER BY "note_recommendation"."score" DESC, "note_recommendation"."created_at" DESC"#));
    }

    #[tokio::test]
    async fn test_find_scoped() {
        let rec = note_recommendation::Model {
            id: "r1".to_string(),
            user_id: "u1".to_string(),
            recommended_note_id: "n1".to_string(),
            score: 0.75,
            algorithm_version: "v1".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[rec]])
                .into_connection(),
        );

        let repo = NoteRecommendationRepository::new(db);
        let result = repo.find_scoped(&Caller::user("u1"), "r1").await.unwrap();

        assert_eq!(result.unwrap().score, 0.75);
    }
}
