//! Review repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{Review, review};
use crate::{Caller, Page, map_db_err, scope};

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Reviews of notes owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<Review> {
        scope::by_note_owner(Review::find(), review::Column::NoteId, caller)
    }

    /// Find a review by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a review within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<review::Model>> {
        Self::scoped(caller)
            .filter(review::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's reviews, newest first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<review::Model>> {
        let query = Self::scoped(caller).order_by_desc(review::Column::CreatedAt);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a review.
    pub async fn update(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a review.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<Review>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_review(id: &str, rating: i16) -> review::Model {
        review::Model {
            id: id.to_string(),
            note_id: "n1".to_string(),
            reviewer_id: Some("u1".to_string()),
            rating,
            comment: String::new(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_scoped() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_review("r1", 5), create_test_review("r2", 3)]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo
            .list_scoped(&Caller::user("u1"), Page::default())
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].rating, 5);
    }

    #[tokio::test]
    async fn test_find_scoped_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<review::Model>::new()])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.find_scoped(&Caller::user("u2"), "r1").await.unwrap();

        assert!(result.is_none());
    }
}
