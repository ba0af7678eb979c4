//! Search log repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{SearchLog, search_log};
use crate::{Caller, Page, map_db_err};

/// Search log repository for database operations.
#[derive(Clone)]
pub struct SearchLogRepository {
    db: Arc<DatabaseConnection>,
}

impl SearchLogRepository {
    /// Create a new search log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Search logs recorded for `caller`. Orphaned rows belong to nobody.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<SearchLog> {
        SearchLog::find()
            .filter(search_log::Column::UserId.eq(caller.user_id.as_str()))
    }

    /// Find a search log by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<search_log::Model>> {
        SearchLog::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a search log within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<search_log::Model>> {
        Self::scoped(caller)
            .filter(search_log::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's search logs, newest first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<search_log::Model>> {
        let query = Self::scoped(caller).order_by_desc(search_log::Column::CreatedAt);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new search log.
    pub async fn create(&self, model: search_log::ActiveModel) -> AppResult<search_log::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a search log.
    pub async fn update(&self, model: search_log::ActiveModel) -> AppResult<search_log::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a search log.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<SearchLog>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create() {
        let log = search_log::Model {
            id: "s1".to_string(),
            user_id: Some("u1".to_string()),
            query: "groceries".to_string(),
            results_count: 3,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[log.clone()]])
                .into_connection(),
        );

        let repo = SearchLogRepository::new(db);
        let created = repo.create(log.into()).await.unwrap();

        assert_eq!(created.results_count, 3);
    }
}
