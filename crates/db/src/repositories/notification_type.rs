//! Notification type repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{NotificationType, notification_type};
use crate::{Page, map_db_err};

/// Notification type repository for database operations.
#[derive(Clone)]
pub struct NotificationTypeRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationTypeRepository {
    /// Create a new notification type repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a notification type by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<notification_type::Model>> {
        NotificationType::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a notification type by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<notification_type::Model>> {
        NotificationType::find()
            .filter(notification_type::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List notification types.
    pub async fn list(&self, page: Page) -> AppResult<Vec<notification_type::Model>> {
        page.apply(NotificationType::find().order_by_asc(notification_type::Column::Id))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new notification type.
    pub async fn create(
        &self,
        model: notification_type::ActiveModel,
    ) -> AppResult<notification_type::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a notification type.
    pub async fn update(
        &self,
        model: notification_type::ActiveModel,
    ) -> AppResult<notification_type::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a notification type.
    ///
    /// Fails with a protected error while any notification uses the type.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<NotificationType>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use tasknote_common::AppError;

    #[tokio::test]
    async fn test_delete_in_use_is_protected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "count" => Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = NotificationTypeRepository::new(db);
        let result = repo.delete("t1").await;

        assert!(matches!(result, Err(AppError::Protected(_))));
    }

    #[tokio::test]
    async fn test_delete_unused() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "count" => Value::BigInt(Some(0))
                }]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = NotificationTypeRepository::new(db);
        assert!(repo.delete("t1").await.is_ok());
    }
}
