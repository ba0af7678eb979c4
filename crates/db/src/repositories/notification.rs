//! Notification repository.

use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{Notification, notification, notification_type};
use crate::{Caller, Page, map_db_err};

/// A notification together with its type.
pub type NotificationWithType = (notification::Model, Option<notification_type::Model>);

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Notifications addressed to `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<Notification> {
        Notification::find().filter(notification::Column::UserId.eq(caller.user_id.as_str()))
    }

    /// Find a notification within the caller's scope, with its type.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<NotificationWithType>> {
        Self::scoped(caller)
            .filter(notification::Column::Id.eq(id))
            .find_also_related(notification_type::Entity)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's notifications, most recent first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<NotificationWithType>> {
        self.list(Self::scoped(caller), page).await
    }

    /// List the caller's unread notifications, most recent first.
    pub async fn list_unread(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<NotificationWithType>> {
        let query = Self::scoped(caller).filter(notification::Column::Read.eq(false));
        self.list(query, page).await
    }

    async fn list(&self, query: Select<Notification>, page: Page) -> AppResult<Vec<NotificationWithType>> {
        page.apply(query.order_by_desc(notification::Column::SentAt))
            .find_also_related(notification_type::Entity)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Mark every unread notification of the caller as read.
    ///
    /// Returns the number of notifications changed.
    pub async fn mark_all_read(&self, caller: &Caller) -> AppResult<u64> {
        let result = Notification::update_many()
            .col_expr(notification::Column::Read, Expr::value(true))
            .filter(notification::Column::UserId.eq(caller.user_id.as_str()))
            .filter(notification::Column::Read.eq(false))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected)
    }

    /// Create a new notification.
    pub async fn create(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a notification.
    pub async fn update(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a notification.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<Notification>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    #[test]
    fn test_unread_filter() {
        let sql = NotificationRepository::scoped(&Caller::user("u1"))
            .filter(notification::Column::Read.eq(false))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""notification"."user_id" = 'u1'"#));
        assert!(sql.contains(r#""notification"."read" = FALSE"#));
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let changed = repo.mark_all_read(&Caller::user("u1")).await.unwrap();

        assert_eq!(changed, 3);
    }
}
