//! Login history repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{LoginHistory, login_history};
use crate::{Caller, Page, map_db_err};

/// Login history repository for database operations.
#[derive(Clone)]
pub struct LoginHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl LoginHistoryRepository {
    /// Create a new login history repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Rows visible to `caller`. Staff see every user's history.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<LoginHistory> {
        let query = LoginHistory::find();
        if caller.is_staff {
            query
        } else {
            query.filter(login_history::Column::UserId.eq(caller.user_id.as_str()))
        }
    }

    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<login_history::Model>> {
        Self::scoped(caller)
            .filter(login_history::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List logins, newest first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<login_history::Model>> {
        page.apply(Self::scoped(caller).order_by_desc(login_history::Column::Timestamp))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    pub async fn create(&self, model: login_history::ActiveModel) -> AppResult<login_history::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    pub async fn update(&self, model: login_history::ActiveModel) -> AppResult<login_history::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<LoginHistory>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait};

    #[test]
    fn test_staff_sees_all_rows() {
        let regular = LoginHistoryRepository::scoped(&Caller::user("u1"))
            .build(DatabaseBackend::Postgres)
            .to_string();
        let staff = LoginHistoryRepository::scoped(&Caller::staff("u1"))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(regular.contains(r#""login_history"."user_id" = 'u1'"#));
        assert!(!staff.contains("user_id\" = 'u1'"));
    }
}
