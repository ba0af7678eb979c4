//! Sharing repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{Sharing, sharing};
use crate::{Caller, Page, map_db_err};

/// Sharing repository for database operations.
#[derive(Clone)]
pub struct SharingRepository {
    db: Arc<DatabaseConnection>,
}

impl SharingRepository {
    /// Create a new sharing repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Shares whose recipient is `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<Sharing> {
        Sharing::find().filter(sharing::Column::SharedWithId.eq(caller.user_id.as_str()))
    }

    /// Find a share within the caller's scope.
    pub async fn find_scoped(&self, caller: &Caller, id: &str) -> AppResult<Option<sharing::Model>> {
        Self::scoped(caller)
            .filter(sharing::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List shares received by the caller, newest first.
    pub async fn list_scoped(&self, caller: &Caller, page: Page) -> AppResult<Vec<sharing::Model>> {
        page.apply(Self::scoped(caller).order_by_desc(sharing::Column::SharedAt))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find the share of a note with a given user.
    pub async fn find_by_note_and_user(
        &self,
        note_id: &str,
        user_id: &str,
    ) -> AppResult<Option<sharing::Model>> {
        Sharing::find()
            .filter(sharing::Column::NoteId.eq(note_id))
            .filter(sharing::Column::SharedWithId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new share.
    pub async fn create(&self, model: sharing::ActiveModel) -> AppResult<sharing::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a share.
    pub async fn update(&self, model: sharing::ActiveModel) -> AppResult<sharing::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a share.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<Sharing>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    #[test]
    fn test_scope_is_recipient() {
        let sql = SharingRepository::scoped(&Caller::user("u2"))
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""sharing"."shared_with_id" = 'u2'"#));
    }

    #[tokio::test]
    async fn test_find_by_note_and_user() {
        let share = sharing::Model {
            id: "s1".to_string(),
            note_id: "n1".to_string(),
            shared_with_id: "u2".to_string(),
            can_edit: false,
            shared_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[share]])
                .into_connection(),
        );

        let repo = SharingRepository::new(db);
        let result = repo.find_by_note_and_user("n1", "u2").await.unwrap();

        assert!(result.is_some_and(|s| !s.can_edit));
    }
}
