//! Chat interaction repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{ChatInteraction, chat_interaction};
use crate::{Caller, Page, map_db_err};

/// Chat interaction repository for database operations.
#[derive(Clone)]
pub struct ChatInteractionRepository {
    db: Arc<DatabaseConnection>,
}

impl ChatInteractionRepository {
    /// Create a new chat interaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Chat interactions owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<ChatInteraction> {
        ChatInteraction::find()
            .filter(chat_interaction::Column::UserId.eq(caller.user_id.as_str()))
    }

    /// Find a chat interaction by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<chat_interaction::Model>> {
        ChatInteraction::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a chat interaction within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<chat_interaction::Model>> {
        Self::scoped(caller)
            .filter(chat_interaction::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's chat interactions, newest first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<chat_interaction::Model>> {
        let query = Self::scoped(caller).order_by_desc(chat_interaction::Column::Timestamp);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new chat interaction.
    pub async fn create(&self, model: chat_interaction::ActiveModel) -> AppResult<chat_interaction::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a chat interaction.
    pub async fn update(&self, model: chat_interaction::ActiveModel) -> AppResult<chat_interaction::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a chat interaction.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<ChatInteraction>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_list_scoped() {
        let chat = chat_interaction::Model {
            id: "ch1".to_string(),
            user_id: "u1".to_string(),
            message: "What is due today?".to_string(),
            response: "Two notes.".to_string(),
            timestamp: Utc::now().into(),
            note_context_id: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[chat]])
                .into_connection(),
        );

        let repo = ChatInteractionRepository::new(db);
        let result = repo
            .list_scoped(&Caller::user("u1"), Page::new(10, 0))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].note_context_id.is_none());
    }
}
