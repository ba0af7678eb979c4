//! User interaction repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{UserInteraction, user_interaction};
use crate::{Caller, Page, map_db_err};

/// User interaction repository for database operations.
#[derive(Clone)]
pub struct UserInteractionRepository {
    db: Arc<DatabaseConnection>,
}

impl UserInteractionRepository {
    /// Create a new user interaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Interactions performed by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<UserInteraction> {
        UserInteraction::find()
            .filter(user_interaction::Column::UserId.eq(caller.user_id.as_str()))
    }

    /// Find a user interaction by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user_interaction::Model>> {
        UserInteraction::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user interaction within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<user_interaction::Model>> {
        Self::scoped(caller)
            .filter(user_interaction::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's interactions, newest first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<user_interaction::Model>> {
        let query = Self::scoped(caller).order_by_desc(user_interaction::Column::Timestamp);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new user interaction.
    pub async fn create(&self, model: user_interaction::ActiveModel) -> AppResult<user_interaction::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a user interaction.
    pub async fn update(&self, model: user_interaction::ActiveModel) -> AppResult<user_interaction::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a user interaction.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<UserInteraction>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user_interaction::InteractionType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_list_scoped() {
        let interaction = user_interaction::Model {
            id: "i1".to_string(),
            user_id: "u1".to_string(),
            note_id: "n1".to_string(),
            interaction_type: InteractionType::View,
            metadata: Some(serde_json::json!({"source": "search"})),
            timestamp: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[interaction]])
                .into_connection(),
        );

        let repo = UserInteractionRepository::new(db);
        let result = repo
            .list_scoped(&Caller::user("u1"), Page::default())
            .await
            .unwrap();

        assert_eq!(result[0].interaction_type, InteractionType::View);
    }
}
