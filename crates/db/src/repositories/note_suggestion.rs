//! Note suggestion repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{NoteSuggestion, note_suggestion};
use crate::{Caller, Page, map_db_err, scope};

/// Note suggestion repository for database operations.
#[derive(Clone)]
pub struct NoteSuggestionRepository {
    db: Arc<DatabaseConnection>,
}

impl NoteSuggestionRepository {
    /// Create a new suggestion repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Suggestions for notes owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<NoteSuggestion> {
        scope::by_note_owner(NoteSuggestion::find(), note_suggestion::Column::NoteId, caller)
    }

    /// Find a suggestion by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<note_suggestion::Model>> {
        NoteSuggestion::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a suggestion within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<note_suggestion::Model>> {
        Self::scoped(caller)
            .filter(note_suggestion::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's suggestions, newest first.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<note_suggestion::Model>> {
        let query = Self::scoped(caller).order_by_desc(note_suggestion::Column::CreatedAt);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new suggestion.
    pub async fn create(&self, model: note_suggestion::ActiveModel) -> AppResult<note_suggestion::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a suggestion.
    pub async fn update(&self, model: note_suggestion::ActiveModel) -> AppResult<note_suggestion::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a suggestion.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<NoteSuggestion>(self.db.as_ref(), id).await
    }
}
