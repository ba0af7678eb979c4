//! Note tag repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{NoteTag, note_tag};
use crate::{Caller, Page, map_db_err, scope};

/// Note tag repository for database operations.
#[derive(Clone)]
pub struct NoteTagRepository {
    db: Arc<DatabaseConnection>,
}

impl NoteTagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Tags on notes owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<NoteTag> {
        scope::by_note_owner(NoteTag::find(), note_tag::Column::NoteId, caller)
    }

    /// Find a tag by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<note_tag::Model>> {
        NoteTag::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a tag within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<note_tag::Model>> {
        Self::scoped(caller)
            .filter(note_tag::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's tags, in insertion order.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<note_tag::Model>> {
        let query = Self::scoped(caller).order_by_asc(note_tag::Column::Id);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new tag.
    pub async fn create(&self, model: note_tag::ActiveModel) -> AppResult<note_tag::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a tag.
    pub async fn update(&self, model: note_tag::ActiveModel) -> AppResult<note_tag::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a tag.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<NoteTag>(self.db.as_ref(), id).await
    }
}
