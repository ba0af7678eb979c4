//! Note entity repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{NoteEntity, note_entity};
use crate::{Caller, Page, map_db_err, scope};

/// Note entity repository for database operations.
#[derive(Clone)]
pub struct NoteEntityRepository {
    db: Arc<DatabaseConnection>,
}

impl NoteEntityRepository {
    /// Create a new note entity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Entities extracted from notes owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<NoteEntity> {
        scope::by_note_owner(NoteEntity::find(), note_entity::Column::NoteId, caller)
    }

    /// Find a note entity by ID, ignoring ownership.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<note_entity::Model>> {
        NoteEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a note entity within the caller's scope.
    pub async fn find_scoped(
        &self,
        caller: &Caller,
        id: &str,
    ) -> AppResult<Option<note_entity::Model>> {
        Self::scoped(caller)
            .filter(note_entity::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's note entities, in insertion order.
    pub async fn list_scoped(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<note_entity::Model>> {
        let query = Self::scoped(caller).order_by_asc(note_entity::Column::Id);
        page.apply(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new note entity.
    pub async fn create(&self, model: note_entity::ActiveModel) -> AppResult<note_entity::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a note entity.
    pub async fn update(&self, model: note_entity::ActiveModel) -> AppResult<note_entity::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a note entity.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<NoteEntity>(self.db.as_ref(), id).await
    }
}
