//! Subject repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{Subject, subject};
use crate::{Page, map_db_err};

/// Subject repository for database operations.
#[derive(Clone)]
pub struct SubjectRepository {
    db: Arc<DatabaseConnection>,
}

impl SubjectRepository {
    /// Create a new subject repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<subject::Model>> {
        Subject::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<subject::Model>> {
        Subject::find()
            .filter(subject::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Fetch the rows among `ids` that exist.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<subject::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        Subject::find()
            .filter(subject::Column::Id.is_in(ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List by name.
    pub async fn list(&self, page: Page) -> AppResult<Vec<subject::Model>> {
        page.apply(Subject::find().order_by_asc(subject::Column::Name))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    pub async fn create(&self, model: subject::ActiveModel) -> AppResult<subject::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    pub async fn update(&self, model: subject::ActiveModel) -> AppResult<subject::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a subject; links to notes go with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<Subject>(self.db.as_ref(), id).await
    }
}
