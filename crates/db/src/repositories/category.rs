//! Category repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{Category, category};
use crate::{Page, map_db_err};

/// Category repository for database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<category::Model>> {
        Category::find()
            .filter(category::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Fetch the rows among `ids` that exist.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<category::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        Category::find()
            .filter(category::Column::Id.is_in(ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List by name.
    pub async fn list(&self, page: Page) -> AppResult<Vec<category::Model>> {
        page.apply(Category::find().order_by_asc(category::Column::Name))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    pub async fn create(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    pub async fn update(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a category; links to notes go with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<Category>(self.db.as_ref(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_category(id: &str, name: &str) -> category::Model {
        category::Model {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_find_by_ids_returns_existing_only() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_category("c1", "Work")]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let found = repo
            .find_by_ids(&["c1".to_string(), "missing".to_string()])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Work");
    }

    #[tokio::test]
    async fn test_list() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_category("c2", "Home"),
                    create_test_category("c1", "Work"),
                ]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let result = repo.list(Page::default()).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
