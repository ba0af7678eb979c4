//! Category service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::Page;
use tasknote_db::entities::category;
use tasknote_db::repositories::CategoryRepository;
use validator::Validate;

use super::not_found;
use crate::validation::validate_not_blank;

/// Input for creating or replacing a category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryPatch {
    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    pub description: Option<String>,
}

impl From<CategoryInput> for CategoryPatch {
    fn from(input: CategoryInput) -> Self {
        Self {
            name: Some(input.name),
            description: Some(input.description),
        }
    }
}

/// Service for the shared category vocabulary.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
    id_gen: IdGenerator,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository) -> Self {
        Self {
            category_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(&self, page: Page) -> AppResult<Vec<category::Model>> {
        self.category_repo.list(page).await
    }

    pub async fn get(&self, id: &str) -> AppResult<category::Model> {
        self.category_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found("Category"))
    }

    pub async fn create(&self, input: CategoryInput) -> AppResult<category::Model> {
        input.validate()?;

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
        };

        self.category_repo.create(model).await
    }

    pub async fn replace(&self, id: &str, input: CategoryInput) -> AppResult<category::Model> {
        input.validate()?;
        self.update(id, input.into()).await
    }

    pub async fn update(&self, id: &str, patch: CategoryPatch) -> AppResult<category::Model> {
        patch.validate()?;
        let category = self.get(id).await?;

        let mut model: category::ActiveModel = category.into();
        if let Some(name) = patch.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = patch.description {
            model.description = Set(description);
        }

        self.category_repo.update(model).await
    }

    /// Delete a category. Note links to it go away with it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.category_repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use tasknote_common::AppError;

    #[tokio::test]
    async fn test_create_trims_name() {
        let stored = category::Model {
            id: "c1".to_string(),
            name: "Work".to_string(),
            description: String::new(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );
        let service = CategoryService::new(CategoryRepository::new(db.clone()));

        let input = CategoryInput {
            name: "  Work ".to_string(),
            description: String::new(),
        };
        service.create(input).await.unwrap();
        drop(service);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("\"Work\""));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = CategoryService::new(CategoryRepository::new(db));

        let input = CategoryInput {
            name: "   ".to_string(),
            description: String::new(),
        };
        let result = service.create(input).await;
        assert!(matches!(result, Err(AppError::Validation(f)) if f.contains("name")));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = CategoryService::new(CategoryRepository::new(db));

        let result = service.delete("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
