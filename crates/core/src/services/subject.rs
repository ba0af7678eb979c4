//! Subject service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::Page;
use tasknote_db::entities::subject;
use tasknote_db::repositories::SubjectRepository;
use validator::Validate;

use super::not_found;
use crate::validation::validate_not_blank;

/// Input for creating or replacing a subject.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubjectInput {
    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubjectPatch {
    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    pub description: Option<String>,
}

impl From<SubjectInput> for SubjectPatch {
    fn from(input: SubjectInput) -> Self {
        Self {
            name: Some(input.name),
            description: Some(input.description),
        }
    }
}

/// Service for the shared subject vocabulary (school subjects, topics).
#[derive(Clone)]
pub struct SubjectService {
    subject_repo: SubjectRepository,
    id_gen: IdGenerator,
}

impl SubjectService {
    /// Create a new subject service.
    #[must_use]
    pub const fn new(subject_repo: SubjectRepository) -> Self {
        Self {
            subject_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(&self, page: Page) -> AppResult<Vec<subject::Model>> {
        self.subject_repo.list(page).await
    }

    pub async fn get(&self, id: &str) -> AppResult<subject::Model> {
        self.subject_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found("Subject"))
    }

    pub async fn create(&self, input: SubjectInput) -> AppResult<subject::Model> {
        input.validate()?;

        let model = subject::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
        };

        self.subject_repo.create(model).await
    }

    pub async fn replace(&self, id: &str, input: SubjectInput) -> AppResult<subject::Model> {
        input.validate()?;
        self.update(id, input.into()).await
    }

    pub async fn update(&self, id: &str, patch: SubjectPatch) -> AppResult<subject::Model> {
        patch.validate()?;
        let subject = self.get(id).await?;

        let mut model: subject::ActiveModel = subject.into();
        if let Some(name) = patch.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = patch.description {
            model.description = Set(description);
        }

        self.subject_repo.update(model).await
    }

    /// Delete a subject and its note links.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.subject_repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use tasknote_common::AppError;

    #[tokio::test]
    async fn test_create_trims_name() {
        let stored = subject::Model {
            id: "c1".to_string(),
            name: "Math".to_string(),
            description: String::new(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );
        let service = SubjectService::new(SubjectRepository::new(db.clone()));

        let input = SubjectInput {
            name: " Math  ".to_string(),
            description: String::new(),
        };
        service.create(input).await.unwrap();
        drop(service);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = format!("{:?}", log[0]);
        assert!(sql.contains("\"Math\""));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = SubjectService::new(SubjectRepository::new(db));

        let input = SubjectInput {
            name: "   ".to_string(),
            description: String::new(),
        };
        let result = service.create(input).await;
        assert!(matches!(result, Err(AppError::Validation(f)) if f.contains("name")));
    }

    #[tokio::test]
    async fn test_patch_keeps_unset_fields() {
        let stored = subject::Model {
            id: "s1".to_string(),
            name: "Math".to_string(),
            description: "Algebra and geometry".to_string(),
        };
        let renamed = subject::Model {
            name: "Mathematics".to_string(),
            ..stored.clone()
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored], [renamed]])
                .into_connection(),
        );
        let service = SubjectService::new(SubjectRepository::new(db));

        let patch = SubjectPatch {
            name: Some("Mathematics".to_string()),
            description: None,
        };
        let updated = service.update("s1", patch).await.unwrap();
        assert_eq!(updated.name, "Mathematics");
        assert_eq!(updated.description, "Algebra and geometry");
    }
}
