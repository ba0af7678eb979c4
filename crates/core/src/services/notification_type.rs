//! Notification type service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::Page;
use tasknote_db::entities::notification_type;
use tasknote_db::repositories::NotificationTypeRepository;
use validator::Validate;

use super::not_found;
use crate::validation::validate_not_blank;

/// Input for creating or replacing a notification type.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NotificationTypeInput {
    #[validate(length(max = 50), custom(function = "validate_not_blank"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Message used for notifications created without one.
    pub template: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NotificationTypePatch {
    #[validate(length(max = 50), custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    pub description: Option<String>,

    pub template: Option<String>,
}

impl From<NotificationTypeInput> for NotificationTypePatch {
    fn from(input: NotificationTypeInput) -> Self {
        Self {
            name: Some(input.name),
            description: Some(input.description),
            template: Some(input.template),
        }
    }
}

/// Service for the notification type vocabulary.
#[derive(Clone)]
pub struct NotificationTypeService {
    type_repo: NotificationTypeRepository,
    id_gen: IdGenerator,
}

impl NotificationTypeService {
    /// Create a new notification type service.
    #[must_use]
    pub const fn new(type_repo: NotificationTypeRepository) -> Self {
        Self {
            type_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(&self, page: Page) -> AppResult<Vec<notification_type::Model>> {
        self.type_repo.list(page).await
    }

    pub async fn get(&self, id: &str) -> AppResult<notification_type::Model> {
        self.type_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found("Notification type"))
    }

    pub async fn create(
        &self,
        input: NotificationTypeInput,
    ) -> AppResult<notification_type::Model> {
        input.validate()?;

        let model = notification_type::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            description: Set(input.description),
            template: Set(input.template),
        };

        self.type_repo.create(model).await
    }

    pub async fn replace(
        &self,
        id: &str,
        input: NotificationTypeInput,
    ) -> AppResult<notification_type::Model> {
        input.validate()?;
        self.update(id, input.into()).await
    }

    pub async fn update(
        &self,
        id: &str,
        patch: NotificationTypePatch,
    ) -> AppResult<notification_type::Model> {
        patch.validate()?;
        let kind = self.get(id).await?;

        let mut model: notification_type::ActiveModel = kind.into();
        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(description) = patch.description {
            model.description = Set(description);
        }
        if let Some(template) = patch.template {
            model.template = Set(template);
        }

        self.type_repo.update(model).await
    }

    /// Delete a notification type. Refused while notifications use it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.type_repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::sync::Arc;
    use tasknote_common::AppError;

    #[test]
    fn test_template_required() {
        let result: Result<NotificationTypeInput, _> =
            serde_json::from_str(r#"{"name": "reminder"}"#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_in_use() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "count" => Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );
        let service = NotificationTypeService::new(NotificationTypeRepository::new(db));

        let result = service.delete("t1").await;
        assert!(matches!(result, Err(AppError::Protected(_))));
    }
}
