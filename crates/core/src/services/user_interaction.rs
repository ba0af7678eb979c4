//! User interaction service.
//!
//! Records how the caller interacted with a note (viewed, edited, shared,
//! rated). The note may be the caller's own or one shared with them.

use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::user_interaction;
use tasknote_db::repositories::{NoteRepository, UserInteractionRepository};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{deserialize_some, not_found, now, visible_note};
use crate::validation::{parse_choice, validate_interaction_type};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserInteractionInput {
    pub note: String,

    #[validate(custom(function = "validate_interaction_type"))]
    pub interaction_type: String,

    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserInteractionPatch {
    pub note: Option<String>,

    #[validate(custom(function = "validate_interaction_type"))]
    pub interaction_type: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub metadata: Option<Option<Value>>,
}

impl From<UserInteractionInput> for UserInteractionPatch {
    fn from(input: UserInteractionInput) -> Self {
        Self {
            note: Some(input.note),
            interaction_type: Some(input.interaction_type),
            metadata: Some(input.metadata),
        }
    }
}

#[derive(Clone)]
pub struct UserInteractionService {
    interaction_repo: UserInteractionRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl UserInteractionService {
    #[must_use]
    pub const fn new(interaction_repo: UserInteractionRepository, note_repo: NoteRepository) -> Self {
        Self {
            interaction_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<user_interaction::Model>> {
        self.interaction_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<user_interaction::Model> {
        self.interaction_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("User interaction"))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: UserInteractionInput,
    ) -> AppResult<user_interaction::Model> {
        input.validate()?;
        let interaction_type = parse_choice("interaction_type", &input.interaction_type)?;
        let note = visible_note(&self.note_repo, caller, &input.note).await?;

        let model = user_interaction::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(caller.user_id.clone()),
            note_id: Set(note.id),
            interaction_type: Set(interaction_type),
            metadata: Set(input.metadata),
            timestamp: Set(now()),
        };

        self.interaction_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: UserInteractionInput,
    ) -> AppResult<user_interaction::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: UserInteractionPatch,
    ) -> AppResult<user_interaction::Model> {
        patch.validate()?;
        let interaction = self.get(caller, id).await?;

        let mut model: user_interaction::ActiveModel = interaction.into();
        if let Some(note_id) = patch.note {
            let note = visible_note(&self.note_repo, caller, &note_id).await?;
            model.note_id = Set(note.id);
        }
        if let Some(interaction_type) = patch.interaction_type {
            model.interaction_type = Set(parse_choice("interaction_type", &interaction_type)?);
        }
        if let Some(metadata) = patch.metadata {
            model.metadata = Set(metadata);
        }

        self.interaction_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let interaction = self.get(caller, id).await?;
        self.interaction_repo.delete(&interaction.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::sync::Arc;
    use tasknote_common::AppError;
    use tasknote_db::entities::note;
    use tasknote_db::entities::user_interaction::InteractionType;

    #[test]
    fn test_unknown_interaction_type() {
        let input: UserInteractionInput =
            serde_json::from_value(json!({"note": "n1", "interaction_type": "like"})).unwrap();
        let err: AppError = input.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(f) if f.contains("interaction_type")));
    }

    #[tokio::test]
    async fn test_create_on_shared_note() {
        let shared = note::Model {
            id: "n1".to_string(),
            user_id: "owner".to_string(),
            title: "Trip plan".to_string(),
            content: String::new(),
            completed: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let interaction = user_interaction::Model {
            id: "i1".to_string(),
            user_id: "u2".to_string(),
            note_id: "n1".to_string(),
            interaction_type: InteractionType::View,
            metadata: Some(json!({"source": "inbox"})),
            timestamp: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[shared]])
                .append_query_results([[interaction]])
                .into_connection(),
        );
        let service = UserInteractionService::new(
            UserInteractionRepository::new(db.clone()),
            NoteRepository::new(db),
        );

        let input = UserInteractionInput {
            note: "n1".to_string(),
            interaction_type: "view".to_string(),
            metadata: Some(json!({"source": "inbox"})),
        };
        let created = service.create(&Caller::user("u2"), input).await.unwrap();
        assert_eq!(created.interaction_type, InteractionType::View);
    }
}
