//! Note suggestion service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::note_suggestion;
use tasknote_db::repositories::{NoteRepository, NoteSuggestionRepository};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{not_found, now, owned_note};
use crate::validation::validate_not_blank;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NoteSuggestionInput {
    pub note: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub suggestion: String,

    #[serde(default)]
    pub applied: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NoteSuggestionPatch {
    pub note: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub suggestion: Option<String>,

    pub applied: Option<bool>,
}

impl From<NoteSuggestionInput> for NoteSuggestionPatch {
    fn from(input: NoteSuggestionInput) -> Self {
        Self {
            note: Some(input.note),
            suggestion: Some(input.suggestion),
            applied: Some(input.applied),
        }
    }
}

/// Service for suggestions attached to the caller's notes.
#[derive(Clone)]
pub struct NoteSuggestionService {
    suggestion_repo: NoteSuggestionRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl NoteSuggestionService {
    #[must_use]
    pub const fn new(suggestion_repo: NoteSuggestionRepository, note_repo: NoteRepository) -> Self {
        Self {
            suggestion_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<note_suggestion::Model>> {
        self.suggestion_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<note_suggestion::Model> {
        self.suggestion_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Note suggestion"))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: NoteSuggestionInput,
    ) -> AppResult<note_suggestion::Model> {
        input.validate()?;
        let note = owned_note(&self.note_repo, caller, &input.note).await?;

        let model = note_suggestion::ActiveModel {
            id: Set(self.id_gen.generate()),
            note_id: Set(note.id),
            suggestion: Set(input.suggestion),
            applied: Set(input.applied),
            created_at: Set(now()),
        };

        self.suggestion_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: NoteSuggestionInput,
    ) -> AppResult<note_suggestion::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: NoteSuggestionPatch,
    ) -> AppResult<note_suggestion::Model> {
        patch.validate()?;
        let suggestion = self.get(caller, id).await?;

        let mut model: note_suggestion::ActiveModel = suggestion.into();
        if let Some(note_id) = patch.note {
            let note = owned_note(&self.note_repo, caller, &note_id).await?;
            model.note_id = Set(note.id);
        }
        if let Some(text) = patch.suggestion {
            model.suggestion = Set(text);
        }
        if let Some(applied) = patch.applied {
            model.applied = Set(applied);
        }

        self.suggestion_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let suggestion = self.get(caller, id).await?;
        self.suggestion_repo.delete(&suggestion.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use tasknote_db::entities::note;

    #[tokio::test]
    async fn test_mark_applied() {
        let stored = note_suggestion::Model {
            id: "s1".to_string(),
            note_id: "n1".to_string(),
            suggestion: "Split into two notes".to_string(),
            applied: false,
            created_at: Utc::now().into(),
        };
        let applied = note_suggestion::Model {
            applied: true,
            ..stored.clone()
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored], [applied]])
                .into_connection(),
        );
        let service = NoteSuggestionService::new(
            NoteSuggestionRepository::new(db.clone()),
            NoteRepository::new(db),
        );

        let patch = NoteSuggestionPatch {
            applied: Some(true),
            ..Default::default()
        };
        let result = service.update(&Caller::user("u1"), "s1", patch).await.unwrap();
        assert!(result.applied);
    }

    #[tokio::test]
    async fn test_move_to_unowned_note() {
        let stored = note_suggestion::Model {
            id: "s1".to_string(),
            note_id: "n1".to_string(),
            suggestion: "Add a due date".to_string(),
            applied: false,
            created_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .append_query_results([Vec::<note::Model>::new()])
                .into_connection(),
        );
        let service = NoteSuggestionService::new(
            NoteSuggestionRepository::new(db.clone()),
            NoteRepository::new(db),
        );

        let patch = NoteSuggestionPatch {
            note: Some("n9".to_string()),
            ..Default::default()
        };
        let result = service.update(&Caller::user("u1"), "s1", patch).await;
        assert!(matches!(result, Err(tasknote_common::AppError::NotFound(_))));
    }
}
