//! Note history service.
//!
//! History rows are written automatically when a note's content changes;
//! the CRUD surface here exists for corrections and imports.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppError, AppResult, IdGenerator};
use tasknote_db::entities::note_history;
use tasknote_db::repositories::{NoteHistoryRepository, NoteRepository, UserRepository};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{not_found, now, owned_note, usernames};

/// A history row and its editor's username, if the editor still exists.
pub type NoteHistoryWithEditor = (note_history::Model, Option<String>);

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NoteHistoryInput {
    pub note: String,

    #[serde(default)]
    pub previous_content: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NoteHistoryPatch {
    pub note: Option<String>,

    pub previous_content: Option<String>,
}

impl From<NoteHistoryInput> for NoteHistoryPatch {
    fn from(input: NoteHistoryInput) -> Self {
        Self {
            note: Some(input.note),
            previous_content: Some(input.previous_content),
        }
    }
}

#[derive(Clone)]
pub struct NoteHistoryService {
    history_repo: NoteHistoryRepository,
    note_repo: NoteRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl NoteHistoryService {
    #[must_use]
    pub const fn new(
        history_repo: NoteHistoryRepository,
        note_repo: NoteRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            history_repo,
            note_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Edits of the caller's notes, most recent first.
    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<NoteHistoryWithEditor>> {
        let rows = self.history_repo.list_scoped(caller, page).await?;
        self.with_editors(rows).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<NoteHistoryWithEditor> {
        let row = self.find(caller, id).await?;
        self.with_editor(row).await
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: NoteHistoryInput,
    ) -> AppResult<NoteHistoryWithEditor> {
        input.validate()?;
        let note = owned_note(&self.note_repo, caller, &input.note).await?;

        let model = note_history::ActiveModel {
            id: Set(self.id_gen.generate()),
            note_id: Set(note.id),
            edited_by_id: Set(Some(caller.user_id.clone())),
            previous_content: Set(input.previous_content),
            edited_at: Set(now()),
        };

        let row = self.history_repo.create(model).await?;
        self.with_editor(row).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: NoteHistoryInput,
    ) -> AppResult<NoteHistoryWithEditor> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: NoteHistoryPatch,
    ) -> AppResult<NoteHistoryWithEditor> {
        patch.validate()?;
        let row = self.find(caller, id).await?;

        let mut model: note_history::ActiveModel = row.into();
        if let Some(note_id) = patch.note {
            let note = owned_note(&self.note_repo, caller, &note_id).await?;
            model.note_id = Set(note.id);
        }
        if let Some(previous_content) = patch.previous_content {
            model.previous_content = Set(previous_content);
        }

        let row = self.history_repo.update(model).await?;
        self.with_editor(row).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let row = self.find(caller, id).await?;
        self.history_repo.delete(&row.id).await
    }

    async fn find(&self, caller: &Caller, id: &str) -> AppResult<note_history::Model> {
        self.history_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Note history"))
    }

    async fn with_editor(&self, row: note_history::Model) -> AppResult<NoteHistoryWithEditor> {
        self.with_editors(vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("History projection missing".to_string()))
    }

    async fn with_editors(
        &self,
        rows: Vec<note_history::Model>,
    ) -> AppResult<Vec<NoteHistoryWithEditor>> {
        let names = usernames(
            &self.user_repo,
            rows.iter().filter_map(|h| h.edited_by_id.as_deref()),
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|h| {
                let editor = h.edited_by_id.as_ref().and_then(|id| names.get(id).cloned());
                (h, editor)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_out_of_scope() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<note_history::Model>::new()])
                .into_connection(),
        );
        let service = NoteHistoryService::new(
            NoteHistoryRepository::new(db.clone()),
            NoteRepository::new(db.clone()),
            UserRepository::new(db),
        );

        let result = service.get(&Caller::user("u2"), "h1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_editor_deleted() {
        let row = note_history::Model {
            id: "h1".to_string(),
            note_id: "n1".to_string(),
            edited_by_id: None,
            previous_content: "old".to_string(),
            edited_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );
        let service = NoteHistoryService::new(
            NoteHistoryRepository::new(db.clone()),
            NoteRepository::new(db.clone()),
            UserRepository::new(db),
        );

        let (row, editor) = service.get(&Caller::user("u1"), "h1").await.unwrap();
        assert_eq!(row.previous_content, "old");
        assert!(editor.is_none());
    }
}
