//! Note tag service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::note_tag;
use tasknote_db::repositories::{NoteRepository, NoteTagRepository};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{not_found, owned_note};
use crate::validation::validate_not_blank;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NoteTagInput {
    pub note: String,

    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    pub tag: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NoteTagPatch {
    pub note: Option<String>,

    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    pub tag: Option<String>,
}

impl From<NoteTagInput> for NoteTagPatch {
    fn from(input: NoteTagInput) -> Self {
        Self {
            note: Some(input.note),
            tag: Some(input.tag),
        }
    }
}

/// Service for free-form tags on the caller's notes. A tag appears at most
/// once per note.
#[derive(Clone)]
pub struct NoteTagService {
    tag_repo: NoteTagRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl NoteTagService {
    #[must_use]
    pub const fn new(tag_repo: NoteTagRepository, note_repo: NoteRepository) -> Self {
        Self {
            tag_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<note_tag::Model>> {
        self.tag_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<note_tag::Model> {
        self.tag_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Note tag"))
    }

    pub async fn create(&self, caller: &Caller, input: NoteTagInput) -> AppResult<note_tag::Model> {
        input.validate()?;
        let note = owned_note(&self.note_repo, caller, &input.note).await?;

        let model = note_tag::ActiveModel {
            id: Set(self.id_gen.generate()),
            note_id: Set(note.id),
            tag: Set(input.tag.trim().to_string()),
        };

        self.tag_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: NoteTagInput,
    ) -> AppResult<note_tag::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: NoteTagPatch,
    ) -> AppResult<note_tag::Model> {
        patch.validate()?;
        let tag = self.get(caller, id).await?;

        let mut model: note_tag::ActiveModel = tag.into();
        if let Some(note_id) = patch.note {
            let note = owned_note(&self.note_repo, caller, &note_id).await?;
            model.note_id = Set(note.id);
        }
        if let Some(tag) = patch.tag {
            model.tag = Set(tag.trim().to_string());
        }

        self.tag_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let tag = self.get(caller, id).await?;
        self.tag_repo.delete(&tag.id).await
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
    async fn test_create() {
        let note = note::Model {
            id: "n1".to_string(),
            user_id: "u1".to_string(),
            title: "Groceries".to_string(),
            content: String::new(),
            completed: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let tag = note_tag::Model {
            id: "t1".to_string(),
            note_id: "n1".to_string(),
            tag: "shopping".to_string(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[note]])
                .append_query_results([[tag]])
                .into_connection(),
        );
        let service = NoteTagService::new(NoteTagRepository::new(db.clone()), NoteRepository::new(db));

        let input = NoteTagInput {
            note: "n1".to_string(),
            tag: " shopping ".to_string(),
        };
        let created = service.create(&Caller::user("u1"), input).await.unwrap();
        assert_eq!(created.tag, "shopping");
    }
}
