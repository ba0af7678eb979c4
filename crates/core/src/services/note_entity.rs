//! Note entity service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::note_entity;
use tasknote_db::repositories::{NoteEntityRepository, NoteRepository};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{not_found, owned_note};

/// Input for an extracted entity (a person, date, place... named in a note).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NoteEntityInput {
    pub note: String,

    #[validate(length(min = 1, max = 100))]
    pub entity_type: String,

    #[validate(length(min = 1, max = 255))]
    pub entity_value: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NoteEntityPatch {
    pub note: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub entity_type: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub entity_value: Option<String>,
}

impl From<NoteEntityInput> for NoteEntityPatch {
    fn from(input: NoteEntityInput) -> Self {
        Self {
            note: Some(input.note),
            entity_type: Some(input.entity_type),
            entity_value: Some(input.entity_value),
        }
    }
}

#[derive(Clone)]
pub struct NoteEntityService {
    entity_repo: NoteEntityRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl NoteEntityService {
    #[must_use]
    pub const fn new(entity_repo: NoteEntityRepository, note_repo: NoteRepository) -> Self {
        Self {
            entity_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<note_entity::Model>> {
        self.entity_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<note_entity::Model> {
        self.entity_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Note entity"))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: NoteEntityInput,
    ) -> AppResult<note_entity::Model> {
        input.validate()?;
        let note = owned_note(&self.note_repo, caller, &input.note).await?;

        let model = note_entity::ActiveModel {
            id: Set(self.id_gen.generate()),
            note_id: Set(note.id),
            entity_type: Set(input.entity_type),
            entity_value: Set(input.entity_value),
        };

        self.entity_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: NoteEntityInput,
    ) -> AppResult<note_entity::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: NoteEntityPatch,
    ) -> AppResult<note_entity::Model> {
        patch.validate()?;
        let entity = self.get(caller, id).await?;

        let mut model: note_entity::ActiveModel = entity.into();
        if let Some(note_id) = patch.note {
            let note = owned_note(&self.note_repo, caller, &note_id).await?;
            model.note_id = Set(note.id);
        }
        if let Some(entity_type) = patch.entity_type {
            model.entity_type = Set(entity_type);
        }
        if let Some(entity_value) = patch.entity_value {
            model.entity_value = Set(entity_value);
        }

        self.entity_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let entity = self.get(caller, id).await?;
        self.entity_repo.delete(&entity.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_rejected() {
        let input = NoteEntityInput {
            note: "n1".to_string(),
            entity_type: String::new(),
            entity_value: "x".repeat(300),
        };
        let err = input.validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("entity_type"));
        assert!(fields.contains_key("entity_value"));
    }
}
