//! Chat interaction service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::chat_interaction;
use tasknote_db::repositories::{ChatInteractionRepository, NoteRepository};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{deserialize_some, not_found, now, visible_note};
use crate::validation::validate_not_blank;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatInteractionInput {
    #[validate(custom(function = "validate_not_blank"))]
    pub message: String,

    #[serde(default)]
    pub response: String,

    /// Note the exchange was about.
    #[serde(default)]
    pub note_context: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ChatInteractionPatch {
    #[validate(custom(function = "validate_not_blank"))]
    pub message: Option<String>,

    pub response: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub note_context: Option<Option<String>>,
}

impl From<ChatInteractionInput> for ChatInteractionPatch {
    fn from(input: ChatInteractionInput) -> Self {
        Self {
            message: Some(input.message),
            response: Some(input.response),
            note_context: Some(input.note_context),
        }
    }
}

/// Service for the caller's chat exchanges.
#[derive(Clone)]
pub struct ChatInteractionService {
    chat_repo: ChatInteractionRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl ChatInteractionService {
    #[must_use]
    pub const fn new(chat_repo: ChatInteractionRepository, note_repo: NoteRepository) -> Self {
        Self {
            chat_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<chat_interaction::Model>> {
        self.chat_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<chat_interaction::Model> {
        self.chat_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Chat interaction"))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: ChatInteractionInput,
    ) -> AppResult<chat_interaction::Model> {
        input.validate()?;
        let note_context_id = self.resolve_context(caller, input.note_context).await?;

        let model = chat_interaction::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(caller.user_id.clone()),
            message: Set(input.message),
            response: Set(input.response),
            timestamp: Set(now()),
            note_context_id: Set(note_context_id),
        };

        self.chat_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: ChatInteractionInput,
    ) -> AppResult<chat_interaction::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: ChatInteractionPatch,
    ) -> AppResult<chat_interaction::Model> {
        patch.validate()?;
        let chat = self.get(caller, id).await?;

        let mut model: chat_interaction::ActiveModel = chat.into();
        if let Some(message) = patch.message {
            model.message = Set(message);
        }
        if let Some(response) = patch.response {
            model.response = Set(response);
        }
        if let Some(note_context) = patch.note_context {
            model.note_context_id = Set(self.resolve_context(caller, note_context).await?);
        }

        self.chat_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let chat = self.get(caller, id).await?;
        self.chat_repo.delete(&chat.id).await
    }

    async fn resolve_context(
        &self,
        caller: &Caller,
        note_id: Option<String>,
    ) -> AppResult<Option<String>> {
        match note_id {
            Some(id) => Ok(Some(visible_note(&self.note_repo, caller, &id).await?.id)),
            None => Ok(None),
        }
    }
}
