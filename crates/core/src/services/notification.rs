//! Notification service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppError, AppResult, IdGenerator};
use tasknote_db::entities::{notification, notification_type};
use tasknote_db::repositories::{
    NoteRepository, NotificationRepository, NotificationTypeRepository, NotificationWithType,
};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{deserialize_some, not_found, now, visible_note};

/// Input for creating or replacing a notification.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NotificationInput {
    pub type_id: String,

    /// Optional note the notification is about.
    #[serde(default)]
    pub note: Option<String>,

    /// Falls back to the type's template when absent or blank.
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NotificationPatch {
    pub type_id: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub note: Option<Option<String>>,

    pub message: Option<String>,

    pub read: Option<bool>,
}

impl From<NotificationInput> for NotificationPatch {
    fn from(input: NotificationInput) -> Self {
        Self {
            type_id: Some(input.type_id),
            note: Some(input.note),
            message: input.message,
            read: Some(input.read),
        }
    }
}

/// Service for a user's notifications.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    type_repo: NotificationTypeRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(
        notification_repo: NotificationRepository,
        type_repo: NotificationTypeRepository,
        note_repo: NoteRepository,
    ) -> Self {
        Self {
            notification_repo,
            type_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List the caller's notifications, newest first.
    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<NotificationWithType>> {
        self.notification_repo.list_scoped(caller, page).await
    }

    /// List the caller's unread notifications, newest first.
    pub async fn list_unread(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<NotificationWithType>> {
        self.notification_repo.list_unread(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<NotificationWithType> {
        self.notification_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Notification"))
    }

    /// Create a notification for the caller.
    pub async fn create(
        &self,
        caller: &Caller,
        input: NotificationInput,
    ) -> AppResult<NotificationWithType> {
        input.validate()?;

        let kind = self.resolve_type(&input.type_id).await?;
        if let Some(note_id) = &input.note {
            visible_note(&self.note_repo, caller, note_id).await?;
        }
        let message = match input.message {
            Some(message) if !message.trim().is_empty() => message,
            _ => kind.template.clone(),
        };

        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            type_id: Set(kind.id.clone()),
            user_id: Set(caller.user_id.clone()),
            note_id: Set(input.note),
            message: Set(message),
            sent_at: Set(now()),
            read: Set(input.read),
        };

        let created = self.notification_repo.create(model).await?;
        Ok((created, Some(kind)))
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: NotificationInput,
    ) -> AppResult<NotificationWithType> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: NotificationPatch,
    ) -> AppResult<NotificationWithType> {
        patch.validate()?;
        let (notification, current_type) = self.get(caller, id).await?;

        let kind = match &patch.type_id {
            Some(type_id) => Some(self.resolve_type(type_id).await?),
            None => current_type,
        };
        if let Some(Some(note_id)) = &patch.note {
            visible_note(&self.note_repo, caller, note_id).await?;
        }

        let mut model: notification::ActiveModel = notification.into();
        if let Some(kind) = &kind {
            model.type_id = Set(kind.id.clone());
        }
        if let Some(note) = patch.note {
            model.note_id = Set(note);
        }
        if let Some(message) = patch.message {
            model.message = Set(message);
        }
        if let Some(read) = patch.read {
            model.read = Set(read);
        }

        let updated = self.notification_repo.update(model).await?;
        Ok((updated, kind))
    }

    /// Mark one notification as read.
    pub async fn mark_read(&self, caller: &Caller, id: &str) -> AppResult<NotificationWithType> {
        let patch = NotificationPatch {
            read: Some(true),
            ..Default::default()
        };
        self.update(caller, id, patch).await
    }

    /// Mark all of the caller's notifications as read. Returns how many
    /// changed.
    pub async fn mark_all_read(&self, caller: &Caller) -> AppResult<u64> {
        let count = self.notification_repo.mark_all_read(caller).await?;
        tracing::debug!(user_id = %caller.user_id, count, "Marked notifications read");
        Ok(count)
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let (notification, _) = self.get(caller, id).await?;
        self.notification_repo.delete(&notification.id).await
    }

    async fn resolve_type(&self, type_id: &str) -> AppResult<notification_type::Model> {
        self.type_repo
            .find_by_id(type_id)
            .await?
            .ok_or_else(|| {
                AppError::field("type_id", format!("Invalid pk \"{type_id}\" - object does not exist."))
            })
    }
}
