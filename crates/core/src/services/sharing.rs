//! Sharing service.
//!
//! A share grants another user read (and optionally edit) access to a note.
//! Shares are created by the note's owner but belong to the recipient: the
//! recipient lists, updates and removes them.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppError, AppResult, IdGenerator};
use tasknote_db::entities::sharing;
use tasknote_db::repositories::{NoteRepository, SharingRepository, UserRepository};
use tasknote_db::{Caller, Page};
use tracing::info;
use validator::Validate;

use super::{not_found, now, owned_note};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SharingInput {
    pub note: String,

    /// Recipient user id.
    pub shared_with: String,

    #[serde(default)]
    pub can_edit: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SharingPatch {
    pub note: Option<String>,

    pub shared_with: Option<String>,

    pub can_edit: Option<bool>,
}

impl From<SharingInput> for SharingPatch {
    fn from(input: SharingInput) -> Self {
        Self {
            note: Some(input.note),
            shared_with: Some(input.shared_with),
            can_edit: Some(input.can_edit),
        }
    }
}

#[derive(Clone)]
pub struct SharingService {
    sharing_repo: SharingRepository,
    note_repo: NoteRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl SharingService {
    #[must_use]
    pub const fn new(
        sharing_repo: SharingRepository,
        note_repo: NoteRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            sharing_repo,
            note_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Shares received by the caller.
    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<sharing::Model>> {
        self.sharing_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<sharing::Model> {
        self.sharing_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Sharing"))
    }

    /// Share one of the caller's notes with another user.
    pub async fn create(&self, caller: &Caller, input: SharingInput) -> AppResult<sharing::Model> {
        input.validate()?;
        let note = owned_note(&self.note_repo, caller, &input.note).await?;
        let recipient = self.recipient(&input.shared_with).await?;

        if self
            .sharing_repo
            .find_by_note_and_user(&note.id, &recipient)
            .await?
            .is_some()
        {
            return Err(AppError::field(
                "shared_with",
                "This note is already shared with that user.",
            ));
        }

        let model = sharing::ActiveModel {
            id: Set(self.id_gen.generate()),
            note_id: Set(note.id),
            shared_with_id: Set(recipient),
            can_edit: Set(input.can_edit),
            shared_at: Set(now()),
        };

        let share = self.sharing_repo.create(model).await?;
        info!(note_id = %share.note_id, shared_with = %share.shared_with_id, "Note shared");
        Ok(share)
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: SharingInput,
    ) -> AppResult<sharing::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    /// Update a share the caller received.
    ///
    /// The recipient may only toggle `can_edit`. Moving the share to another
    /// note or recipient takes the owner of the current note.
    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: SharingPatch,
    ) -> AppResult<sharing::Model> {
        patch.validate()?;
        let share = self.get(caller, id).await?;

        let note_id = patch.note.filter(|n| *n != share.note_id);
        let shared_with = patch.shared_with.filter(|u| *u != share.shared_with_id);

        let mut model: sharing::ActiveModel = share.clone().into();
        if note_id.is_some() || shared_with.is_some() {
            owned_note(&self.note_repo, caller, &share.note_id).await?;

            let target_note = match note_id {
                Some(note_id) => owned_note(&self.note_repo, caller, &note_id).await?.id,
                None => share.note_id.clone(),
            };
            let target_user = match shared_with {
                Some(user_id) => self.recipient(&user_id).await?,
                None => share.shared_with_id.clone(),
            };
            if self
                .sharing_repo
                .find_by_note_and_user(&target_note, &target_user)
                .await?
                .is_some()
            {
                return Err(AppError::field(
                    "shared_with",
                    "This note is already shared with that user.",
                ));
            }

            model.note_id = Set(target_note);
            model.shared_with_id = Set(target_user);
        }
        if let Some(can_edit) = patch.can_edit {
            model.can_edit = Set(can_edit);
        }

        self.sharing_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let share = self.get(caller, id).await?;
        self.sharing_repo.delete(&share.id).await
    }

    async fn recipient(&self, user_id: &str) -> AppResult<String> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(|u| u.id)
            .ok_or_else(|| AppError::field("shared_with", format!("Unknown user \"{user_id}\".")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;
    use tasknote_db::entities::{note, user};

    fn service(db: Arc<DatabaseConnection>) -> SharingService {
        SharingService::new(
            SharingRepository::new(db.clone()),
            NoteRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    fn create_test_note() -> note::Model {
        note::Model {
            id: "n1".to_string(),
            user_id: "u1".to_string(),
            title: "Trip plan".to_string(),
            content: String::new(),
            completed: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn create_test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user_{id}"),
            email: format!("{id}@example.com"),
            password: String::new(),
            date_of_birth: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login: None,
            created_at: Utc::now().into(),
        }
    }

    fn input() -> SharingInput {
        SharingInput {
            note: "n1".to_string(),
            shared_with: "u2".to_string(),
            can_edit: true,
        }
    }

    #[tokio::test]
    async fn test_create() {
        let share = sharing::Model {
            id: "s1".to_string(),
            note_id: "n1".to_string(),
            shared_with_id: "u2".to_string(),
            can_edit: true,
            shared_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_note()]])
                .append_query_results([[create_test_user("u2")]])
                .append_query_results([Vec::<sharing::Model>::new()])
                .append_query_results([[share]])
                .into_connection(),
        );

        let created = service(db).create(&Caller::user("u1"), input()).await.unwrap();
        assert_eq!(created.shared_with_id, "u2");
        assert!(created.can_edit);
    }

    #[tokio::test]
    async fn test_unknown_recipient() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_note()]])
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service(db).create(&Caller::user("u1"), input()).await;
        assert!(matches!(result, Err(AppError::Validation(f)) if f.contains("shared_with")));
    }

    #[tokio::test]
    async fn test_share_of_unowned_note() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<note::Model>::new()])
                .into_connection(),
        );

        let result = service(db).create(&Caller::user("u3"), input()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    fn create_test_share() -> sharing::Model {
        sharing::Model {
            id: "s1".to_string(),
            note_id: "n1".to_string(),
            shared_with_id: "u2".to_string(),
            can_edit: false,
            shared_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_recipient_cannot_retarget_share() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // share lookup scoped to the recipient
                .append_query_results([[create_test_share()]])
                // ownership check on the current note
                .append_query_results([Vec::<note::Model>::new()])
                .into_connection(),
        );

        let patch = SharingPatch {
            shared_with: Some("u3".to_string()),
            ..SharingPatch::default()
        };
        let result = service(db.clone()).update(&Caller::user("u2"), "s1", patch).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 2);
    }

    #[tokio::test]
    async fn test_recipient_toggles_can_edit() {
        let updated = sharing::Model {
            can_edit: true,
            ..create_test_share()
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_share()]])
                .append_query_results([[updated]])
                .into_connection(),
        );

        // A full replace naming the current note and recipient is allowed.
        let share = service(db)
            .replace(
                &Caller::user("u2"),
                "s1",
                SharingInput {
                    note: "n1".to_string(),
                    shared_with: "u2".to_string(),
                    can_edit: true,
                },
            )
            .await
            .unwrap();
        assert!(share.can_edit);
    }
}
