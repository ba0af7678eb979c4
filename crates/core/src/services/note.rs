//! Note service.

use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppError, AppResult, IdGenerator, StorageBackend};
use tasknote_db::entities::{note, note_history};
use tasknote_db::repositories::{
    CategoryRepository, NoteLinks, NoteRelations, NoteRepository, SubjectRepository,
};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{not_found, now};
use crate::validation::validate_not_blank;

/// Input for creating or replacing a note.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NoteInput {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub category_ids: Vec<String>,

    #[serde(default)]
    pub subject_ids: Vec<String>,
}

/// Partial update of a note. Link lists, when given, replace the current
/// links.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NotePatch {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub title: Option<String>,

    pub content: Option<String>,

    pub completed: Option<bool>,

    pub category_ids: Option<Vec<String>>,

    pub subject_ids: Option<Vec<String>>,
}

impl From<NoteInput> for NotePatch {
    fn from(input: NoteInput) -> Self {
        Self {
            title: Some(input.title),
            content: Some(input.content),
            completed: Some(input.completed),
            category_ids: Some(input.category_ids),
            subject_ids: Some(input.subject_ids),
        }
    }
}

/// A note with its categories, subjects and files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteWithRelations {
    pub note: note::Model,
    pub relations: NoteRelations,
}

/// Note service for business logic.
#[derive(Clone)]
pub struct NoteService {
    note_repo: NoteRepository,
    category_repo: CategoryRepository,
    subject_repo: SubjectRepository,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl NoteService {
    /// Create a new note service.
    #[must_use]
    pub fn new(
        note_repo: NoteRepository,
        category_repo: CategoryRepository,
        subject_repo: SubjectRepository,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            note_repo,
            category_repo,
            subject_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// List the caller's notes, newest first.
    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<NoteWithRelations>> {
        let notes = self.note_repo.list_scoped(caller, page).await?;
        self.expand(notes).await
    }

    /// Get one of the caller's notes.
    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<NoteWithRelations> {
        let note = self.find_owned(caller, id).await?;
        self.expand_one(note).await
    }

    /// Create a note owned by the caller.
    pub async fn create(&self, caller: &Caller, input: NoteInput) -> AppResult<NoteWithRelations> {
        let note = self.insert(caller, input).await?;
        tracing::info!(note_id = %note.id, user_id = %caller.user_id, "Note created");
        self.expand_one(note).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: NoteInput,
    ) -> AppResult<NoteWithRelations> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    /// Update one of the caller's notes.
    ///
    /// A content change records the previous content as a history entry,
    /// edited by the caller, in the same transaction as the update.
    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: NotePatch,
    ) -> AppResult<NoteWithRelations> {
        let note = self.apply(caller, id, patch).await?;
        self.expand_one(note).await
    }

    /// Delete one of the caller's notes along with its stored files.
    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let note = self.find_owned(caller, id).await?;
        let files = self
            .note_repo
            .load_relations(std::slice::from_ref(&note))
            .await?
            .into_iter()
            .flat_map(|r| r.files)
            .collect::<Vec<_>>();

        self.note_repo.delete(&note.id).await?;

        for file in files {
            if let Err(e) = self.storage.delete(&file.path).await {
                tracing::warn!(error = %e, key = %file.path, "Failed to remove stored file");
            }
        }
        Ok(())
    }

    async fn insert(&self, caller: &Caller, input: NoteInput) -> AppResult<note::Model> {
        input.validate()?;
        self.ensure_title_free(caller, &input.title, None).await?;
        let category_ids = self.check_categories(input.category_ids).await?;
        let subject_ids = self.check_subjects(input.subject_ids).await?;

        let timestamp = now();
        let model = note::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(caller.user_id.clone()),
            title: Set(input.title),
            content: Set(input.content),
            completed: Set(input.completed),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };
        let links = NoteLinks {
            category_ids: (!category_ids.is_empty()).then_some(category_ids),
            subject_ids: (!subject_ids.is_empty()).then_some(subject_ids),
        };

        self.note_repo.create(model, &links).await
    }

    async fn apply(&self, caller: &Caller, id: &str, patch: NotePatch) -> AppResult<note::Model> {
        patch.validate()?;
        let note = self.find_owned(caller, id).await?;

        if let Some(title) = &patch.title {
            if *title != note.title {
                self.ensure_title_free(caller, title, Some(&note.id)).await?;
            }
        }
        let links = NoteLinks {
            category_ids: match patch.category_ids {
                Some(ids) => Some(self.check_categories(ids).await?),
                None => None,
            },
            subject_ids: match patch.subject_ids {
                Some(ids) => Some(self.check_subjects(ids).await?),
                None => None,
            },
        };

        let history = match &patch.content {
            Some(content) if *content != note.content => Some(note_history::ActiveModel {
                id: Set(self.id_gen.generate()),
                note_id: Set(note.id.clone()),
                edited_by_id: Set(Some(caller.user_id.clone())),
                previous_content: Set(note.content.clone()),
                edited_at: Set(now()),
            }),
            _ => None,
        };

        let mut model: note::ActiveModel = note.into();
        if let Some(title) = patch.title {
            model.title = Set(title);
        }
        if let Some(content) = patch.content {
            model.content = Set(content);
        }
        if let Some(completed) = patch.completed {
            model.completed = Set(completed);
        }
        model.updated_at = Set(now());

        self.note_repo.update(model, history, &links).await
    }

    async fn find_owned(&self, caller: &Caller, id: &str) -> AppResult<note::Model> {
        self.note_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Note"))
    }

    async fn expand(&self, notes: Vec<note::Model>) -> AppResult<Vec<NoteWithRelations>> {
        let relations = self.note_repo.load_relations(&notes).await?;
        Ok(notes
            .into_iter()
            .zip(relations)
            .map(|(note, relations)| NoteWithRelations { note, relations })
            .collect())
    }

    async fn expand_one(&self, note: note::Model) -> AppResult<NoteWithRelations> {
        self.expand(vec![note])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Note relations missing".to_string()))
    }

    /// A user's note titles are unique. The unique index still arbitrates
    /// concurrent writers; this only turns the common case into a field
    /// error.
    async fn ensure_title_free(
        &self,
        caller: &Caller,
        title: &str,
        except: Option<&str>,
    ) -> AppResult<()> {
        match self
            .note_repo
            .find_by_user_and_title(&caller.user_id, title)
            .await?
        {
            Some(existing) if Some(existing.id.as_str()) != except => Err(AppError::field(
                "title",
                "You already have a note with this title.",
            )),
            _ => Ok(()),
        }
    }

    async fn check_categories(&self, ids: Vec<String>) -> AppResult<Vec<String>> {
        let ids = dedup(ids);
        let found = self.category_repo.find_by_ids(&ids).await?;
        missing_ids(
            "category_ids",
            &ids,
            found.iter().map(|c| c.id.as_str()).collect(),
        )?;
        Ok(ids)
    }

    async fn check_subjects(&self, ids: Vec<String>) -> AppResult<Vec<String>> {
        let ids = dedup(ids);
        let found = self.subject_repo.find_by_ids(&ids).await?;
        missing_ids(
            "subject_ids",
            &ids,
            found.iter().map(|s| s.id.as_str()).collect(),
        )?;
        Ok(ids)
    }
}

fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

fn missing_ids(field: &str, wanted: &[String], found: BTreeSet<&str>) -> AppResult<()> {
    let mut errors = tasknote_common::FieldErrors::new();
    for id in wanted.iter().filter(|id| !found.contains(id.as_str())) {
        errors.add(field, format!("Invalid pk \"{id}\" - object does not exist."));
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use tasknote_common::LocalStorage;
    use tasknote_db::entities::category;

    fn create_test_note(id: &str, user_id: &str, title: &str, content: &str) -> note::Model {
        note::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            completed: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<DatabaseConnection>) -> NoteService {
        let storage = Arc::new(LocalStorage::new(
            std::env::temp_dir().join("tasknote-note-tests"),
            "/media".to_string(),
        ));
        NoteService::new(
            NoteRepository::new(db.clone()),
            CategoryRepository::new(db.clone()),
            SubjectRepository::new(db),
            storage,
        )
    }

    fn input(title: &str) -> NoteInput {
        NoteInput {
            title: title.to_string(),
            content: "Milk, eggs".to_string(),
            completed: false,
            category_ids: vec![],
            subject_ids: vec![],
        }
    }

    #[test]
    fn test_dedup_keeps_order() {
        let ids = dedup(vec!["b".into(), "a".into(), "b".into()]);
        assert_eq!(ids, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_blank_title_names_field() {
        let err: AppError = input("   ").validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(f) if f.contains("title")));
    }

    #[tokio::test]
    async fn test_insert() {
        let note = create_test_note("n1", "u1", "Groceries", "Milk, eggs");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // title lookup
                .append_query_results([Vec::<note::Model>::new()])
                // insert
                .append_query_results([[note]])
                .into_connection(),
        );

        let created = service(db)
            .insert(&Caller::user("u1"), input("Groceries"))
            .await
            .unwrap();
        assert_eq!(created.user_id, "u1");
    }

    #[tokio::test]
    async fn test_insert_duplicate_title() {
        let existing = create_test_note("n1", "u1", "Groceries", "");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let result = service(db)
            .insert(&Caller::user("u1"), input("Groceries"))
            .await;
        assert!(matches!(result, Err(AppError::Validation(f)) if f.contains("title")));
    }

    #[tokio::test]
    async fn test_insert_unknown_category() {
        let work = category::Model {
            id: "c1".to_string(),
            name: "Work".to_string(),
            description: String::new(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<note::Model>::new()])
                .append_query_results([[work]])
                .into_connection(),
        );

        let mut with_links = input("Groceries");
        with_links.category_ids = vec!["c1".to_string(), "c9".to_string()];
        let result = service(db).insert(&Caller::user("u1"), with_links).await;

        match result {
            Err(AppError::Validation(fields)) => {
                let messages = fields.get("category_ids").unwrap();
                assert_eq!(messages.len(), 1);
                assert!(messages[0].contains("c9"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_content_change_records_history() {
        let note = create_test_note("n1", "u1", "Groceries", "Milk");
        let updated = create_test_note("n1", "u1", "Groceries", "Milk, eggs");
        let history = note_history::Model {
            id: "h1".to_string(),
            note_id: "n1".to_string(),
            edited_by_id: Some("u1".to_string()),
            previous_content: "Milk".to_string(),
            edited_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[note]])
                .append_query_results([[history]])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let patch = NotePatch {
            content: Some("Milk, eggs".to_string()),
            ..Default::default()
        };
        let svc = service(db.clone());
        let result = svc.apply(&Caller::user("u1"), "n1", patch).await.unwrap();
        assert_eq!(result.content, "Milk, eggs");
        drop(svc);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let statements = format!("{log:?}");
        assert!(statements.contains("INSERT INTO \\\"note_history\\\""));
    }

    #[tokio::test]
    async fn test_update_other_users_note() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<note::Model>::new()])
                .into_connection(),
        );

        let patch = NotePatch {
            completed: Some(true),
            ..Default::default()
        };
        let result = service(db).apply(&Caller::user("u2"), "n1", patch).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_other_users_note() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<note::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let result = service(db).delete(&Caller::user("u2"), "n1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
