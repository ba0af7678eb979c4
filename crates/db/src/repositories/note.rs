//! Note repository.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, LoaderTrait, QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{
    Category, File, Note, NoteCategory, NoteSubject, Subject, category, file, note,
    note_category, note_history, note_subject, subject,
};
use crate::{Caller, Page, map_db_err, scope};

/// Replacement category/subject links for a note. `None` keeps the current
/// links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteLinks {
    pub category_ids: Option<Vec<String>>,
    pub subject_ids: Option<Vec<String>>,
}

/// Read-only relations nested into a note response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteRelations {
    pub categories: Vec<category::Model>,
    pub subjects: Vec<subject::Model>,
    pub files: Vec<file::Model>,
}

/// Note repository for database operations.
#[derive(Clone)]
pub struct NoteRepository {
    db: Arc<DatabaseConnection>,
}

impl NoteRepository {
    /// Create a new note repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Notes owned by `caller`.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<Note> {
        Note::find().filter(note::Column::UserId.eq(caller.user_id.as_str()))
    }

    /// Notes owned by or shared with `caller`.
    #[must_use]
    pub fn visible(caller: &Caller) -> Select<Note> {
        Note::find().filter(
            Condition::any()
                .add(note::Column::UserId.eq(caller.user_id.as_str()))
                .add(note::Column::Id.in_subquery(scope::shared_note_ids(caller))),
        )
    }

    /// Find a note by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<note::Model>> {
        Note::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a note owned by the caller.
    pub async fn find_scoped(&self, caller: &Caller, id: &str) -> AppResult<Option<note::Model>> {
        Self::scoped(caller)
            .filter(note::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a note the caller owns or has been shared.
    pub async fn find_visible(&self, caller: &Caller, id: &str) -> AppResult<Option<note::Model>> {
        Self::visible(caller)
            .filter(note::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find one of a user's notes by exact title.
    pub async fn find_by_user_and_title(
        &self,
        user_id: &str,
        title: &str,
    ) -> AppResult<Option<note::Model>> {
        Note::find()
            .filter(note::Column::UserId.eq(user_id))
            .filter(note::Column::Title.eq(title))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List the caller's notes, newest first.
    pub async fn list_scoped(&self, caller: &Caller, page: Page) -> AppResult<Vec<note::Model>> {
        page.apply(Self::scoped(caller).order_by_desc(note::Column::CreatedAt))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Insert a note and its links in one transaction.
    pub async fn create(
        &self,
        model: note::ActiveModel,
        links: &NoteLinks,
    ) -> AppResult<note::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let note = model.insert(&txn).await.map_err(map_db_err)?;
        replace_links(&txn, &note.id, links)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(note)
    }

    /// Update a note, record the previous content and replace links in one
    /// transaction.
    pub async fn update(
        &self,
        model: note::ActiveModel,
        history: Option<note_history::ActiveModel>,
        links: &NoteLinks,
    ) -> AppResult<note::Model> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        if let Some(history) = history {
            history.insert(&txn).await.map_err(map_db_err)?;
        }
        let note = model.update(&txn).await.map_err(map_db_err)?;
        replace_links(&txn, &note.id, links)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(note)
    }

    /// Load categories, subjects and files for each note, in input order.
    pub async fn load_relations(&self, notes: &[note::Model]) -> AppResult<Vec<NoteRelations>> {
        if notes.is_empty() {
            return Ok(vec![]);
        }
        let db = self.db.as_ref();

        let categories = notes
            .load_many_to_many(
                Category::find().order_by_asc(category::Column::Name),
                NoteCategory,
                db,
            )
            .await
            .map_err(map_db_err)?;
        let subjects = notes
            .load_many_to_many(
                Subject::find().order_by_asc(subject::Column::Name),
                NoteSubject,
                db,
            )
            .await
            .map_err(map_db_err)?;
        let files = notes
            .load_many(File::find().order_by_desc(file::Column::UploadedAt), db)
            .await
            .map_err(map_db_err)?;

        Ok(categories
            .into_iter()
            .zip(subjects)
            .zip(files)
            .map(|((categories, subjects), files)| NoteRelations {
                categories,
                subjects,
                files,
            })
            .collect())
    }

    /// Delete a note. Dependent rows follow the deletion-policy table.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<Note>(self.db.as_ref(), id).await
    }
}

async fn replace_links<C>(conn: &C, note_id: &str, links: &NoteLinks) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if let Some(ids) = &links.category_ids {
        NoteCategory::delete_many()
            .filter(note_category::Column::NoteId.eq(note_id))
            .exec(conn)
            .await?;
        if !ids.is_empty() {
            NoteCategory::insert_many(ids.iter().map(|id| note_category::ActiveModel {
                note_id: Set(note_id.to_string()),
                category_id: Set(id.clone()),
            }))
            .exec_without_returning(conn)
            .await?;
        }
    }

    if let Some(ids) = &links.subject_ids {
        NoteSubject::delete_many()
            .filter(note_subject::Column::NoteId.eq(note_id))
            .exec(conn)
            .await?;
        if !ids.is_empty() {
            NoteSubject::insert_many(ids.iter().map(|id| note_subject::ActiveModel {
                note_id: Set(note_id.to_string()),
                subject_id: Set(id.clone()),
            }))
            .exec_without_returning(conn)
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn create_test_note(id: &str, user_id: &str, title: &str) -> note::Model {
        note::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            content: "content".to_string(),
            completed: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[test]
    fn test_visible_includes_shared_notes() {
        let sql = NoteRepository::visible(&Caller::user("u1"))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""note"."user_id" = 'u1' OR "note"."id" IN (SELECT "note_id" FROM "sharing""#));
        assert!(sql.contains(r#""sharing"."shared_with_id" = 'u1'"#));
    }

    #[tokio::test]
    async fn test_find_scoped() {
        let note = create_test_note("n1", "u1", "Groceries");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[note.clone()]])
                .into_connection(),
        );

        let repo = NoteRepository::new(db);
        let result = repo.find_scoped(&Caller::user("u1"), "n1").await.unwrap();

        assert_eq!(result.unwrap().title, "Groceries");
    }

    #[tokio::test]
    async fn test_find_scoped_other_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<note::Model>::new()])
                .into_connection(),
        );

        let repo = NoteRepository::new(db);
        let result = repo.find_scoped(&Caller::user("u2"), "n1").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_with_links() {
        let note = create_test_note("n1", "u1", "Groceries");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[note.clone()]])
                // delete old category links, insert new ones, delete old subject links
                .append_exec_results([exec(0), exec(2), exec(0)])
                .into_connection(),
        );

        let repo = NoteRepository::new(db);
        let links = NoteLinks {
            category_ids: Some(vec!["c1".to_string(), "c2".to_string()]),
            subject_ids: Some(vec![]),
        };
        let created = repo.create(note.into(), &links).await.unwrap();

        assert_eq!(created.id, "n1");
    }

    #[tokio::test]
    async fn test_load_relations_empty() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = NoteRepository::new(db);
        assert!(repo.load_relations(&[]).await.unwrap().is_empty());
    }
}
