//! Review service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppError, AppResult, IdGenerator};
use tasknote_db::entities::review;
use tasknote_db::repositories::{NoteRepository, ReviewRepository, UserRepository};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{not_found, now, owned_note, usernames};

/// A review and its reviewer's username, if the reviewer still exists.
pub type ReviewWithReviewer = (review::Model, Option<String>);

/// Input for creating or replacing a review.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewInput {
    pub note: String,

    #[validate(range(min = 1, max = 5))]
    pub rating: i16,

    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReviewPatch {
    pub note: Option<String>,

    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i16>,

    pub comment: Option<String>,
}

impl From<ReviewInput> for ReviewPatch {
    fn from(input: ReviewInput) -> Self {
        Self {
            note: Some(input.note),
            rating: Some(input.rating),
            comment: Some(input.comment),
        }
    }
}

/// Service for note reviews. The caller is recorded as the reviewer.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    note_repo: NoteRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(
        review_repo: ReviewRepository,
        note_repo: NoteRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            review_repo,
            note_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Reviews of the caller's notes, newest first.
    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<ReviewWithReviewer>> {
        let reviews = self.review_repo.list_scoped(caller, page).await?;
        self.with_reviewers(reviews).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<ReviewWithReviewer> {
        let review = self.find(caller, id).await?;
        self.with_reviewer(review).await
    }

    pub async fn create(&self, caller: &Caller, input: ReviewInput) -> AppResult<ReviewWithReviewer> {
        input.validate()?;
        let note = owned_note(&self.note_repo, caller, &input.note).await?;

        let model = review::ActiveModel {
            id: Set(self.id_gen.generate()),
            note_id: Set(note.id),
            reviewer_id: Set(Some(caller.user_id.clone())),
            rating: Set(input.rating),
            comment: Set(input.comment),
            created_at: Set(now()),
        };

        let review = self.review_repo.create(model).await?;
        self.with_reviewer(review).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: ReviewInput,
    ) -> AppResult<ReviewWithReviewer> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: ReviewPatch,
    ) -> AppResult<ReviewWithReviewer> {
        patch.validate()?;
        let review = self.find(caller, id).await?;

        let mut model: review::ActiveModel = review.into();
        if let Some(note_id) = patch.note {
            let note = owned_note(&self.note_repo, caller, &note_id).await?;
            model.note_id = Set(note.id);
        }
        if let Some(rating) = patch.rating {
            model.rating = Set(rating);
        }
        if let Some(comment) = patch.comment {
            model.comment = Set(comment);
        }

        let review = self.review_repo.update(model).await?;
        self.with_reviewer(review).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let review = self.find(caller, id).await?;
        self.review_repo.delete(&review.id).await
    }

    async fn find(&self, caller: &Caller, id: &str) -> AppResult<review::Model> {
        self.review_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Review"))
    }

    async fn with_reviewer(&self, review: review::Model) -> AppResult<ReviewWithReviewer> {
        self.with_reviewers(vec![review])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Review projection missing".to_string()))
    }

    async fn with_reviewers(&self, reviews: Vec<review::Model>) -> AppResult<Vec<ReviewWithReviewer>> {
        let names = usernames(
            &self.user_repo,
            reviews.iter().filter_map(|r| r.reviewer_id.as_deref()),
        )
        .await?;

        Ok(reviews
            .into_iter()
            .map(|r| {
                let name = r.reviewer_id.as_ref().and_then(|id| names.get(id).cloned());
                (r, name)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;
    use tasknote_db::entities::{note, user};

    fn service(db: Arc<DatabaseConnection>) -> ReviewService {
        ReviewService::new(
            ReviewRepository::new(db.clone()),
            NoteRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    fn review(reviewer: Option<&str>, rating: i16) -> review::Model {
        review::Model {
            id: "r1".to_string(),
            note_id: "n1".to_string(),
            reviewer_id: reviewer.map(str::to_string),
            rating,
            comment: String::new(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_rating_bounds() {
        let mut input = ReviewInput {
            note: "n1".to_string(),
            rating: 5,
            comment: String::new(),
        };
        assert!(input.validate().is_ok());

        input.rating = 6;
        assert!(input.validate().is_err());

        input.rating = 0;
        assert!(input.validate().is_err());
    }

    #[tokio::test]
    async fn test_create_on_unowned_note() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<note::Model>::new()])
                .into_connection(),
        );

        let input = ReviewInput {
            note: "n1".to_string(),
            rating: 4,
            comment: String::new(),
        };
        let result = service(db).create(&Caller::user("u2"), input).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_projects_reviewer_name() {
        let alice = user::Model {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hash".to_string(),
            date_of_birth: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login: None,
            created_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[review(Some("u1"), 5)]])
                .append_query_results([[alice]])
                .into_connection(),
        );

        let rows = service(db)
            .list(&Caller::user("u1"), Page::default())
            .await
            .unwrap();
        assert_eq!(rows[0].1.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_deleted_reviewer_has_no_name() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[review(None, 3)]])
                .into_connection(),
        );

        let (row, name) = service(db).get(&Caller::user("u1"), "r1").await.unwrap();
        assert_eq!(row.rating, 3);
        assert!(name.is_none());
    }
}
