//! Note recommendation service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::note_recommendation;
use tasknote_db::repositories::{NoteRecommendationRepository, NoteRepository};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{not_found, now, visible_note};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NoteRecommendationInput {
    pub recommended_note: String,

    #[validate(range(min = 0.0, max = 1.0))]
    pub score: f64,

    #[validate(length(min = 1, max = 50))]
    pub algorithm_version: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NoteRecommendationPatch {
    pub recommended_note: Option<String>,

    #[validate(range(min = 0.0, max = 1.0))]
    pub score: Option<f64>,

    #[validate(length(min = 1, max = 50))]
    pub algorithm_version: Option<String>,
}

impl From<NoteRecommendationInput> for NoteRecommendationPatch {
    fn from(input: NoteRecommendationInput) -> Self {
        Self {
            recommended_note: Some(input.recommended_note),
            score: Some(input.score),
            algorithm_version: Some(input.algorithm_version),
        }
    }
}

/// Recommendations addressed to the caller. The recommended note must be
/// one the caller can see.
#[derive(Clone)]
pub struct NoteRecommendationService {
    recommendation_repo: NoteRecommendationRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl NoteRecommendationService {
    #[must_use]
    pub const fn new(
        recommendation_repo: NoteRecommendationRepository,
        note_repo: NoteRepository,
    ) -> Self {
        Self {
            recommendation_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Best-scored first.
    pub async fn list(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<note_recommendation::Model>> {
        self.recommendation_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<note_recommendation::Model> {
        self.recommendation_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Note recommendation"))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: NoteRecommendationInput,
    ) -> AppResult<note_recommendation::Model> {
        input.validate()?;
        let note = visible_note(&self.note_repo, caller, &input.recommended_note).await?;

        let model = note_recommendation::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(caller.user_id.clone()),
            recommended_note_id: Set(note.id),
            score: Set(input.score),
            algorithm_version: Set(input.algorithm_version),
            created_at: Set(now()),
        };

        self.recommendation_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: NoteRecommendationInput,
    ) -> AppResult<note_recommendation::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: NoteRecommendationPatch,
    ) -> AppResult<note_recommendation::Model> {
        patch.validate()?;
        let recommendation = self.get(caller, id).await?;

        let mut model: note_recommendation::ActiveModel = recommendation.into();
        if let Some(note_id) = patch.recommended_note {
            let note = visible_note(&self.note_repo, caller, &note_id).await?;
            model.recommended_note_id = Set(note.id);
        }
        if let Some(score) = patch.score {
            model.score = Set(score);
        }
        if let Some(algorithm_version) = patch.algorithm_version {
            model.algorithm_version = Set(algorithm_version);
        }

        self.recommendation_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let recommendation = self.get(caller, id).await?;
        self.recommendation_repo.delete(&recommendation.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use tasknote_common::AppError;
    use tasknote_db::entities::note;

    #[test]
    fn test_score_out_of_range() {
        let input = NoteRecommendationInput {
            recommended_note: "n1".to_string(),
            score: 1.5,
            algorithm_version: "v2".to_string(),
        };
        let err: AppError = input.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Validation(f) if f.contains("score")));
    }

    #[tokio::test]
    async fn test_invisible_note_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<note::Model>::new()])
                .into_connection(),
        );
        let service = NoteRecommendationService::new(
            NoteRecommendationRepository::new(db.clone()),
            NoteRepository::new(db),
        );

        let input = NoteRecommendationInput {
            recommended_note: "n9".to_string(),
            score: 0.8,
            algorithm_version: "v2".to_string(),
        };
        let result = service.create(&Caller::user("u1"), input).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
