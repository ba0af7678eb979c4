//! Note analysis service.
//!
//! Analyses are produced outside this system and stored as opaque records:
//! one per note.

use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::note_analysis;
use tasknote_db::repositories::{NoteAnalysisRepository, NoteRepository};
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{not_found, now, owned_note};
use crate::validation::{parse_choice, validate_keywords, validate_sentiment};

fn empty_keywords() -> Value {
    Value::Array(vec![])
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NoteAnalysisInput {
    pub note: String,

    #[serde(default)]
    pub summary: String,

    #[validate(custom(function = "validate_sentiment"))]
    pub sentiment: String,

    #[serde(default = "empty_keywords")]
    #[validate(custom(function = "validate_keywords"))]
    pub keywords: Value,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NoteAnalysisPatch {
    pub note: Option<String>,

    pub summary: Option<String>,

    #[validate(custom(function = "validate_sentiment"))]
    pub sentiment: Option<String>,

    #[validate(custom(function = "validate_keywords"))]
    pub keywords: Option<Value>,
}

impl From<NoteAnalysisInput> for NoteAnalysisPatch {
    fn from(input: NoteAnalysisInput) -> Self {
        Self {
            note: Some(input.note),
            summary: Some(input.summary),
            sentiment: Some(input.sentiment),
            keywords: Some(input.keywords),
        }
    }
}

#[derive(Clone)]
pub struct NoteAnalysisService {
    analysis_repo: NoteAnalysisRepository,
    note_repo: NoteRepository,
    id_gen: IdGenerator,
}

impl NoteAnalysisService {
    #[must_use]
    pub const fn new(analysis_repo: NoteAnalysisRepository, note_repo: NoteRepository) -> Self {
        Self {
            analysis_repo,
            note_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<note_analysis::Model>> {
        self.analysis_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<note_analysis::Model> {
        self.analysis_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Note analysis"))
    }

    /// Store the analysis of one of the caller's notes. A note has at most
    /// one analysis; a second one is an integrity error.
    pub async fn create(
        &self,
        caller: &Caller,
        input: NoteAnalysisInput,
    ) -> AppResult<note_analysis::Model> {
        input.validate()?;
        let sentiment = parse_choice("sentiment", &input.sentiment)?;
        let note = owned_note(&self.note_repo, caller, &input.note).await?;

        let model = note_analysis::ActiveModel {
            id: Set(self.id_gen.generate()),
            note_id: Set(note.id),
            summary: Set(input.summary),
            sentiment: Set(sentiment),
            keywords: Set(input.keywords),
            created_at: Set(now()),
        };

        self.analysis_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: NoteAnalysisInput,
    ) -> AppResult<note_analysis::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: NoteAnalysisPatch,
    ) -> AppResult<note_analysis::Model> {
        patch.validate()?;
        let analysis = self.get(caller, id).await?;

        let mut model: note_analysis::ActiveModel = analysis.into();
        if let Some(note_id) = patch.note {
            let note = owned_note(&self.note_repo, caller, &note_id).await?;
            model.note_id = Set(note.id);
        }
        if let Some(summary) = patch.summary {
            model.summary = Set(summary);
        }
        if let Some(sentiment) = patch.sentiment {
            model.sentiment = Set(parse_choice("sentiment", &sentiment)?);
        }
        if let Some(keywords) = patch.keywords {
            model.keywords = Set(keywords);
        }

        self.analysis_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let analysis = self.get(caller, id).await?;
        self.analysis_repo.delete(&analysis.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keywords_default_to_empty_list() {
        let input: NoteAnalysisInput =
            serde_json::from_value(json!({"note": "n1", "sentiment": "neutral"})).unwrap();
        assert_eq!(input.keywords, json!([]));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_invalid_fields() {
        let input: NoteAnalysisInput = serde_json::from_value(json!({
            "note": "n1",
            "sentiment": "furious",
            "keywords": "not a list",
        }))
        .unwrap();

        let err = input.validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("sentiment"));
        assert!(fields.contains_key("keywords"));
    }
}
