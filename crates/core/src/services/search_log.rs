//! Search log service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::search_log;
use tasknote_db::repositories::SearchLogRepository;
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{not_found, now};
use crate::validation::validate_not_blank;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchLogInput {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub query: String,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub results_count: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SearchLogPatch {
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub query: Option<String>,

    #[validate(range(min = 0))]
    pub results_count: Option<i32>,
}

impl From<SearchLogInput> for SearchLogPatch {
    fn from(input: SearchLogInput) -> Self {
        Self {
            query: Some(input.query),
            results_count: Some(input.results_count),
        }
    }
}

#[derive(Clone)]
pub struct SearchLogService {
    log_repo: SearchLogRepository,
    id_gen: IdGenerator,
}

impl SearchLogService {
    #[must_use]
    pub const fn new(log_repo: SearchLogRepository) -> Self {
        Self {
            log_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<search_log::Model>> {
        self.log_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<search_log::Model> {
        self.log_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Search log"))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: SearchLogInput,
    ) -> AppResult<search_log::Model> {
        input.validate()?;

        let model = search_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(Some(caller.user_id.clone())),
            query: Set(input.query.trim().to_string()),
            results_count: Set(input.results_count),
            created_at: Set(now()),
        };

        self.log_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: SearchLogInput,
    ) -> AppResult<search_log::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: SearchLogPatch,
    ) -> AppResult<search_log::Model> {
        patch.validate()?;
        let log = self.get(caller, id).await?;

        let mut model: search_log::ActiveModel = log.into();
        if let Some(query) = patch.query {
            model.query = Set(query.trim().to_string());
        }
        if let Some(results_count) = patch.results_count {
            model.results_count = Set(results_count);
        }

        self.log_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let log = self.get(caller, id).await?;
        self.log_repo.delete(&log.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[test]
    fn test_negative_count_rejected() {
        let input = SearchLogInput {
            query: "groceries".to_string(),
            results_count: -1,
        };
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("results_count"));
    }

    #[tokio::test]
    async fn test_create_records_caller() {
        let log = search_log::Model {
            id: "s1".to_string(),
            user_id: Some("u1".to_string()),
            query: "groceries".to_string(),
            results_count: 3,
            created_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[log]])
                .into_connection(),
        );
        let service = SearchLogService::new(SearchLogRepository::new(db));

        let input = SearchLogInput {
            query: " groceries ".to_string(),
            results_count: 3,
        };
        let created = service.create(&Caller::user("u1"), input).await.unwrap();
        assert_eq!(created.user_id.as_deref(), Some("u1"));
    }
}
