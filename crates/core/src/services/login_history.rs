//! Login history service.

use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppResult, IdGenerator};
use tasknote_db::entities::login_history;
use tasknote_db::repositories::LoginHistoryRepository;
use tasknote_db::{Caller, Page};
use validator::Validate;

use super::{not_found, now};
use crate::validation::validate_ip_address;

/// Input for creating or replacing a login history row.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginHistoryInput {
    #[validate(custom(function = "validate_ip_address"))]
    pub ip_address: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginHistoryPatch {
    #[validate(custom(function = "validate_ip_address"))]
    pub ip_address: Option<String>,

    #[validate(length(max = 255))]
    pub user_agent: Option<String>,
}

impl From<LoginHistoryInput> for LoginHistoryPatch {
    fn from(input: LoginHistoryInput) -> Self {
        Self {
            ip_address: Some(input.ip_address),
            user_agent: Some(input.user_agent),
        }
    }
}

/// Service for login history. Staff callers see every user's rows.
#[derive(Clone)]
pub struct LoginHistoryService {
    login_repo: LoginHistoryRepository,
    id_gen: IdGenerator,
}

impl LoginHistoryService {
    /// Create a new login history service.
    #[must_use]
    pub const fn new(login_repo: LoginHistoryRepository) -> Self {
        Self {
            login_repo,
            id_gen: IdGenerator::new(),
        }
    }

    pub async fn list(
        &self,
        caller: &Caller,
        page: Page,
    ) -> AppResult<Vec<login_history::Model>> {
        self.login_repo.list_scoped(caller, page).await
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<login_history::Model> {
        self.login_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("Login history"))
    }

    pub async fn create(
        &self,
        caller: &Caller,
        input: LoginHistoryInput,
    ) -> AppResult<login_history::Model> {
        input.validate()?;
        self.record(&caller.user_id, input.ip_address, input.user_agent)
            .await
    }

    /// Record a successful login.
    pub async fn record(
        &self,
        user_id: &str,
        ip_address: String,
        user_agent: String,
    ) -> AppResult<login_history::Model> {
        let model = login_history::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            ip_address: Set(ip_address),
            user_agent: Set(user_agent),
            timestamp: Set(now()),
        };

        self.login_repo.create(model).await
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: LoginHistoryInput,
    ) -> AppResult<login_history::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &str,
        patch: LoginHistoryPatch,
    ) -> AppResult<login_history::Model> {
        patch.validate()?;
        let entry = self.get(caller, id).await?;

        let mut model: login_history::ActiveModel = entry.into();
        if let Some(ip_address) = patch.ip_address {
            model.ip_address = Set(ip_address);
        }
        if let Some(user_agent) = patch.user_agent {
            model.user_agent = Set(user_agent);
        }

        self.login_repo.update(model).await
    }

    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let entry = self.get(caller, id).await?;
        self.login_repo.delete(&entry.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use tasknote_common::AppError;

    fn entry(id: &str, user_id: &str) -> login_history::Model {
        login_history::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            ip_address: "10.0.0.1".to_string(),
            user_agent: "curl/8.0".to_string(),
            timestamp: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_staff_list_spans_users() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry("l1", "u1"), entry("l2", "u2")]])
                .into_connection(),
        );
        let service = LoginHistoryService::new(LoginHistoryRepository::new(db));

        let rows = service
            .list(&Caller::staff("admin"), Page::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_ip() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = LoginHistoryService::new(LoginHistoryRepository::new(db));

        let input = LoginHistoryInput {
            ip_address: "not-an-ip".to_string(),
            user_agent: String::new(),
        };
        let result = service.create(&Caller::user("u1"), input).await;
        assert!(matches!(result, Err(AppError::Validation(f)) if f.contains("ip_address")));
    }

    #[tokio::test]
    async fn test_record() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry("l1", "u1")]])
                .into_connection(),
        );
        let service = LoginHistoryService::new(LoginHistoryRepository::new(db));

        let row = service
            .record("u1", "10.0.0.1".to_string(), "curl/8.0".to_string())
            .await
            .unwrap();
        assert_eq!(row.user_id, "u1");
    }
}
