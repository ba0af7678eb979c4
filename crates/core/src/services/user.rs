//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::NaiveDate;
use sea_orm::Set;
use serde::Deserialize;
use tasknote_common::{AppError, AppResult, IdGenerator};
use tasknote_db::entities::user;
use tasknote_db::repositories::UserRepository;
use tasknote_db::{Caller, Page};
use tracing::info;
use validator::Validate;

use super::{deserialize_some, not_found, now};
use crate::validation::validate_username;

/// Input for creating a new user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

/// Full replacement of a user. The password is only changed when given.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,

    #[validate(email, length(max = 254))]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub date_of_birth: Option<Option<NaiveDate>>,

    /// Staff only.
    pub is_active: Option<bool>,
}

impl From<UpdateUserInput> for UserPatch {
    fn from(input: UpdateUserInput) -> Self {
        Self {
            username: Some(input.username),
            email: Some(input.email),
            password: input.password,
            date_of_birth: Some(input.date_of_birth),
            is_active: input.is_active,
        }
    }
}

/// Credentials for obtaining a token pair.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user. Open to anonymous callers.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        self.insert(input, false).await
    }

    /// Create an active staff superuser, for the `create-superuser` command.
    pub async fn create_superuser(&self, input: CreateUserInput) -> AppResult<user::Model> {
        let user = self.insert(input, true).await?;
        info!(user_id = %user.id, username = %user.username, "Superuser created");
        Ok(user)
    }

    /// List users visible to the caller.
    pub async fn list(&self, caller: &Caller, page: Page) -> AppResult<Vec<user::Model>> {
        self.user_repo.list_scoped(caller, page).await
    }

    /// Get a user visible to the caller.
    pub async fn get(&self, caller: &Caller, id: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_scoped(caller, id)
            .await?
            .ok_or_else(|| not_found("User"))
    }

    pub async fn replace(
        &self,
        caller: &Caller,
        id: &str,
        input: UpdateUserInput,
    ) -> AppResult<user::Model> {
        input.validate()?;
        self.update(caller, id, input.into()).await
    }

    /// Update a user.
    pub async fn update(&self, caller: &Caller, id: &str, patch: UserPatch) -> AppResult<user::Model> {
        patch.validate()?;
        let user = self.get(caller, id).await?;

        if patch.is_active.is_some() && !caller.is_staff {
            return Err(AppError::field("is_active", "Only staff may change this field."));
        }
        if let Some(username) = &patch.username {
            self.ensure_username_free(username, Some(&user.id)).await?;
        }
        if let Some(email) = &patch.email {
            self.ensure_email_free(email, Some(&user.id)).await?;
        }

        let mut model: user::ActiveModel = user.into();
        if let Some(username) = patch.username {
            model.username = Set(username);
        }
        if let Some(email) = patch.email {
            model.email = Set(email);
        }
        if let Some(password) = patch.password {
            model.password = Set(hash_password(&password)?);
        }
        if let Some(date_of_birth) = patch.date_of_birth {
            model.date_of_birth = Set(date_of_birth);
        }
        if let Some(is_active) = patch.is_active {
            model.is_active = Set(is_active);
        }

        self.user_repo.update(model).await
    }

    /// Delete a user and, by cascade, everything they own.
    pub async fn delete(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let user = self.get(caller, id).await?;
        self.user_repo.delete(&user.id).await?;
        info!(user_id = %user.id, "User deleted");
        Ok(())
    }

    /// Authenticate a user by username and password. Unknown users, wrong
    /// passwords and inactive accounts are indistinguishable.
    pub async fn authenticate(&self, input: &LoginInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password)? || !user.is_active {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Resolve a token subject to the caller it acts as. Deleted and
    /// deactivated users are refused.
    pub async fn resolve_caller(&self, user_id: &str) -> AppResult<Caller> {
        match self.user_repo.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(Caller {
                user_id: user.id,
                is_staff: user.is_staff,
            }),
            _ => Err(AppError::Unauthorized),
        }
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, user_id: &str) -> AppResult<()> {
        self.user_repo.touch_last_login(user_id).await
    }

    async fn insert(&self, input: CreateUserInput, superuser: bool) -> AppResult<user::Model> {
        input.validate()?;
        self.ensure_username_free(&input.username, None).await?;
        self.ensure_email_free(&input.email, None).await?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            email: Set(input.email),
            password: Set(hash_password(&input.password)?),
            date_of_birth: Set(input.date_of_birth),
            is_active: Set(true),
            is_staff: Set(superuser),
            is_superuser: Set(superuser),
            last_login: Set(None),
            created_at: Set(now()),
        };

        self.user_repo.create(model).await
    }

    async fn ensure_username_free(&self, username: &str, except: Option<&str>) -> AppResult<()> {
        match self.user_repo.find_by_username(username).await? {
            Some(other) if Some(other.id.as_str()) != except => Err(AppError::field(
                "username",
                "A user with that username already exists.",
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_email_free(&self, email: &str, except: Option<&str>) -> AppResult<()> {
        match self.user_repo.find_by_email(email).await? {
            Some(other) if Some(other.id.as_str()) != except => Err(AppError::field(
                "email",
                "A user with that email already exists.",
            )),
            _ => Ok(()),
        }
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash. An unparseable hash never
/// matches.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return Ok(false);
    };

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str, password: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: hash_password(password).unwrap(),
            date_of_birth: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<DatabaseConnection>) -> UserService {
        UserService::new(UserRepository::new(db))
    }

    fn login(username: &str, password: &str) -> LoginInput {
        LoginInput {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, hash_password("correct horse").unwrap());
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
        assert!(!verify_password("correct horse", "not-a-hash").unwrap());
    }

    #[test]
    fn test_create_input_validation() {
        let input = CreateUserInput {
            username: "has space".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            date_of_birth: None,
        };
        let err = input.validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[tokio::test]
    async fn test_create_duplicate_username() {
        let existing = create_test_user("u1", "alice", "password123");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let input = CreateUserInput {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
            password: "password123".to_string(),
            date_of_birth: None,
        };
        let result = service(db).create(input).await;
        assert!(matches!(result, Err(AppError::Validation(f)) if f.contains("username")));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let user = create_test_user("u1", "alice", "password123");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()], [user]])
                .into_connection(),
        );
        let service = service(db);

        let ok = service.authenticate(&login("alice", "password123")).await.unwrap();
        assert_eq!(ok.id, "u1");

        let bad = service.authenticate(&login("alice", "password124")).await;
        assert!(matches!(bad, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_inactive_user() {
        let user = user::Model {
            is_active: false,
            ..create_test_user("u1", "alice", "password123")
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let result = service(db).authenticate(&login("alice", "password123")).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_non_staff_cannot_deactivate() {
        let user = create_test_user("u1", "alice", "password123");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let patch = UserPatch {
            is_active: Some(false),
            ..Default::default()
        };
        let result = service(db).update(&Caller::user("u1"), "u1", patch).await;
        assert!(matches!(result, Err(AppError::Validation(f)) if f.contains("is_active")));
    }

    #[tokio::test]
    async fn test_resolve_caller() {
        let staff = user::Model {
            is_staff: true,
            ..create_test_user("u9", "admin", "password123")
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[staff]])
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = service(db);

        assert_eq!(service.resolve_caller("u9").await.unwrap(), Caller::staff("u9"));
        assert!(matches!(
            service.resolve_caller("gone").await,
            Err(AppError::Unauthorized)
        ));
    }
}
