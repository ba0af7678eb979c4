//! User repository.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select,
};
use tasknote_common::AppResult;

use super::delete_guarded;
use crate::entities::{User, user};
use crate::{Caller, Page, map_db_err};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Users visible to `caller`: itself, or everyone for staff.
    #[must_use]
    pub fn scoped(caller: &Caller) -> Select<User> {
        let query = User::find();
        if caller.is_staff {
            query
        } else {
            query.filter(user::Column::Id.eq(caller.user_id.as_str()))
        }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user by exact username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(Expr::expr(Func::lower(Expr::col(user::Column::Email))).eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find several users at once.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        User::find()
            .filter(user::Column::Id.is_in(ids.iter().map(String::as_str)))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a user within the caller's scope.
    pub async fn find_scoped(&self, caller: &Caller, id: &str) -> AppResult<Option<user::Model>> {
        Self::scoped(caller)
            .filter(user::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List users within the caller's scope, newest first.
    pub async fn list_scoped(&self, caller: &Caller, page: Page) -> AppResult<Vec<user::Model>> {
        page.apply(Self::scoped(caller).order_by_desc(user::Column::CreatedAt))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, id: &str) -> AppResult<()> {
        User::update_many()
            .col_expr(user::Column::LastLogin, Expr::value(Utc::now().fixed_offset()))
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    /// Delete a user. Owned rows follow the deletion-policy table.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        delete_guarded::<User>(self.db.as_ref(), id).await
    }
}
