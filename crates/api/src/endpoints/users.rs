//! User endpoints.
//!
//! `POST /users` is open so that people can register; everything else needs a
//! caller, and a non-staff caller only ever sees itself.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{CreateUserInput, UpdateUserInput, UserPatch};
use tasknote_db::Page;
use tasknote_db::entities::user;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

/// Public view of a user. The password hash never leaves the server.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            date_of_birth: u.date_of_birth,
            is_active: u.is_active,
            is_staff: u.is_staff,
            is_superuser: u.is_superuser,
            last_login: u.last_login.as_ref().map(timestamp),
            created_at: timestamp(&u.created_at),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list(&caller, page).await?;
    Ok(project(users))
}

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateUserInput>,
) -> AppResult<Created<UserResponse>> {
    let user = state.user_service.create(input).await?;
    Ok(created(user.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get(&caller, &id).await?;
    Ok(Json(user.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateUserInput>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.replace(&caller, &id, input).await?;
    Ok(Json(user.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update(&caller, &id, patch).await?;
    Ok(Json(user.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.user_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(register))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
