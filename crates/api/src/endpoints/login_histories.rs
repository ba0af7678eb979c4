//! Login history endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{LoginHistoryInput, LoginHistoryPatch};
use tasknote_db::Page;
use tasknote_db::entities::login_history;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

#[derive(Serialize)]
pub struct LoginHistoryResponse {
    pub id: String,
    pub user: String,
    pub ip_address: String,
    pub user_agent: String,
    pub timestamp: String,
}

impl From<login_history::Model> for LoginHistoryResponse {
    fn from(h: login_history::Model) -> Self {
        Self {
            id: h.id,
            user: h.user_id,
            ip_address: h.ip_address,
            user_agent: h.user_agent,
            timestamp: timestamp(&h.timestamp),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<LoginHistoryResponse>>> {
    let rows = state.login_history_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginHistoryInput>,
) -> AppResult<Created<LoginHistoryResponse>> {
    let row = state.login_history_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LoginHistoryResponse>> {
    let row = state.login_history_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<LoginHistoryInput>,
) -> AppResult<Json<LoginHistoryResponse>> {
    let row = state.login_history_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<LoginHistoryPatch>,
) -> AppResult<Json<LoginHistoryResponse>> {
    let row = state.login_history_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.login_history_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
