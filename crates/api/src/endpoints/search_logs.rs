//! Search log endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{SearchLogInput, SearchLogPatch};
use tasknote_db::Page;
use tasknote_db::entities::search_log;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

#[derive(Serialize)]
pub struct SearchLogResponse {
    pub id: String,
    pub user: Option<String>,
    pub query: String,
    pub results_count: i32,
    pub created_at: String,
}

impl From<search_log::Model> for SearchLogResponse {
    fn from(l: search_log::Model) -> Self {
        Self {
            id: l.id,
            user: l.user_id,
            query: l.query,
            results_count: l.results_count,
            created_at: timestamp(&l.created_at),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<SearchLogResponse>>> {
    let rows = state.search_log_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SearchLogInput>,
) -> AppResult<Created<SearchLogResponse>> {
    let row = state.search_log_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SearchLogResponse>> {
    let row = state.search_log_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<SearchLogInput>,
) -> AppResult<Json<SearchLogResponse>> {
    let row = state.search_log_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<SearchLogPatch>,
) -> AppResult<Json<SearchLogResponse>> {
    let row = state.search_log_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.search_log_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
