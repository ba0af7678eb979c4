//! Note suggestion endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{NoteSuggestionInput, NoteSuggestionPatch};
use tasknote_db::Page;
use tasknote_db::entities::note_suggestion;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

#[derive(Serialize)]
pub struct NoteSuggestionResponse {
    pub id: String,
    pub note: String,
    pub suggestion: String,
    pub applied: bool,
    pub created_at: String,
}

impl From<note_suggestion::Model> for NoteSuggestionResponse {
    fn from(s: note_suggestion::Model) -> Self {
        Self {
            id: s.id,
            note: s.note_id,
            suggestion: s.suggestion,
            applied: s.applied,
            created_at: timestamp(&s.created_at),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<NoteSuggestionResponse>>> {
    let rows = state.note_suggestion_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NoteSuggestionInput>,
) -> AppResult<Created<NoteSuggestionResponse>> {
    let row = state.note_suggestion_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteSuggestionResponse>> {
    let row = state.note_suggestion_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NoteSuggestionInput>,
) -> AppResult<Json<NoteSuggestionResponse>> {
    let row = state.note_suggestion_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NoteSuggestionPatch>,
) -> AppResult<Json<NoteSuggestionResponse>> {
    let row = state.note_suggestion_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.note_suggestion_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
