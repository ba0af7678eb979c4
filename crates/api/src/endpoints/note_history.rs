//! Note history endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{NoteHistoryInput, NoteHistoryPatch, NoteHistoryWithEditor};
use tasknote_db::Page;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

/// One earlier version of a note. `edited_by` is a username.
#[derive(Serialize)]
pub struct NoteHistoryResponse {
    pub id: String,
    pub note: String,
    pub previous_content: String,
    pub edited_by: Option<String>,
    pub edited_at: String,
}

impl From<NoteHistoryWithEditor> for NoteHistoryResponse {
    fn from((h, editor): NoteHistoryWithEditor) -> Self {
        Self {
            id: h.id,
            note: h.note_id,
            previous_content: h.previous_content,
            edited_by: editor,
            edited_at: timestamp(&h.edited_at),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<NoteHistoryResponse>>> {
    let rows = state.note_history_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NoteHistoryInput>,
) -> AppResult<Created<NoteHistoryResponse>> {
    let row = state.note_history_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteHistoryResponse>> {
    let row = state.note_history_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NoteHistoryInput>,
) -> AppResult<Json<NoteHistoryResponse>> {
    let row = state.note_history_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NoteHistoryPatch>,
) -> AppResult<Json<NoteHistoryResponse>> {
    let row = state.note_history_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.note_history_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
