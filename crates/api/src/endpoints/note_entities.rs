//! Note entity endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{NoteEntityInput, NoteEntityPatch};
use tasknote_db::Page;
use tasknote_db::entities::note_entity;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project};

#[derive(Serialize)]
pub struct NoteEntityResponse {
    pub id: String,
    pub note: String,
    pub entity_type: String,
    pub entity_value: String,
}

impl From<note_entity::Model> for NoteEntityResponse {
    fn from(e: note_entity::Model) -> Self {
        Self {
            id: e.id,
            note: e.note_id,
            entity_type: e.entity_type,
            entity_value: e.entity_value,
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<NoteEntityResponse>>> {
    let rows = state.note_entity_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NoteEntityInput>,
) -> AppResult<Created<NoteEntityResponse>> {
    let row = state.note_entity_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteEntityResponse>> {
    let row = state.note_entity_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NoteEntityInput>,
) -> AppResult<Json<NoteEntityResponse>> {
    let row = state.note_entity_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NoteEntityPatch>,
) -> AppResult<Json<NoteEntityResponse>> {
    let row = state.note_entity_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.note_entity_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
