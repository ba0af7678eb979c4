//! Note tag endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{NoteTagInput, NoteTagPatch};
use tasknote_db::Page;
use tasknote_db::entities::note_tag;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project};

#[derive(Serialize)]
pub struct NoteTagResponse {
    pub id: String,
    pub note: String,
    pub tag: String,
}

impl From<note_tag::Model> for NoteTagResponse {
    fn from(t: note_tag::Model) -> Self {
        Self {
            id: t.id,
            note: t.note_id,
            tag: t.tag,
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<NoteTagResponse>>> {
    let rows = state.note_tag_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NoteTagInput>,
) -> AppResult<Created<NoteTagResponse>> {
    let row = state.note_tag_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteTagResponse>> {
    let row = state.note_tag_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NoteTagInput>,
) -> AppResult<Json<NoteTagResponse>> {
    let row = state.note_tag_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NoteTagPatch>,
) -> AppResult<Json<NoteTagResponse>> {
    let row = state.note_tag_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.note_tag_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
