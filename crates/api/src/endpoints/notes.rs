//! Note endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{FileService, NoteInput, NotePatch, NoteWithRelations};
use tasknote_db::Page;

use super::categories::CategoryResponse;
use super::files::FileResponse;
use super::subjects::SubjectResponse;
use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, timestamp};

/// A note with its categories, subjects and files nested read-only.
#[derive(Serialize)]
pub struct NoteResponse {
    pub id: String,
    pub user: String,
    pub title: String,
    pub content: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
    pub categories: Vec<CategoryResponse>,
    pub subjects: Vec<SubjectResponse>,
    pub files: Vec<FileResponse>,
}

impl NoteResponse {
    /// File URLs come from the storage backend, hence the service.
    fn new(n: NoteWithRelations, files: &FileService) -> Self {
        let NoteWithRelations { note, relations } = n;
        Self {
            id: note.id,
            user: note.user_id,
            title: note.title,
            content: note.content,
            completed: note.completed,
            created_at: timestamp(&note.created_at),
            updated_at: timestamp(&note.updated_at),
            categories: relations.categories.into_iter().map(Into::into).collect(),
            subjects: relations.subjects.into_iter().map(Into::into).collect(),
            files: relations
                .files
                .into_iter()
                .map(|f| FileResponse::new(f, files))
                .collect(),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<NoteResponse>>> {
    let notes = state.note_service.list(&caller, page).await?;
    Ok(Json(
        notes
            .into_iter()
            .map(|n| NoteResponse::new(n, &state.file_service))
            .collect(),
    ))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NoteInput>,
) -> AppResult<Created<NoteResponse>> {
    let note = state.note_service.create(&caller, input).await?;
    Ok(created(NoteResponse::new(note, &state.file_service)))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteResponse>> {
    let note = state.note_service.get(&caller, &id).await?;
    Ok(Json(NoteResponse::new(note, &state.file_service)))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NoteInput>,
) -> AppResult<Json<NoteResponse>> {
    let note = state.note_service.replace(&caller, &id, input).await?;
    Ok(Json(NoteResponse::new(note, &state.file_service)))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NotePatch>,
) -> AppResult<Json<NoteResponse>> {
    let note = state.note_service.update(&caller, &id, patch).await?;
    Ok(Json(NoteResponse::new(note, &state.file_service)))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.note_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
