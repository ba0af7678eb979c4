//! File attachment endpoints.
//!
//! Uploads are `multipart/form-data` with a `note` text part and a `file`
//! part; everything else is JSON.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::{AppError, AppResult, FieldErrors};
use tasknote_core::{FilePatch, FileService, FileUpload};
use tasknote_db::Page;
use tasknote_db::entities::file;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, timestamp};

#[derive(Serialize)]
pub struct FileResponse {
    pub id: String,
    pub note: String,
    /// Public URL of the blob.
    pub file: String,
    pub uploaded_at: String,
}

impl FileResponse {
    pub(crate) fn new(f: file::Model, files: &FileService) -> Self {
        Self {
            file: files.url(&f),
            id: f.id,
            note: f.note_id,
            uploaded_at: timestamp(&f.uploaded_at),
        }
    }
}

/// Pull the `note` and `file` parts out of a multipart body.
async fn read_upload(mut multipart: Multipart) -> AppResult<FileUpload> {
    let mut note = None;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("note") => note = Some(field.text().await?),
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await?;
                upload = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let mut errors = FieldErrors::new();
    if note.as_deref().is_none_or(str::is_empty) {
        errors.add("note", "This field is required.");
    }
    if upload.is_none() {
        errors.add("file", "No file was submitted.");
    }
    errors.into_result()?;

    match (note, upload) {
        (Some(note), Some((file_name, bytes))) => Ok(FileUpload {
            note,
            file_name,
            bytes,
        }),
        _ => Err(AppError::BadRequest("Incomplete upload".to_string())),
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<FileResponse>>> {
    let files = state.file_service.list(&caller, page).await?;
    Ok(Json(
        files
            .into_iter()
            .map(|f| FileResponse::new(f, &state.file_service))
            .collect(),
    ))
}

async fn upload(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Created<FileResponse>> {
    let upload = read_upload(multipart).await?;
    let file = state.file_service.create(&caller, upload).await?;
    Ok(created(FileResponse::new(file, &state.file_service)))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FileResponse>> {
    let file = state.file_service.get(&caller, &id).await?;
    Ok(Json(FileResponse::new(file, &state.file_service)))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<FilePatch>,
) -> AppResult<Json<FileResponse>> {
    if patch.note.is_none() {
        return Err(AppError::field("note", "This field is required."));
    }
    update(AuthUser(caller), State(state), Path(id), ApiJson(patch)).await
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<FilePatch>,
) -> AppResult<Json<FileResponse>> {
    let file = state.file_service.update(&caller, &id, patch).await?;
    Ok(Json(FileResponse::new(file, &state.file_service)))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.file_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(upload))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
