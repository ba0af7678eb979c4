//! Sharing endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{SharingInput, SharingPatch};
use tasknote_db::Page;
use tasknote_db::entities::sharing;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

#[derive(Serialize)]
pub struct SharingResponse {
    pub id: String,
    pub note: String,
    pub shared_with: String,
    pub can_edit: bool,
    pub shared_at: String,
}

impl From<sharing::Model> for SharingResponse {
    fn from(s: sharing::Model) -> Self {
        Self {
            id: s.id,
            note: s.note_id,
            shared_with: s.shared_with_id,
            can_edit: s.can_edit,
            shared_at: timestamp(&s.shared_at),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<SharingResponse>>> {
    let rows = state.sharing_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SharingInput>,
) -> AppResult<Created<SharingResponse>> {
    let row = state.sharing_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SharingResponse>> {
    let row = state.sharing_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<SharingInput>,
) -> AppResult<Json<SharingResponse>> {
    let row = state.sharing_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<SharingPatch>,
) -> AppResult<Json<SharingResponse>> {
    let row = state.sharing_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.sharing_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
