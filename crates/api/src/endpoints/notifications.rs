//! Notification endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{NotificationInput, NotificationPatch};
use tasknote_db::Page;
use tasknote_db::repositories::NotificationWithType;

use super::notification_types::NotificationTypeResponse;
use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

/// Notification response. The type is nested read-only; writes use `type_id`.
#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationTypeResponse>,
    pub user: String,
    pub note: Option<String>,
    pub message: String,
    pub sent_at: String,
    pub read: bool,
}

impl From<NotificationWithType> for NotificationResponse {
    fn from((n, kind): NotificationWithType) -> Self {
        Self {
            id: n.id,
            notification_type: kind.map(Into::into),
            user: n.user_id,
            note: n.note_id,
            message: n.message,
            sent_at: timestamp(&n.sent_at),
            read: n.read,
        }
    }
}

#[derive(Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let rows = state.notification_service.list(&caller, page).await?;
    Ok(project(rows))
}

/// The caller's notifications with `read == false`.
async fn unread(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<NotificationResponse>>> {
    let rows = state.notification_service.list_unread(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NotificationInput>,
) -> AppResult<Created<NotificationResponse>> {
    let row = state.notification_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NotificationResponse>> {
    let row = state.notification_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NotificationInput>,
) -> AppResult<Json<NotificationResponse>> {
    let row = state.notification_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NotificationPatch>,
) -> AppResult<Json<NotificationResponse>> {
    let row = state.notification_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn mark_read(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NotificationResponse>> {
    let row = state.notification_service.mark_read(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn mark_all_read(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<MarkAllReadResponse>> {
    let updated = state.notification_service.mark_all_read(&caller).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.notification_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/unread", get(unread))
        .route("/read-all", post(mark_all_read))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
        .route("/{id}/read", post(mark_read))
}
