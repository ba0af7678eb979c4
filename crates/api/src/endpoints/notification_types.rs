//! Notification type endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{NotificationTypeInput, NotificationTypePatch};
use tasknote_db::Page;
use tasknote_db::entities::notification_type;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project};

#[derive(Serialize)]
pub struct NotificationTypeResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub template: String,
}

impl From<notification_type::Model> for NotificationTypeResponse {
    fn from(t: notification_type::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            template: t.template,
        }
    }
}

async fn list(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<NotificationTypeResponse>>> {
    let rows = state.notification_type_service.list(page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NotificationTypeInput>,
) -> AppResult<Created<NotificationTypeResponse>> {
    let row = state.notification_type_service.create(input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NotificationTypeResponse>> {
    let row = state.notification_type_service.get(&id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NotificationTypeInput>,
) -> AppResult<Json<NotificationTypeResponse>> {
    let row = state.notification_type_service.replace(&id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NotificationTypePatch>,
) -> AppResult<Json<NotificationTypeResponse>> {
    let row = state.notification_type_service.update(&id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.notification_type_service.delete(&id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
