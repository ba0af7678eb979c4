//! Chat interaction endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{ChatInteractionInput, ChatInteractionPatch};
use tasknote_db::Page;
use tasknote_db::entities::chat_interaction;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

#[derive(Serialize)]
pub struct ChatInteractionResponse {
    pub id: String,
    pub user: String,
    pub message: String,
    pub response: String,
    pub timestamp: String,
    pub note_context: Option<String>,
}

impl From<chat_interaction::Model> for ChatInteractionResponse {
    fn from(c: chat_interaction::Model) -> Self {
        Self {
            id: c.id,
            user: c.user_id,
            message: c.message,
            response: c.response,
            timestamp: timestamp(&c.timestamp),
            note_context: c.note_context_id,
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<ChatInteractionResponse>>> {
    let rows = state.chat_interaction_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ChatInteractionInput>,
) -> AppResult<Created<ChatInteractionResponse>> {
    let row = state.chat_interaction_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ChatInteractionResponse>> {
    let row = state.chat_interaction_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ChatInteractionInput>,
) -> AppResult<Json<ChatInteractionResponse>> {
    let row = state.chat_interaction_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ChatInteractionPatch>,
) -> AppResult<Json<ChatInteractionResponse>> {
    let row = state.chat_interaction_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.chat_interaction_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
