//! Note recommendation endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{NoteRecommendationInput, NoteRecommendationPatch};
use tasknote_db::Page;
use tasknote_db::entities::note_recommendation;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

#[derive(Serialize)]
pub struct NoteRecommendationResponse {
    pub id: String,
    pub user: String,
    pub recommended_note: String,
    pub score: f64,
    pub algorithm_version: String,
    pub created_at: String,
}

impl From<note_recommendation::Model> for NoteRecommendationResponse {
    fn from(r: note_recommendation::Model) -> Self {
        Self {
            id: r.id,
            user: r.user_id,
            recommended_note: r.recommended_note_id,
            score: r.score,
            algorithm_version: r.algorithm_version,
            created_at: timestamp(&r.created_at),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<NoteRecommendationResponse>>> {
    let rows = state.note_recommendation_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NoteRecommendationInput>,
) -> AppResult<Created<NoteRecommendationResponse>> {
    let row = state.note_recommendation_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteRecommendationResponse>> {
    let row = state.note_recommendation_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NoteRecommendationInput>,
) -> AppResult<Json<NoteRecommendationResponse>> {
    let row = state.note_recommendation_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NoteRecommendationPatch>,
) -> AppResult<Json<NoteRecommendationResponse>> {
    let row = state.note_recommendation_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.note_recommendation_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
