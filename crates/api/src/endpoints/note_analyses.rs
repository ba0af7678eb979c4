//! Note analysis endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use tasknote_db::entities::note_analysis::Sentiment;
use tasknote_common::AppResult;
use tasknote_core::{NoteAnalysisInput, NoteAnalysisPatch};
use tasknote_db::Page;
use tasknote_db::entities::note_analysis;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project, timestamp};

#[derive(Serialize)]
pub struct NoteAnalysisResponse {
    pub id: String,
    pub note: String,
    pub summary: String,
    pub sentiment: Sentiment,
    pub keywords: Value,
    pub created_at: String,
}

impl From<note_analysis::Model> for NoteAnalysisResponse {
    fn from(a: note_analysis::Model) -> Self {
        Self {
            id: a.id,
            note: a.note_id,
            summary: a.summary,
            sentiment: a.sentiment,
            keywords: a.keywords,
            created_at: timestamp(&a.created_at),
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<NoteAnalysisResponse>>> {
    let rows = state.note_analysis_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NoteAnalysisInput>,
) -> AppResult<Created<NoteAnalysisResponse>> {
    let row = state.note_analysis_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<NoteAnalysisResponse>> {
    let row = state.note_analysis_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NoteAnalysisInput>,
) -> AppResult<Json<NoteAnalysisResponse>> {
    let row = state.note_analysis_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NoteAnalysisPatch>,
) -> AppResult<Json<NoteAnalysisResponse>> {
    let row = state.note_analysis_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.note_analysis_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
