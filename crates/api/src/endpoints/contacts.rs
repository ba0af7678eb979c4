//! Contact endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{ContactInput, ContactPatch};
use tasknote_db::Page;
use tasknote_db::entities::contact;

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project};

#[derive(Serialize)]
pub struct ContactResponse {
    pub id: String,
    pub user: String,
    pub landline: String,
    pub mobile_phone: String,
}

impl From<contact::Model> for ContactResponse {
    fn from(c: contact::Model) -> Self {
        Self {
            id: c.id,
            user: c.user_id,
            landline: c.landline,
            mobile_phone: c.mobile_phone,
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<ContactResponse>>> {
    let rows = state.contact_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ContactInput>,
) -> AppResult<Created<ContactResponse>> {
    let row = state.contact_service.create(&caller, input).await?;
    Ok(created(row.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ContactResponse>> {
    let row = state.contact_service.get(&caller, &id).await?;
    Ok(Json(row.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ContactInput>,
) -> AppResult<Json<ContactResponse>> {
    let row = state.contact_service.replace(&caller, &id, input).await?;
    Ok(Json(row.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ContactPatch>,
) -> AppResult<Json<ContactResponse>> {
    let row = state.contact_service.update(&caller, &id, patch).await?;
    Ok(Json(row.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.contact_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
