//! Address endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tasknote_common::AppResult;
use tasknote_core::{AddressInput, AddressPatch};
use tasknote_db::Page;
use tasknote_db::entities::address::{self, State as UnitState};

use crate::extractors::{ApiJson, AuthUser};
use crate::middleware::AppState;
use crate::response::{Created, created, no_content, project};

#[derive(Serialize)]
pub struct AddressResponse {
    pub id: String,
    pub user: String,
    pub state: UnitState,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub postal_code: String,
}

impl From<address::Model> for AddressResponse {
    fn from(a: address::Model) -> Self {
        Self {
            id: a.id,
            user: a.user_id,
            state: a.state,
            street: a.street,
            number: a.number,
            complement: a.complement,
            neighborhood: a.neighborhood,
            city: a.city,
            postal_code: a.postal_code,
        }
    }
}

async fn list(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> AppResult<Json<Vec<AddressResponse>>> {
    let rows = state.address_service.list(&caller, page).await?;
    Ok(project(rows))
}

async fn create(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AddressInput>,
) -> AppResult<Created<AddressResponse>> {
    let address = state.address_service.create(&caller, input).await?;
    Ok(created(address.into()))
}

async fn get_one(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AddressResponse>> {
    let address = state.address_service.get(&caller, &id).await?;
    Ok(Json(address.into()))
}

async fn replace(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<AddressInput>,
) -> AppResult<Json<AddressResponse>> {
    let address = state.address_service.replace(&caller, &id, input).await?;
    Ok(Json(address.into()))
}

async fn update(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<AddressPatch>,
) -> AppResult<Json<AddressResponse>> {
    let address = state.address_service.update(&caller, &id, patch).await?;
    Ok(Json(address.into()))
}

async fn delete(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    no_content(state.address_service.delete(&caller, &id).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(replace).patch(update).delete(delete))
}
