//! Token endpoints: obtain, refresh, verify.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tasknote_common::AppResult;
use tasknote_core::{LoginInput, TokenPair};
use tracing::{info, warn};

use crate::extractors::{ApiJson, ClientInfo};
use crate::middleware::AppState;

/// Refresh request.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh response.
#[derive(Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Verify request.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// Exchange credentials for an access/refresh pair.
///
/// A successful login stamps `last_login` and, when the client address is
/// known, leaves a login history row.
async fn obtain(
    State(state): State<AppState>,
    client: ClientInfo,
    ApiJson(req): ApiJson<LoginInput>,
) -> AppResult<Json<TokenPair>> {
    let user = state.user_service.authenticate(&req).await?;
    let pair = state.token_service.issue_pair(&user.id)?;

    state.user_service.touch_last_login(&user.id).await?;
    match client.ip {
        Some(ip) => {
            state
                .login_history_service
                .record(&user.id, ip.to_string(), client.user_agent)
                .await?;
        }
        None => warn!(user_id = %user.id, "Client address unknown; login not recorded"),
    }

    info!(user_id = %user.id, "Token pair issued");
    Ok(Json(pair))
}

async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let access = state.token_service.refresh(&req.refresh)?;
    Ok(Json(RefreshResponse { access }))
}

async fn verify(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VerifyRequest>,
) -> AppResult<Json<Value>> {
    state.token_service.verify(&req.token)?;
    Ok(Json(json!({})))
}

/// Create auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token", post(obtain))
        .route("/token/refresh", post(refresh))
        .route("/token/verify", post(verify))
}
