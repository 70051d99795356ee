// ============================================================================
// Asset API - Auth Handlers
// File: crates/asset-api/src/handlers/auth.rs
// ============================================================================
//! Login

use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    Json,
};

use crate::dto::{json_body, CredentialsRequest, TokenResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Login handler - POST /api/auth
///
/// Returns the caller's active token, creating a session when none is live.
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request = json_body(payload)?.normalized()?;
    let client_ip = peer.ip().to_string();

    let grant = state
        .sessions
        .authenticate(&request.login, &request.password, &client_ip)
        .await?;

    Ok(Json(TokenResponse {
        token: grant.token.into_inner(),
    }))
}
