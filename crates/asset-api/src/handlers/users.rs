use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::dto::{json_body, CredentialsRequest, UserCreatedResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/users/create
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), ApiError> {
    let request = json_body(payload)?.normalized()?;
    let id = state
        .credentials
        .create_user(&request.login, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserCreatedResponse { id })))
}
