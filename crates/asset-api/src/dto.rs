//! Request and response bodies

use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use asset_core::domain::{AssetMetadata, UserId};

use crate::error::ApiError;

/// Body of signup and login.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, message = "login must not be empty"))]
    pub login: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

impl CredentialsRequest {
    /// Trim both fields, then require them non-empty.
    pub fn normalized(self) -> Result<Self, ApiError> {
        let request = Self {
            login: self.login.trim().to_owned(),
            password: self.password.trim().to_owned(),
        };
        request
            .validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(request)
    }
}

#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
    pub id: UserId,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Raw query values; parsed by the handler so bad input gets a JSON error.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssetListResponse {
    pub assets: Vec<AssetMetadata>,
}

pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}
