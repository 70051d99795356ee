// ============================================================================
// Asset API - Asset Handlers
// File: crates/asset-api/src/handlers/assets.rs
// ============================================================================
//! Upload, fetch, list and delete of the caller's assets

use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};

use asset_core::domain::{AssetUpload, Page};
use asset_core::upload::CappedBody;
use asset_shared::constants::{DEFAULT_LIST_LIMIT, DEFAULT_LIST_OFFSET};

use crate::dto::{AssetListResponse, ListParams, StatusResponse};
use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::state::AppState;

const MULTIPART_FORM_DATA: &str = "multipart/form-data";
const OCTET_STREAM: &str = "application/octet-stream";
const FILE_FIELD: &str = "file";

/// Upload handler - POST /api/upload-asset/{name}
///
/// `multipart/form-data` bodies store their `file` field; anything else is
/// stored as the raw request body under the request's media type.
pub async fn upload_asset(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(name): Path<String>,
    request: Request,
) -> Result<Json<StatusResponse>, ApiError> {
    let content_type = request_content_type(request.headers())?;
    let declared = declared_length(request.headers())?;
    let limit = state.upload_limit;

    if declared.is_some_and(|len| len > limit) {
        return Err(ApiError::PayloadTooLarge(format!(
            "declared body exceeds {} bytes",
            limit
        )));
    }

    if media_type(&content_type) == MULTIPART_FORM_DATA {
        let mut multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        // Skipped fields count against the same limit as the file itself.
        let mut skipped: u64 = 0;
        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?
        {
            if field.name() != Some(FILE_FIELD) {
                debug!(field = ?field.name(), "Skipping multipart field");
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?
                {
                    skipped += chunk.len() as u64;
                    if skipped > limit {
                        return Err(ApiError::PayloadTooLarge(format!(
                            "multipart body exceeds {} bytes",
                            limit
                        )));
                    }
                }
                continue;
            }

            let upload = AssetUpload {
                name,
                original_name: field.file_name().map(str::to_owned),
                content_type: field.content_type().unwrap_or(OCTET_STREAM).to_owned(),
            };
            state
                .assets
                .upload(owner, upload, CappedBody::new(field, limit, None))
                .await?;
            return Ok(Json(StatusResponse::ok()));
        }

        return Err(ApiError::BadRequest(format!(
            "multipart body has no '{}' field",
            FILE_FIELD
        )));
    }

    info!(owner, name = %name, "Receiving raw upload");
    let upload = AssetUpload {
        name,
        original_name: None,
        content_type,
    };
    let body = request.into_body().into_data_stream();
    state
        .assets
        .upload(owner, upload, CappedBody::new(body, limit, declared))
        .await?;

    Ok(Json(StatusResponse::ok()))
}

/// POST /api/upload-asset/ with the name segment left empty.
pub async fn upload_missing_name() -> ApiError {
    ApiError::BadRequest("asset name is required".into())
}

/// GET /api/asset/{name}
pub async fn fetch_asset(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let asset = state.assets.fetch(owner, &name).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&asset.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(OCTET_STREAM)),
    );
    if let Some(disposition) = asset.original_name.as_deref().and_then(attachment) {
        headers.insert(CONTENT_DISPOSITION, disposition);
    }

    Ok((headers, Body::from(asset.payload)).into_response())
}

/// GET /api/list-assets?limit=&offset=
pub async fn list_assets(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<AssetListResponse>, ApiError> {
    let page = Page::new(
        parse_param("limit", params.limit.as_deref(), DEFAULT_LIST_LIMIT)?,
        parse_param("offset", params.offset.as_deref(), DEFAULT_LIST_OFFSET)?,
    );
    let assets = state.assets.list(owner, page).await?;

    Ok(Json(AssetListResponse { assets }))
}

/// DELETE /api/asset/{name}
pub async fn delete_asset(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    Path(name): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.assets.delete(owner, &name).await?;
    Ok(Json(StatusResponse::ok()))
}

fn request_content_type(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(CONTENT_TYPE)
        .ok_or_else(|| ApiError::BadRequest("Content-Type header is required".into()))?
        .to_str()
        .map_err(|_| ApiError::BadRequest("Content-Type header is not valid text".into()))?
        .trim();

    let essence = value.split(';').next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty() => Ok(essence.to_owned()),
        _ => Err(ApiError::BadRequest(format!(
            "unparsable Content-Type '{}'",
            value
        ))),
    }
}

/// Type and subtype without parameters, lowercased.
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn declared_length(headers: &HeaderMap) -> Result<Option<u64>, ApiError> {
    headers
        .get(CONTENT_LENGTH)
        .map(|value| {
            value
                .to_str()
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .ok_or_else(|| ApiError::BadRequest("invalid Content-Length".into()))
        })
        .transpose()
}

fn parse_param(key: &str, raw: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("{} must be an integer", key))),
    }
}

fn attachment(original_name: &str) -> Option<HeaderValue> {
    let filename: String = original_name
        .chars()
        .filter(|c| *c != '"' && *c != '\\')
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename)).ok()
}
