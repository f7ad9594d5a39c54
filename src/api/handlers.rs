//! API request handlers
//!
//! Every failure is turned into an error envelope here; the preview state is
//! only touched once a dropped file has parsed completely.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use super::server::AppState;
use crate::error::TemplateError;
use crate::excel::{TemplateBuilder, TemplateParser};
use crate::preview::PreviewSession;
use crate::types::{LookupEntry, PreviewRow};
use crate::upload::{accept_drop, DroppedFile};

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for a failed template operation
pub fn status_for(err: &TemplateError) -> StatusCode {
    match err {
        TemplateError::InvalidFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        TemplateError::SheetNotFound(_) | TemplateError::Decoding(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response<T: Serialize + Default>(err: &TemplateError) -> Response {
    if err.is_upload_error() {
        warn!("rejected upload: {}", err);
    } else {
        error!("template operation failed: {}", err);
    }
    (status_for(err), Json(ApiResponse::<T>::err(err.to_string()))).into_response()
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Roster API Server".to_string(),
        version: state.version.clone(),
        description: "Excel roster template download and upload preview".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new("/api/v1/template", "GET", "Download the Excel template"),
            EndpointInfo::new("/api/v1/lookup", "GET", "List the dropdown lookup values"),
            EndpointInfo::new(
                "/api/v1/preview?filename=NAME",
                "POST",
                "Upload a filled-in template (raw body) and preview its rows",
            ),
            EndpointInfo::new("/api/v1/preview", "GET", "Show the current preview"),
            EndpointInfo::new("/api/v1/preview", "DELETE", "Reset the preview"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "template".to_string(),
            "lookup".to_string(),
            "preview".to_string(),
        ],
    }))
}

/// GET /api/v1/template - Download the template workbook
pub async fn download_template(State(state): State<Arc<AppState>>) -> Response {
    let config = &state.template;
    match TemplateBuilder::new(config).download(&config.sample_rows) {
        Ok(download) => {
            let headers = [
                (header::CONTENT_TYPE, download.content_type().to_string()),
                (header::CONTENT_DISPOSITION, download.content_disposition()),
            ];
            (StatusCode::OK, headers, download.into_bytes()).into_response()
        }
        Err(e) => error_response::<()>(&e),
    }
}

/// Lookup response
#[derive(Serialize, Default)]
pub struct LookupResponse {
    pub sheet_name: String,
    pub entries: Vec<LookupEntry>,
}

/// GET /api/v1/lookup - Dropdown values
pub async fn lookup(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(LookupResponse {
        sheet_name: state.template.lookup_sheet_name.clone(),
        entries: state.template.lookup.entries().to_vec(),
    }))
}

/// Upload query parameters
#[derive(Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub filename: Option<String>,
}

/// Preview response
#[derive(Serialize, Default)]
pub struct PreviewResponse {
    pub source: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub count: usize,
    pub rows: Vec<PreviewRow>,
}

impl From<&PreviewSession> for PreviewResponse {
    fn from(session: &PreviewSession) -> Self {
        Self {
            source: session.source().map(str::to_string),
            loaded_at: session.loaded_at(),
            count: session.rows().len(),
            rows: session.rows().to_vec(),
        }
    }
}

/// POST /api/v1/preview?filename=NAME - Drop a file for preview
pub async fn upload_preview(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Response {
    let dropped = match params.filename {
        Some(name) => vec![DroppedFile::new(name, body.to_vec())],
        None => Vec::new(),
    };
    let file = match accept_drop(dropped) {
        Ok(file) => file,
        Err(e) => return error_response::<PreviewResponse>(&e),
    };

    let parser = TemplateParser::new(&state.template.sheet_name).with_expected_headers(
        state
            .template
            .schema
            .columns()
            .iter()
            .map(|col| col.header.clone()),
    );
    let bytes = file.bytes;
    let parsed = tokio::task::spawn_blocking(move || parser.parse(&bytes)).await;

    let records = match parsed {
        Ok(Ok(records)) => records,
        Ok(Err(e)) => return error_response::<PreviewResponse>(&e),
        Err(join_err) => {
            error!("preview task failed: {}", join_err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<PreviewResponse>::err("Error reading the file")),
            )
                .into_response();
        }
    };

    let mut session = state.preview_mut();
    session.replace(file.name, records, &state.template.lookup);
    Json(ApiResponse::ok(PreviewResponse::from(&*session))).into_response()
}

/// GET /api/v1/preview - Current preview
pub async fn get_preview(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.preview();
    Json(ApiResponse::ok(PreviewResponse::from(&*session)))
}

/// DELETE /api/v1/preview - Reset the preview
pub async fn reset_preview(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.preview_mut();
    session.reset();
    Json(ApiResponse::ok(PreviewResponse::from(&*session)))
}
