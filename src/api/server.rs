//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::{handlers, models::{ApiError, SaveTranscriptRequest}};
use crate::config::Config;
use crate::error::ScribeError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Configure and start the HTTP server
pub async fn start_http_server(config: Arc<Config>, port: u16) -> Result<()> {
    let app_state = AppState { config };

    // Allow browser access from the UI
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/transcribe", post(transcribe_handler))
        .route("/api/save-transcript", post(save_transcript_handler))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check()))
}

/// Multipart upload + transcription handler
async fn transcribe_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let api_key = bearer_token(&headers);

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(|name| name.to_string())
                .unwrap_or_else(|| "upload".to_string());
            match field.bytes().await {
                Ok(bytes) => upload = Some((filename, bytes.to_vec())),
                Err(e) => {
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read upload: {}", e),
                    );
                }
            }
        }
    }

    let Some((filename, file_bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "No file provided".to_string());
    };

    match handlers::transcribe_upload(&state.config, api_key, &filename, file_bytes).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => scribe_error_response(e),
    }
}

/// Save-transcript handler
async fn save_transcript_handler(
    State(state): State<AppState>,
    Json(request): Json<SaveTranscriptRequest>,
) -> impl IntoResponse {
    if request.filename.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing filename".to_string());
    }

    match handlers::save_transcript(&state.config, &request.filename, &request.transcript).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => scribe_error_response(e),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

fn scribe_error_response(error: ScribeError) -> axum::response::Response {
    let status = match error {
        ScribeError::MissingApiKey => StatusCode::UNAUTHORIZED,
        ScribeError::MediaNotFound(_) | ScribeError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
        ScribeError::Api { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error.to_string())
}

fn error_response(status: StatusCode, message: String) -> axum::response::Response {
    (status, Json(ApiError::new(message))).into_response()
}
