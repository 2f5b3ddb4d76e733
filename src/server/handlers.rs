use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub term: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// `GET /search?term=...`
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let term = params.term.unwrap_or_default();
    if term.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "missing search term");
    }

    let records = state.engine.search(&term);
    tracing::debug!(term = %term, matches = records.len(), "Search");

    Json(records).into_response()
}

/// `GET /autocomplete`: the configured JSON file, byte for byte
pub async fn handle_autocomplete(State(state): State<AppState>) -> Response {
    match tokio::fs::read(&*state.autocomplete).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(
                "Failed to read autocomplete file {}: {}",
                state.autocomplete.display(),
                e
            );
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "autocomplete data unavailable",
            )
        }
    }
}
