//! REST API route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use liftnote_parser::{ExerciseRecord, ParserError};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Response payload for the `/api/status` endpoint.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
}

/// Report that the server is up and which model it talks to.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model: state.model.clone(),
    })
}

// ---------------------------------------------------------------------------
// POST /api/parse
// ---------------------------------------------------------------------------

/// Request body for the `/api/parse` endpoint.
#[derive(Debug, Deserialize)]
pub struct ParseBody {
    pub input: String,
}

/// Parse workout text into exercise records.
pub async fn parse(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ParseBody>,
) -> Result<Json<Vec<ExerciseRecord>>, ApiError> {
    tracing::debug!(chars = body.input.len(), "parse request");
    let records = state.parser.parse(&body.input).await?;
    Ok(Json(records))
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A parser failure rendered as `{"error": {"kind", "message"}}`.
#[derive(Debug)]
pub struct ApiError(pub ParserError);

impl From<ParserError> for ApiError {
    fn from(e: ParserError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            ParserError::Gateway(_) => StatusCode::BAD_GATEWAY,
            ParserError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ParserError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), error = %self.0, "parse request failed");
        } else {
            tracing::warn!(kind = self.0.kind(), error = %self.0, "parse request rejected");
        }

        let body = json!({
            "error": {
                "kind": self.0.kind(),
                "message": self.0.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}
