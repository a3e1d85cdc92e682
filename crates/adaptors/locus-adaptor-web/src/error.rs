//! Mapping from pipeline failures to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use locus_core::{LocusError, PipelineStage};
use tracing::error;

/// API error types
///
/// Pipeline failures carry only the stage they came from; the diagnostic is
/// logged when the error is built and never sent to the client.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range request
    BadRequest(String),
    /// The query could not be turned into a search
    Unprocessable(Option<PipelineStage>),
    /// The search ran but matched nothing
    NotFound(Option<PipelineStage>),
    /// An upstream provider failed or timed out
    BadGateway(Option<PipelineStage>),
    /// Anything else
    Internal(Option<PipelineStage>),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Unprocessable(_) => {
                "We couldn't work out what you're looking for. Try rephrasing your request.".to_string()
            }
            ApiError::NotFound(_) => "No matching places found nearby.".to_string(),
            ApiError::BadGateway(_) => {
                "A location service is unavailable right now. Please try again.".to_string()
            }
            ApiError::Internal(_) => "Something went wrong while searching.".to_string(),
        }
    }

    fn stage(&self) -> Option<PipelineStage> {
        match self {
            ApiError::BadRequest(_) => None,
            ApiError::Unprocessable(stage)
            | ApiError::NotFound(stage)
            | ApiError::BadGateway(stage)
            | ApiError::Internal(stage) => *stage,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = serde_json::json!({
            "success": false,
            "error": self.message(),
            "code": status.as_u16(),
        });
        if let Some(stage) = self.stage() {
            body["stage"] = serde_json::json!(stage);
        }

        (status, Json(body)).into_response()
    }
}

impl From<LocusError> for ApiError {
    fn from(err: LocusError) -> Self {
        let stage = err.stage();
        let api = match err.root_cause() {
            LocusError::Validation(msg) => return ApiError::BadRequest(msg.clone()),
            LocusError::IntentParse(_) | LocusError::IntentIncomplete(_) => {
                ApiError::Unprocessable(stage)
            }
            LocusError::NoResults(_) => ApiError::NotFound(stage),
            LocusError::Provider(_) | LocusError::Timeout(_) => ApiError::BadGateway(stage),
            _ => ApiError::Internal(stage),
        };
        error!("Search failed: {}", err);
        api
    }
}
