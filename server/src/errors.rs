use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Everything that can go wrong inside a single invocation. Every variant is
/// caught at the handler boundary and turned into a `{success: false, error}`
/// JSON body (or a relay page on the browser-facing callback path).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing Pinterest configuration")]
    Configuration,

    #[error("No authorization code received")]
    MissingCode,

    #[error("Access token required")]
    MissingToken,

    #[error("Refresh token required")]
    MissingRefreshToken,

    #[error("Missing required pin field: {0}")]
    MissingPinField(&'static str),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Pinterest answered with a non-success status. The status is propagated
    /// to our own caller along with the upstream `message`.
    #[error("{message}")]
    Provider { status: StatusCode, message: String },

    /// No response from Pinterest at all (connect failure, timeout, TLS).
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Provider { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");

        let body = json!({
            "success": false,
            "error": self.to_string(),
        });

        (self.status(), Json(body)).into_response()
    }
}
