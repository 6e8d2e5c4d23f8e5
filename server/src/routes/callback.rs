use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::ApiError;
use crate::pinterest;
use crate::relay;
use crate::state::{AppState, ClientCredentials};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Handle the OAuth callback from Pinterest. The caller here is a browser
/// popup, so every outcome (failure included) is answered with a relay page
/// that posts the result to the opener and closes the window.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let credentials = match state.pinterest.client_credentials() {
        Ok(credentials) => credentials,
        Err(err) => {
            return relay::failure_page(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    // The provider reported a consent failure (e.g. access_denied). No
    // exchange is attempted; the literal error string goes to the opener.
    if let Some(error) = params.error {
        warn!(
            error = %error,
            description = params.error_description.as_deref().unwrap_or(""),
            "authorization rejected by Pinterest"
        );
        return relay::failure_page(StatusCode::BAD_REQUEST, &error);
    }

    let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) else {
        let err = ApiError::MissingCode;
        return relay::failure_page(err.status(), &err.to_string());
    };

    info!(state = params.state.as_deref().unwrap_or(""), "received authorization code");

    match exchange_and_fetch_profile(&state, credentials, code).await {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(error = %err, "callback exchange failed");
            relay::failure_page(err.status(), &err.to_string())
        }
    }
}

/// The two dependent provider calls of the happy path: code -> tokens, then
/// tokens -> profile.
async fn exchange_and_fetch_profile(
    state: &AppState,
    credentials: ClientCredentials<'_>,
    code: &str,
) -> Result<Response, ApiError> {
    let tokens = pinterest::exchange_code(&state.http, &state.pinterest, credentials, code).await?;
    let user = pinterest::user_account(&state.http, &state.pinterest, &tokens.access_token).await?;

    info!("authorization code exchange succeeded");
    Ok(relay::success_page(tokens, user))
}
