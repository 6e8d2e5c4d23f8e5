use axum::extract::State;
use axum::Json;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{json, Value};

use crate::errors::ApiError;
use crate::state::AppState;

/// The fixed permission set requested from Pinterest, comma-joined into the
/// `scope` query parameter.
pub const SCOPES: [&str; 5] = [
    "boards:read",
    "boards:write",
    "pins:read",
    "pins:write",
    "user_accounts:read",
];

const STATE_TOKEN_LEN: usize = 16;

/// Start the OAuth flow: hand the popup the Pinterest authorization URL and a
/// state token to round-trip through the redirect. No network call is made.
pub async fn authorize(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let (app_id, redirect_uri) = state.pinterest.authorization_credentials()?;

    let csrf_state = generate_state();
    let auth_url = build_authorization_url(
        &state.pinterest.authorization_endpoint(),
        app_id,
        redirect_uri,
        &csrf_state,
    );

    Ok(Json(json!({
        "success": true,
        "authUrl": auth_url,
        "state": csrf_state,
    })))
}

fn build_authorization_url(
    endpoint: &str,
    app_id: &str,
    redirect_uri: &str,
    csrf_state: &str,
) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
        endpoint,
        urlencoding::encode(app_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(&SCOPES.join(",")),
        urlencoding::encode(csrf_state),
    )
}

/// A short random opaque token. Uniqueness is statistical, not guaranteed;
/// the extension holds the value and compares it against the one echoed in
/// the callback.
fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_TOKEN_LEN)
        .map(char::from)
        .collect()
}
