use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::ApiError;
use crate::pinterest::{self, PinRequest};
use crate::state::AppState;

/// The actions the extension may proxy through `POST /token`, discriminated
/// by the `action` string in the body. Field presence is validated per
/// variant so an incomplete request never reaches Pinterest.
#[derive(Debug, Deserialize)]
#[serde(tag = "action")]
pub enum ProxyAction {
    #[serde(rename = "getBoards")]
    GetBoards { token: Option<String> },

    #[serde(rename = "createPin")]
    CreatePin {
        token: Option<String>,
        #[serde(rename = "boardId")]
        board_id: Option<String>,
        #[serde(rename = "imageUrl")]
        image_url: Option<String>,
        title: Option<String>,
        description: Option<String>,
    },

    #[serde(rename = "refreshToken")]
    RefreshToken {
        #[serde(rename = "refreshToken")]
        refresh_token: Option<String>,
    },
}

impl ProxyAction {
    /// Parse the request body, mapping anything that is not a recognized
    /// action shape to `UnknownAction` carrying the offending discriminator.
    pub fn from_body(body: Value) -> Result<Self, ApiError> {
        let action = body
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or("<missing>")
            .to_string();
        serde_json::from_value(body).map_err(|_| ApiError::UnknownAction(action))
    }
}

/// Dispatch an authenticated proxy call to Pinterest on behalf of the
/// extension.
pub async fn dispatch(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let credentials = state.pinterest.client_credentials()?;
    let action = ProxyAction::from_body(body)?;

    match action {
        ProxyAction::GetBoards { token } => {
            let token = require_token(token)?;
            let boards = pinterest::boards(&state.http, &state.pinterest, &token).await?;
            info!(count = boards.len(), "listed boards");
            Ok(Json(json!({"success": true, "boards": boards})))
        }

        ProxyAction::CreatePin {
            token,
            board_id,
            image_url,
            title,
            description,
        } => {
            let token = require_token(token)?;
            let board_id = require_field(board_id, "boardId")?;
            let image_url = require_field(image_url, "imageUrl")?;

            let pin = PinRequest::new(
                &board_id,
                &image_url,
                title.as_deref(),
                description.as_deref(),
            );
            let created = pinterest::create_pin(&state.http, &state.pinterest, &token, &pin).await?;
            info!(board_id = %board_id, "created pin");
            Ok(Json(json!({"success": true, "pin": created})))
        }

        ProxyAction::RefreshToken { refresh_token } => {
            let refresh_token = refresh_token
                .filter(|t| !t.is_empty())
                .ok_or(ApiError::MissingRefreshToken)?;

            let tokens = pinterest::refresh_token(
                &state.http,
                &state.pinterest,
                credentials,
                &refresh_token,
            )
            .await?;

            info!("refreshed access token");
            Ok(Json(json!({
                "success": true,
                "accessToken": tokens.access_token,
                // Pinterest may rotate the refresh token; fall back to the
                // one the caller sent when it does not.
                "refreshToken": tokens.refresh_token.unwrap_or(refresh_token),
                "expiresIn": tokens.expires_in,
            })))
        }
    }
}

fn require_token(token: Option<String>) -> Result<String, ApiError> {
    token.filter(|t| !t.is_empty()).ok_or(ApiError::MissingToken)
}

fn require_field(value: Option<String>, name: &'static str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingPinField(name))
}
