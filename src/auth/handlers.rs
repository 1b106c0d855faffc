use axum::{
    extract::{FromRef, State},
    http::header,
    response::{AppendHeaders, IntoResponse},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::{
    auth::{cookie, jwt::JwtKeys},
    error::ApiResult,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/jwt", post(issue_token))
        .route("/logout", post(logout))
}

/// Signs the posted identity object and hands it back as an HTTP-only cookie.
#[instrument(skip(state, identity))]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(identity): Json<Map<String, Value>>,
) -> ApiResult<impl IntoResponse> {
    let email = identity
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(identity)?;
    let cookie = cookie::session_cookie(&state.config.cookie, &token, keys.ttl());

    info!(email = ?email, "credential issued");
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(SuccessResponse { success: true }),
    ))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    info!("credential cleared");
    (
        AppendHeaders([(header::SET_COOKIE, cookie::expired_cookie(&state.config.cookie))]),
        Json(SuccessResponse { success: true }),
    )
}
