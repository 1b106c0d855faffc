use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::cookie::read_cookie;
use crate::state::AppState;

/// Raw credential from the session cookie, if the client sent one.
/// Nothing is verified here; see [`super::gate`].
pub struct SessionToken(pub Option<String>);

#[async_trait]
impl FromRequestParts<AppState> for SessionToken {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(SessionToken(read_cookie(
            &parts.headers,
            &state.config.cookie.name,
        )))
    }
}
