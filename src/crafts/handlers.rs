use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{debug, info, instrument};

use super::{
    model::{CountResponse, Document, InsertAck},
    query::{compile, Listing, ListingParams},
};
use crate::{
    auth::{extractors::SessionToken, gate::guard_scope, jwt::JwtKeys},
    error::ApiResult,
    state::AppState,
};

pub fn craft_routes() -> Router<AppState> {
    Router::new()
        .route("/crafts", get(list_crafts).post(create_craft))
        .route("/craftsCount", get(crafts_count))
}

/// GET /crafts
///
/// Unscoped requests are public and never touch the credential. A request
/// naming an `email` must carry a credential for exactly that email.
#[instrument(skip_all)]
pub async fn list_crafts(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let params = ListingParams::from_pairs(pairs);

    let scope = match params.requested_email() {
        Some(email) => {
            let keys = JwtKeys::from_ref(&state);
            let scope = guard_scope(&keys, token.as_deref(), email)?;
            debug!(email = scope.as_str(), "scoped listing authorized");
            Some(scope)
        }
        None => None,
    };

    match compile(&params, scope) {
        Listing::Categories => {
            let categories = state.store.categories().await?;
            Ok(Json(categories).into_response())
        }
        Listing::Items(query) => {
            let items = state.store.list(&query).await?;
            debug!(count = items.len(), "crafts listed");
            Ok(Json(items).into_response())
        }
    }
}

/// GET /craftsCount
#[instrument(skip(state))]
pub async fn crafts_count(State(state): State<AppState>) -> ApiResult<Json<CountResponse>> {
    let count = state.store.estimated_count().await?;
    Ok(Json(CountResponse { count }))
}

/// POST /crafts: any JSON object is stored as-is; the store assigns `_id`.
#[instrument(skip_all)]
pub async fn create_craft(
    State(state): State<AppState>,
    Json(mut doc): Json<Document>,
) -> ApiResult<Json<InsertAck>> {
    doc.remove("_id");
    let inserted_id = state.store.insert(doc).await?;
    info!(inserted_id, "craft inserted");
    Ok(Json(InsertAck {
        acknowledged: true,
        inserted_id,
    }))
}
