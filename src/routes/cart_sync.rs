use axum::{Json, Router, extract::State};

use crate::dto::cart::{CartSyncRequest, CartSyncResponse};
use crate::{
    error::AppResult, middleware::auth::MaybeUser, response::ApiResponse,
    services::cart_sync_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/sync", axum::routing::post(sync_cart))
}

#[utoipa::path(
    post,
    path = "/api/cart/sync",
    request_body = CartSyncRequest,
    responses(
        (status = 200, description = "Snapshot stored (or no-op for guests)", body = ApiResponse<CartSyncResponse>),
    ),
    tag = "Cart"
)]
pub async fn sync_cart(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(payload): Json<CartSyncRequest>,
) -> AppResult<Json<ApiResponse<CartSyncResponse>>> {
    // Guests have nothing to key the snapshot on; succeed silently so the
    // client never retries.
    if let Some(user) = user {
        cart_sync_service::sync_cart(&state.pool, user.user_id, &payload.items).await?;
    }

    Ok(Json(ApiResponse::success(
        "Cart synced",
        CartSyncResponse { ok: true },
    )))
}
