use axum::{Json, Router, extract::State};

use crate::dto::checkout::{CheckoutRequest, CheckoutResponse};
use crate::{
    error::AppResult, middleware::auth::MaybeUser, response::ApiResponse,
    services::checkout_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", axum::routing::post(create_checkout_session))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Hosted payment URL", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Empty cart"),
        (status = 500, description = "Gateway failure"),
    ),
    tag = "Checkout"
)]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    let resp = checkout_service::create_session(&state, user.as_ref(), payload.items).await?;
    Ok(Json(resp))
}
