use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    services::webhook_service,
    state::AppState,
    stripe::types::CheckoutSession,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", axum::routing::post(handle_webhook))
}

/// Gateway event sink. The signature gate is the only failure the gateway
/// sees; once past it, every delivery is acknowledged so a processing hiccup
/// does not trigger a redelivery storm.
#[utoipa::path(
    post,
    path = "/api/stripe/webhook",
    request_body(content = String, content_type = "application/json"),
    responses(
        (status = 200, description = "Event acknowledged"),
        (status = 400, description = "Signature mismatch"),
    ),
    tag = "Checkout"
)]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<serde_json::Value>> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::InvalidSignature)?;

    let event = state
        .stripe
        .construct_event(&body, signature)
        .map_err(|err| {
            tracing::warn!(error = %err, "webhook signature rejected");
            AppError::InvalidSignature
        })?;

    if event.event_type != "checkout.session.completed" {
        tracing::debug!(event_type = %event.event_type, "ignoring event");
        return Ok(Json(json!({ "received": true })));
    }

    let session: CheckoutSession = match serde_json::from_value(event.data.object.clone()) {
        Ok(session) => session,
        Err(err) => {
            tracing::error!(error = %err, "malformed session payload, acking anyway");
            return Ok(Json(json!({ "received": true })));
        }
    };

    // The event payload may truncate line items; re-fetch the full list with
    // product metadata expanded.
    let line_items = match state.stripe.list_line_items(&session.id).await {
        Ok(items) => items,
        Err(err) => {
            tracing::error!(error = %err, session_id = %session.id, "line item fetch failed");
            return Ok(Json(json!({ "received": true })));
        }
    };

    match webhook_service::process_completed_session(&state.pool, &session, &line_items).await {
        Ok(outcome) => {
            tracing::info!(
                session_id = %session.id,
                inserted = outcome.inserted,
                failed = outcome.failed,
                "session reconciled"
            );
        }
        Err(err) => {
            tracing::error!(error = %err, session_id = %session.id, "reconciliation failed");
        }
    }

    Ok(Json(json!({ "received": true })))
}
