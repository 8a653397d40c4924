use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::dto::checkout::CheckoutResponse;
use crate::services::perfil_service;
use crate::stripe::types::CheckoutSessionParams;
use crate::{
    config::ALLOWED_SHIPPING_COUNTRIES,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    response::ApiResponse,
    state::AppState,
    stripe::{CustomerAddress, SessionLineItem},
};

/// Translate cart items into gateway line items. Prices are stored as
/// decimal euros and sent as integer cents, rounded to the nearest cent.
pub fn build_line_items(items: &[CartItem]) -> AppResult<Vec<SessionLineItem>> {
    items
        .iter()
        .map(|item| {
            if item.quantity <= 0 {
                return Err(AppError::BadRequest(format!(
                    "Invalid quantity for {}",
                    item.variant_id
                )));
            }
            let cents = (item.price * Decimal::from(100))
                .round()
                .to_i64()
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Invalid price for {}", item.variant_id))
                })?;
            Ok(SessionLineItem {
                name: format!("{} - Talla {}", item.name, item.size),
                image: (!item.image.is_empty()).then(|| item.image.clone()),
                unit_amount: cents,
                quantity: item.quantity as i64,
                product_id: item.product_id.to_string(),
                variant_id: item.variant_id.clone(),
            })
        })
        .collect()
}

pub async fn create_session(
    state: &AppState,
    user: Option<&AuthUser>,
    items: Vec<CartItem>,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    if items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let line_items = build_line_items(&items)?;

    let mut params = CheckoutSessionParams {
        line_items,
        success_url: format!(
            "{}/checkout/exito?session_id={{CHECKOUT_SESSION_ID}}",
            state.config.app_url
        ),
        cancel_url: format!("{}/checkout/cancelado", state.config.app_url),
        allowed_countries: ALLOWED_SHIPPING_COUNTRIES
            .iter()
            .map(|c| c.to_string())
            .collect(),
        ..Default::default()
    };

    if let Some(user) = user {
        params.user_id = Some(user.user_id.to_string());
        match resolve_customer(state, user).await {
            Ok(Some(customer_id)) => params.customer = Some(customer_id),
            Ok(None) => params.customer_email = Some(user.email.clone()),
            Err(err) => {
                // A broken customer record must not block the purchase.
                tracing::warn!(error = %err, "customer lookup failed, using raw email");
                params.customer_email = Some(user.email.clone());
            }
        }
    }

    let session = state.stripe.create_checkout_session(&params).await?;
    let url = session
        .url
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("session without redirect url")))?;

    Ok(ApiResponse::success(
        "Checkout session created",
        CheckoutResponse { url },
    ))
}

/// Reuse the gateway customer cached on the profile, creating one (and
/// persisting its id) on first checkout.
async fn resolve_customer(state: &AppState, user: &AuthUser) -> AppResult<Option<String>> {
    let perfil = perfil_service::find_perfil(&state.pool, user.user_id).await?;

    if let Some(id) = perfil.as_ref().and_then(|p| p.stripe_customer_id.clone()) {
        return Ok(Some(id));
    }

    let address = perfil.as_ref().map(|p| CustomerAddress {
        line1: p.direccion.clone(),
        city: p.ciudad.clone(),
        postal_code: p.codigo_postal.clone(),
        country: p.pais.clone(),
    });
    let name = perfil.as_ref().and_then(|p| p.nombre.clone());

    let customer = state
        .stripe
        .create_customer(&user.email, name.as_deref(), address.as_ref())
        .await?;

    perfil_service::set_stripe_customer(&state.pool, user.user_id, &customer.id).await?;
    Ok(Some(customer.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn item(price: &str, quantity: i32) -> CartItem {
        let product_id = Uuid::new_v4();
        CartItem {
            variant_id: CartItem::variant_id_for(product_id, "M"),
            product_id,
            name: "Camiseta Pro".into(),
            size: "M".into(),
            price: Decimal::from_str_exact(price).unwrap(),
            quantity,
            image: "https://cdn.example/p.jpg".into(),
        }
    }

    #[test]
    fn prices_become_rounded_cents() {
        let items = [item("29.99", 2), item("7.999", 1)];
        let built = build_line_items(&items).unwrap();
        assert_eq!(built[0].unit_amount, 2999);
        assert_eq!(built[0].quantity, 2);
        assert_eq!(built[1].unit_amount, 800);
        assert_eq!(built[0].name, "Camiseta Pro - Talla M");
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let items = [item("29.99", 0)];
        assert!(build_line_items(&items).is_err());
    }
}
