use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    audit,
    db::DbPool,
    error::AppResult,
    stripe::types::{CheckoutSession, LineItem},
};

/// Placeholder size for a variant id with no trailing `-` segment at all.
pub const UNKNOWN_SIZE: &str = "U";

#[derive(Debug, Default, PartialEq)]
pub struct ReconcileOutcome {
    pub inserted: u32,
    pub failed: u32,
}

/// The trailing `-` segment of a variant id, recorded as-is even when it is
/// not a stock size; the decrement step is what knows which sizes have
/// columns.
pub fn parse_size(variant_id: &str) -> &str {
    match variant_id.rsplit('-').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => UNKNOWN_SIZE,
    }
}

/// Turn a paid session into order rows, one per line item. Each item is
/// handled independently: a failing insert or decrement is logged and the
/// loop moves on, so one bad item never loses the rest of the order.
pub async fn process_completed_session(
    pool: &DbPool,
    session: &CheckoutSession,
    line_items: &[LineItem],
) -> AppResult<ReconcileOutcome> {
    let email = session.customer_email();
    let user_id = session
        .metadata
        .as_ref()
        .and_then(|m| m.get("userId"))
        .and_then(|id| Uuid::parse_str(id).ok());

    let mut outcome = ReconcileOutcome::default();

    for item in line_items {
        let quantity = item.quantity.unwrap_or(1).max(1) as i32;
        let price = item.price.as_ref();
        let unit_amount = price.and_then(|p| p.unit_amount).unwrap_or(0);
        let precio_unitario = Decimal::from(unit_amount) / Decimal::from(100);

        let product = price
            .and_then(|p| p.product.as_ref())
            .and_then(|p| p.object());
        let variant_id = product
            .and_then(|p| p.metadata.get("variantId"))
            .map(String::as_str)
            .unwrap_or("");
        let product_id = product
            .and_then(|p| p.metadata.get("productId"))
            .and_then(|id| Uuid::parse_str(id).ok());
        let size = parse_size(variant_id);

        let insert = sqlx::query(
            r#"
            INSERT INTO pedidos
                (id, email_cliente, product_id, talla_comprada, cantidad,
                 precio_unitario, estado_pago, stripe_session_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, 'pagado', $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(product_id)
        .bind(size)
        .bind(quantity)
        .bind(precio_unitario)
        .bind(&session.id)
        .bind(user_id)
        .execute(pool)
        .await;

        if let Err(err) = insert {
            tracing::error!(
                error = %err,
                session_id = %session.id,
                variant_id,
                "order insert failed, skipping item"
            );
            outcome.failed += 1;
            continue;
        }
        outcome.inserted += 1;

        if let Some(product_id) = product_id {
            decrement_stock(pool, product_id, size, quantity).await;
        }
    }

    audit::record(
        pool,
        user_id,
        "pedido_webhook",
        "pedidos",
        serde_json::json!({
            "session_id": session.id,
            "inserted": outcome.inserted,
            "failed": outcome.failed,
        }),
    )
    .await;

    Ok(outcome)
}

/// Two-tier decrement: the SQL function first, a direct column update as a
/// fallback, and a logged no-op when both fail. Stock drift is preferable to
/// dropping an order.
async fn decrement_stock(pool: &DbPool, product_id: Uuid, size: &str, quantity: i32) {
    let via_function = sqlx::query("SELECT decrement_stock($1, $2, $3)")
        .bind(product_id)
        .bind(size)
        .bind(quantity)
        .execute(pool)
        .await;

    let err = match via_function {
        Ok(_) => return,
        Err(err) => err,
    };
    tracing::warn!(error = %err, %product_id, size, "decrement_stock failed, trying direct update");

    let column = match size {
        "S" => "size_s",
        "M" => "size_m",
        "L" => "size_l",
        "XL" => "size_xl",
        _ => {
            tracing::warn!(%product_id, size, "no stock column for size, skipping decrement");
            return;
        }
    };

    let direct = sqlx::query(&format!(
        "UPDATE productos SET {column} = GREATEST({column} - $1, 0) WHERE id = $2"
    ))
    .bind(quantity)
    .bind(product_id)
    .execute(pool)
    .await;

    if let Err(err) = direct {
        tracing::error!(error = %err, %product_id, size, "stock decrement skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_the_trailing_segment() {
        let id = Uuid::new_v4();
        assert_eq!(parse_size(&format!("{id}-M")), "M");
        assert_eq!(parse_size(&format!("{id}-XL")), "XL");
    }

    #[test]
    fn odd_trailing_segments_are_recorded_verbatim() {
        assert_eq!(parse_size("abc-123"), "123");
        assert_eq!(parse_size("bundle-misc"), "misc");
        assert_eq!(parse_size("nodash"), "nodash");
    }

    #[test]
    fn empty_segment_maps_to_placeholder() {
        assert_eq!(parse_size(""), UNKNOWN_SIZE);
        assert_eq!(parse_size("abc-"), UNKNOWN_SIZE);
    }
}
