use uuid::Uuid;

use crate::{db::DbPool, error::AppResult, models::CartItem};

/// Upsert the caller's abandoned-cart snapshot. An empty list means the cart
/// was emptied (purchase or manual clear) and the row flips to `convertido`.
pub async fn sync_cart(pool: &DbPool, user_id: Uuid, items: &[CartItem]) -> AppResult<()> {
    let estado = if items.is_empty() {
        "convertido"
    } else {
        "abandonado"
    };
    let snapshot = serde_json::to_value(items)
        .map_err(|e| crate::error::AppError::Internal(anyhow::anyhow!(e)))?;

    sqlx::query(
        r#"
        INSERT INTO carritos_abandonados (user_id, items, estado, last_updated)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (user_id) DO UPDATE SET
            items = EXCLUDED.items,
            estado = EXCLUDED.estado,
            last_updated = NOW()
        "#,
    )
    .bind(user_id)
    .bind(snapshot)
    .bind(estado)
    .execute(pool)
    .await?;

    Ok(())
}
