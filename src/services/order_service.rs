use crate::dto::admin::{PedidoAdminList, PedidoAdminRow};
use crate::{db::DbPool, error::AppResult, response::ApiResponse};

/// Back-office order list: the 100 most recent rows, each carrying the
/// referenced product's current name and price.
pub async fn list_recent_pedidos(pool: &DbPool) -> AppResult<ApiResponse<PedidoAdminList>> {
    let items: Vec<PedidoAdminRow> = sqlx::query_as(
        r#"
        SELECT
            p.id, p.email_cliente, p.product_id, p.talla_comprada, p.cantidad,
            p.precio_unitario, p.estado_pago, p.stripe_session_id, p.created_at,
            pr.name AS product_name, pr.price AS product_price
        FROM pedidos p
        LEFT JOIN productos pr ON pr.id = p.product_id
        ORDER BY p.created_at DESC
        LIMIT 100
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success("Pedidos", PedidoAdminList { items }))
}
