//! Append-only trail of who changed what. Back-office mutations and the
//! webhook reconciler both record here; reads happen out of band.

use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

/// Write one audit row. Best effort: a failed insert is logged and swallowed
/// so the trail never blocks the operation it records.
pub async fn record(
    pool: &DbPool,
    actor: Option<Uuid>,
    action: &str,
    resource: &str,
    detail: Value,
) {
    let result = sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(actor)
    .bind(action)
    .bind(resource)
    .bind(detail)
    .execute(pool)
    .await;

    if let Err(err) = result {
        tracing::warn!(error = %err, action, "audit insert failed");
    }
}
