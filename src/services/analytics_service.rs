use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::dto::admin::{AnalyticsResponse, AnalyticsSummary, ChartPoint, ProductStat};
use crate::{db::DbPool, error::AppResult};

const CHART_DAYS: i64 = 30;
const STAT_LIMIT: usize = 5;

#[derive(Debug, FromRow)]
struct SaleRow {
    cantidad: i32,
    precio_unitario: Decimal,
    stripe_session_id: Option<String>,
    created_at: DateTime<Utc>,
    product_name: Option<String>,
}

/// Dashboard KPIs computed over every paid line item. The dataset is small
/// enough to aggregate in memory rather than in SQL.
pub async fn compute_analytics(pool: &DbPool) -> AppResult<AnalyticsResponse> {
    let rows: Vec<SaleRow> = sqlx::query_as(
        r#"
        SELECT p.cantidad, p.precio_unitario, p.stripe_session_id, p.created_at,
               pr.name AS product_name
        FROM pedidos p
        LEFT JOIN productos pr ON pr.id = p.product_id
        WHERE p.estado_pago = 'pagado'
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut revenue = Decimal::ZERO;
    let mut units: i64 = 0;
    let mut sessions: HashSet<&str> = HashSet::new();
    let mut sessionless: i64 = 0;
    let mut by_day: HashMap<String, Decimal> = HashMap::new();
    let mut by_product: HashMap<String, (Decimal, i64)> = HashMap::new();

    let today = Utc::now().date_naive();
    let window_start = today - Duration::days(CHART_DAYS - 1);

    for row in &rows {
        let line_total = row.precio_unitario * Decimal::from(row.cantidad);
        revenue += line_total;
        units += row.cantidad as i64;

        match row.stripe_session_id.as_deref() {
            Some(id) => {
                sessions.insert(id);
            }
            None => sessionless += 1,
        }

        let day = row.created_at.date_naive();
        if day >= window_start {
            *by_day.entry(day.format("%Y-%m-%d").to_string()).or_default() += line_total;
        }

        let name = row
            .product_name
            .clone()
            .unwrap_or_else(|| "Producto eliminado".to_string());
        let entry = by_product.entry(name).or_insert((Decimal::ZERO, 0));
        entry.0 += line_total;
        entry.1 += row.cantidad as i64;
    }

    // A session is one order; rows that predate session tracking count as
    // one order each.
    let orders = sessions.len() as i64 + sessionless;
    let avg_order = if orders > 0 {
        (revenue / Decimal::from(orders)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let chart_data = (0..CHART_DAYS)
        .map(|offset| {
            let date = (window_start + Duration::days(offset))
                .format("%Y-%m-%d")
                .to_string();
            let total = by_day.get(&date).copied().unwrap_or(Decimal::ZERO);
            ChartPoint { date, total }
        })
        .collect();

    let mut stats: Vec<ProductStat> = by_product
        .into_iter()
        .map(|(name, (sales, units))| ProductStat {
            name,
            sales: sales.round_dp(2),
            units,
        })
        .collect();
    stats.sort_by(|a, b| b.units.cmp(&a.units).then_with(|| a.name.cmp(&b.name)));

    let top_products: Vec<ProductStat> = stats.iter().take(STAT_LIMIT).cloned().collect();
    let bottom_products: Vec<ProductStat> = stats
        .iter()
        .rev()
        .take(STAT_LIMIT)
        .cloned()
        .collect();

    Ok(AnalyticsResponse {
        summary: AnalyticsSummary {
            revenue: revenue.round_dp(2),
            orders,
            units,
            avg_order,
        },
        chart_data,
        top_products,
        bottom_products,
    })
}
