use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{CarritoAbandonado, Cupon};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCuponRequest {
    pub code: String,
    pub descuento: i32,
    pub max_usos: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCuponRequest {
    pub activo: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CuponList {
    #[schema(value_type = Vec<Cupon>)]
    pub items: Vec<Cupon>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CarritoList {
    #[schema(value_type = Vec<CarritoAbandonado>)]
    pub items: Vec<CarritoAbandonado>,
}

/// Order row joined with the product it references.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct PedidoAdminRow {
    pub id: Uuid,
    pub email_cliente: Option<String>,
    pub product_id: Option<Uuid>,
    pub talla_comprada: String,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub estado_pago: String,
    pub stripe_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product_name: Option<String>,
    pub product_price: Option<Decimal>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PedidoAdminList {
    pub items: Vec<PedidoAdminRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsSummary {
    pub revenue: Decimal,
    pub orders: i64,
    pub units: i64,
    pub avg_order: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChartPoint {
    pub date: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductStat {
    pub name: String,
    pub sales: Decimal,
    pub units: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsResponse {
    pub summary: AnalyticsSummary,
    pub chart_data: Vec<ChartPoint>,
    pub top_products: Vec<ProductStat>,
    pub bottom_products: Vec<ProductStat>,
}

/// The two dashboard reads, issued together and awaited jointly.
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(value_type = Vec<crate::models::Producto>)]
    pub products: Vec<crate::models::Producto>,
    pub analytics: AnalyticsResponse,
}
