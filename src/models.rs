use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog product with independent per-size stock counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Producto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub available: bool,
    pub size_s: i32,
    pub size_m: i32,
    pub size_l: i32,
    pub size_xl: i32,
    pub created_at: DateTime<Utc>,
}

/// One row per purchased line item, written only by the webhook reconciler.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Pedido {
    pub id: Uuid,
    pub email_cliente: Option<String>,
    pub product_id: Option<Uuid>,
    pub talla_comprada: String,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub estado_pago: String,
    pub stripe_session_id: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cupon {
    pub id: Uuid,
    pub code: String,
    pub descuento: i32,
    pub activo: bool,
    pub usos: i32,
    pub max_usos: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CarritoAbandonado {
    pub user_id: Uuid,
    pub items: serde_json::Value,
    pub estado: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Perfil {
    pub id: Uuid,
    pub nombre: Option<String>,
    pub direccion: Option<String>,
    pub ciudad: Option<String>,
    pub codigo_postal: Option<String>,
    pub pais: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// A shopper's in-progress selection; lives in the client store and is only
/// mirrored server-side as an abandoned-cart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub variant_id: String,
    pub product_id: Uuid,
    pub name: String,
    pub size: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: String,
}

impl CartItem {
    /// Composite key of product id and size, e.g. `"<uuid>-M"`.
    pub fn variant_id_for(product_id: Uuid, size: &str) -> String {
        format!("{product_id}-{size}")
    }
}
