use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Producto;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductoRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub available: Option<bool>,
    pub size_s: Option<i32>,
    pub size_m: Option<i32>,
    pub size_l: Option<i32>,
    pub size_xl: Option<i32>,
}

/// Partial update; only these whitelisted fields are accepted.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductoRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub available: Option<bool>,
    pub size_s: Option<i32>,
    pub size_m: Option<i32>,
    pub size_l: Option<i32>,
    pub size_xl: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductoQuery {
    /// Include unavailable products (admin context).
    pub all: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductoList {
    #[schema(value_type = Vec<Producto>)]
    pub items: Vec<Producto>,
}
