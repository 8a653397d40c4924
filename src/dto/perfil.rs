use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Pedido;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePerfilRequest {
    pub nombre: Option<String>,
    pub direccion: Option<String>,
    pub ciudad: Option<String>,
    pub codigo_postal: Option<String>,
    pub pais: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PedidoList {
    #[schema(value_type = Vec<Pedido>)]
    pub items: Vec<Pedido>,
}
