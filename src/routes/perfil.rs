use axum::{Json, Router, extract::State};

use crate::dto::perfil::{PedidoList, UpdatePerfilRequest};
use crate::{
    error::AppResult, middleware::auth::AuthUser, models::Perfil, response::ApiResponse,
    services::perfil_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(get_perfil))
        .route("/", axum::routing::put(update_perfil))
        .route("/pedidos", axum::routing::get(list_pedidos))
}

#[utoipa::path(
    get,
    path = "/api/perfil",
    responses(
        (status = 200, description = "Profile", body = ApiResponse<Perfil>),
    ),
    tag = "Perfil"
)]
pub async fn get_perfil(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Perfil>>> {
    let resp = perfil_service::get_perfil(&state.pool, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/perfil",
    request_body = UpdatePerfilRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<Perfil>),
    ),
    tag = "Perfil"
)]
pub async fn update_perfil(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdatePerfilRequest>,
) -> AppResult<Json<ApiResponse<Perfil>>> {
    let resp = perfil_service::update_perfil(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/perfil/pedidos",
    responses(
        (status = 200, description = "Order history", body = ApiResponse<PedidoList>),
    ),
    tag = "Perfil"
)]
pub async fn list_pedidos(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PedidoList>>> {
    let resp = perfil_service::list_pedidos_for_user(&state.pool, &user).await?;
    Ok(Json(resp))
}
