use axum::{
    Json, Router,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::dto::productos::{
    CreateProductoRequest, ProductoList, ProductoQuery, UpdateProductoRequest,
};
use crate::{
    error::AppResult, middleware::auth::AuthUser, models::Producto, response::ApiResponse,
    services::product_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(list_productos))
        .route("/", axum::routing::post(create_producto))
        .route("/{id}", axum::routing::get(get_producto))
        .route("/{id}", axum::routing::patch(update_producto))
        .route("/{id}", axum::routing::delete(delete_producto))
}

#[utoipa::path(
    get,
    path = "/api/productos",
    params(
        ("all" = Option<bool>, Query, description = "Include unavailable products"),
    ),
    responses(
        (status = 200, description = "List productos", body = ApiResponse<ProductoList>)
    ),
    tag = "Productos"
)]
pub async fn list_productos(
    State(state): State<AppState>,
    Query(query): Query<ProductoQuery>,
) -> AppResult<Json<ApiResponse<ProductoList>>> {
    let resp = product_service::list_productos(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    params(
        ("id" = Uuid, Path, description = "Producto ID")
    ),
    responses(
        (status = 200, description = "Get producto", body = ApiResponse<Producto>),
        (status = 404, description = "Producto not found"),
    ),
    tag = "Productos"
)]
pub async fn get_producto(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Producto>>> {
    let resp = product_service::get_producto(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/productos",
    request_body = CreateProductoRequest,
    responses(
        (status = 200, description = "Create producto", body = ApiResponse<Producto>),
        (status = 403, description = "Not an administrator"),
    ),
    tag = "Productos"
)]
pub async fn create_producto(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductoRequest>,
) -> AppResult<Json<ApiResponse<Producto>>> {
    let resp = product_service::create_producto(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/productos/{id}",
    params(
        ("id" = Uuid, Path, description = "Producto ID")
    ),
    request_body = UpdateProductoRequest,
    responses(
        (status = 200, description = "Updated producto", body = ApiResponse<Producto>),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Producto not found"),
    ),
    tag = "Productos"
)]
pub async fn update_producto(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductoRequest>,
) -> AppResult<Json<ApiResponse<Producto>>> {
    let resp = product_service::update_producto(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    params(
        ("id" = Uuid, Path, description = "Producto ID")
    ),
    responses(
        (status = 200, description = "Deleted producto"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Producto not found"),
    ),
    tag = "Productos"
)]
pub async fn delete_producto(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::delete_producto(&state, &user, id).await?;
    Ok(Json(resp))
}
