use axum::{
    Json, Router,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::dto::admin::{
    AnalyticsResponse, CarritoList, CreateCuponRequest, CuponList, DashboardResponse,
    PedidoAdminList, UpdateCuponRequest,
};
use crate::dto::productos::ProductoQuery;
use crate::{
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::{CarritoAbandonado, Cupon},
    response::ApiResponse,
    services::{analytics_service, coupon_service, order_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pedidos", axum::routing::get(list_pedidos))
        .route("/analytics", axum::routing::get(get_analytics))
        .route("/dashboard", axum::routing::get(get_dashboard))
        .route("/carritos", axum::routing::get(list_carritos))
        .route("/cupones", axum::routing::get(list_cupones))
        .route("/cupones", axum::routing::post(create_cupon))
        .route("/cupones/{id}", axum::routing::patch(update_cupon))
        .route("/cupones/{id}", axum::routing::delete(delete_cupon))
}

#[utoipa::path(
    get,
    path = "/api/admin/pedidos",
    responses(
        (status = 200, description = "Latest 100 orders", body = ApiResponse<PedidoAdminList>),
        (status = 403, description = "Not an administrator"),
    ),
    tag = "Admin"
)]
pub async fn list_pedidos(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PedidoAdminList>>> {
    ensure_admin(&user, &state.config.admin_email)?;
    let resp = order_service::list_recent_pedidos(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    responses(
        (status = 200, description = "Sales analytics", body = ApiResponse<AnalyticsResponse>),
        (status = 403, description = "Not an administrator"),
    ),
    tag = "Admin"
)]
pub async fn get_analytics(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AnalyticsResponse>>> {
    ensure_admin(&user, &state.config.admin_email)?;
    let analytics = analytics_service::compute_analytics(&state.pool).await?;
    Ok(Json(ApiResponse::success("Analytics", analytics)))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Products and analytics in one response", body = ApiResponse<DashboardResponse>),
        (status = 403, description = "Not an administrator"),
    ),
    tag = "Admin"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardResponse>>> {
    ensure_admin(&user, &state.config.admin_email)?;

    // The dashboard needs both reads; issue them together.
    let (products, analytics) = tokio::try_join!(
        product_service::list_productos(&state, ProductoQuery { all: Some(true) }),
        analytics_service::compute_analytics(&state.pool),
    )?;

    let products = products.data.map(|list| list.items).unwrap_or_default();

    Ok(Json(ApiResponse::success(
        "Dashboard",
        DashboardResponse {
            products,
            analytics,
        },
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/carritos",
    responses(
        (status = 200, description = "Abandoned carts, newest first", body = ApiResponse<CarritoList>),
        (status = 403, description = "Not an administrator"),
    ),
    tag = "Admin"
)]
pub async fn list_carritos(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CarritoList>>> {
    ensure_admin(&user, &state.config.admin_email)?;
    let items: Vec<CarritoAbandonado> =
        sqlx::query_as("SELECT * FROM carritos_abandonados ORDER BY last_updated DESC")
            .fetch_all(&state.pool)
            .await?;

    Ok(Json(ApiResponse::success("Carritos", CarritoList { items })))
}

#[utoipa::path(
    get,
    path = "/api/admin/cupones",
    responses(
        (status = 200, description = "List coupons", body = ApiResponse<CuponList>),
        (status = 403, description = "Not an administrator"),
    ),
    tag = "Admin"
)]
pub async fn list_cupones(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CuponList>>> {
    let resp = coupon_service::list_cupones(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/cupones",
    request_body = CreateCuponRequest,
    responses(
        (status = 200, description = "Coupon created", body = ApiResponse<Cupon>),
        (status = 400, description = "Invalid discount"),
        (status = 403, description = "Not an administrator"),
    ),
    tag = "Admin"
)]
pub async fn create_cupon(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCuponRequest>,
) -> AppResult<Json<ApiResponse<Cupon>>> {
    let resp = coupon_service::create_cupon(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/cupones/{id}",
    params(
        ("id" = Uuid, Path, description = "Cupon ID")
    ),
    request_body = UpdateCuponRequest,
    responses(
        (status = 200, description = "Coupon updated", body = ApiResponse<Cupon>),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Coupon not found"),
    ),
    tag = "Admin"
)]
pub async fn update_cupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCuponRequest>,
) -> AppResult<Json<ApiResponse<Cupon>>> {
    let resp = coupon_service::update_cupon(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/cupones/{id}",
    params(
        ("id" = Uuid, Path, description = "Cupon ID")
    ),
    responses(
        (status = 200, description = "Coupon deleted"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Coupon not found"),
    ),
    tag = "Admin"
)]
pub async fn delete_cupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = coupon_service::delete_cupon(&state, &user, id).await?;
    Ok(Json(resp))
}
