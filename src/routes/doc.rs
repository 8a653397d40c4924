use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            AnalyticsResponse, AnalyticsSummary, CarritoList, ChartPoint, CreateCuponRequest,
            CuponList, DashboardResponse, PedidoAdminList, PedidoAdminRow, ProductStat,
            UpdateCuponRequest,
        },
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{CartSyncRequest, CartSyncResponse},
        checkout::{CheckoutRequest, CheckoutResponse},
        perfil::{PedidoList, UpdatePerfilRequest},
        productos::{CreateProductoRequest, ProductoList, UpdateProductoRequest},
    },
    models::{CarritoAbandonado, CartItem, Cupon, Pedido, Perfil, Producto, User},
    response::ApiResponse,
    routes::{admin, auth, cart_sync, checkout, health, perfil, productos, webhook},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        productos::list_productos,
        productos::get_producto,
        productos::create_producto,
        productos::update_producto,
        productos::delete_producto,
        checkout::create_checkout_session,
        webhook::handle_webhook,
        cart_sync::sync_cart,
        admin::list_pedidos,
        admin::get_analytics,
        admin::get_dashboard,
        admin::list_carritos,
        admin::list_cupones,
        admin::create_cupon,
        admin::update_cupon,
        admin::delete_cupon,
        perfil::get_perfil,
        perfil::update_perfil,
        perfil::list_pedidos
    ),
    components(
        schemas(
            User,
            Producto,
            Pedido,
            Cupon,
            CarritoAbandonado,
            Perfil,
            CartItem,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateProductoRequest,
            UpdateProductoRequest,
            ProductoList,
            CheckoutRequest,
            CheckoutResponse,
            CartSyncRequest,
            CartSyncResponse,
            CreateCuponRequest,
            UpdateCuponRequest,
            CuponList,
            CarritoList,
            PedidoAdminRow,
            PedidoAdminList,
            AnalyticsSummary,
            ChartPoint,
            ProductStat,
            AnalyticsResponse,
            DashboardResponse,
            UpdatePerfilRequest,
            PedidoList,
            ApiResponse<Producto>,
            ApiResponse<ProductoList>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<PedidoAdminList>,
            ApiResponse<AnalyticsResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Productos", description = "Catalog endpoints"),
        (name = "Checkout", description = "Checkout session and payment webhook"),
        (name = "Cart", description = "Cart sync endpoint"),
        (name = "Admin", description = "Back-office endpoints"),
        (name = "Perfil", description = "Profile and order history"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
