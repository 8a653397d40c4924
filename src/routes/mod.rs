use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart_sync;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod perfil;
pub mod productos;
pub mod webhook;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/productos", productos::router())
        .nest("/auth", auth::router())
        .nest("/checkout", checkout::router())
        .nest("/stripe", webhook::router())
        .nest("/cart", cart_sync::router())
        .nest("/admin", admin::router())
        .nest("/perfil", perfil::router())
}
