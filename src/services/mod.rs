pub mod analytics_service;
pub mod auth_service;
pub mod cart_sync_service;
pub mod checkout_service;
pub mod coupon_service;
pub mod order_service;
pub mod perfil_service;
pub mod product_service;
pub mod webhook_service;
