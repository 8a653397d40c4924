pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod perfil;
pub mod productos;
