use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
    stripe::StripeClient,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub stripe: StripeClient,
    pub config: AppConfig,
}
