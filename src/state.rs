//! Shared application state
//!
//! Este módulo define o estado compartilhado da aplicação que é passado
//! através do router do Axum.

use crate::config::environment::EnvironmentConfig;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self { pool, config }
    }
}
