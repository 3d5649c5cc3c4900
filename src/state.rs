//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::session_service::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let sessions = SessionStore::new(config.session_ttl_hours);
        Self {
            pool,
            config,
            sessions,
        }
    }

    /// Limpiar sesiones expiradas
    pub async fn cleanup_expired_sessions(&self) {
        let removed = self.sessions.cleanup_expired().await;
        if removed > 0 {
            tracing::info!("🧹 {} sesiones expiradas eliminadas", removed);
        }
    }
}
