//! Rutas HTTP
//!
//! Un router por recurso. Todo `/api` exige sesión; las rutas de
//! autenticación, `/check-session` y `/health` son públicas.

pub mod auth_routes;
pub mod client_routes;
pub mod courier_routes;
pub mod health_routes;
pub mod movement_routes;
pub mod route_routes;
pub mod statistics_routes;
pub mod supplier_routes;
pub mod warehouse_routes;

use axum::{middleware, routing::get, Router};

use crate::middleware::auth::session_middleware;
use crate::state::AppState;

/// Router de `/api` protegido por sesión
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/inventario", client_routes::create_inventory_router())
        .nest("/clientes", client_routes::create_client_router())
        .nest("/movimientos", movement_routes::create_movement_router())
        .nest("/bodega", warehouse_routes::create_warehouse_router())
        .nest("/rutas", route_routes::create_route_router())
        .nest("/entregadores", courier_routes::create_courier_router())
        .nest("/proveedores", supplier_routes::create_supplier_router())
        .nest("/estadisticas", statistics_routes::create_statistics_router())
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
}

/// Rutas públicas
pub fn create_public_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes::create_auth_router())
        .route("/check-session", get(auth_routes::check_session))
        .route("/health", get(health_routes::health_check))
}
