use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::database::connection::ping;
use crate::state::AppState;

/// GET /health - estado del servicio y de la base de datos
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, database) = match ping(&state.pool).await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("❌ Health check: base de datos no disponible: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "error")
        }
    };

    let overall = if status == StatusCode::OK { "healthy" } else { "degraded" };

    (
        status,
        Json(json!({
            "status": overall,
            "database": database,
            "environment": state.config.environment,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
