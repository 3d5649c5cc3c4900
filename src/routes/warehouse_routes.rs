use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::warehouse_controller::WarehouseController;
use crate::dto::warehouse_dto::UpdateWarehouseRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::warehouse::{WarehouseHistoryEntry, WarehouseState};
use crate::services::Capability;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

pub fn create_warehouse_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_warehouse))
        .route("/actualizar", post(update_warehouse))
        .route("/historial", get(warehouse_history))
}

async fn get_warehouse(State(state): State<AppState>) -> Result<Json<ApiResponse<WarehouseState>>, AppError> {
    let controller = WarehouseController::new(state.pool.clone());
    Ok(Json(controller.current().await?))
}

async fn update_warehouse(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<UpdateWarehouseRequest>,
) -> Result<Json<ApiResponse<WarehouseState>>, AppError> {
    user.authorize(Capability::UpdateWarehouse)?;
    let controller = WarehouseController::new(state.pool.clone());
    Ok(Json(controller.update(request, &user).await?))
}

async fn warehouse_history(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<WarehouseHistoryEntry>>>, AppError> {
    let controller = WarehouseController::new(state.pool.clone());
    Ok(Json(controller.history().await?))
}
