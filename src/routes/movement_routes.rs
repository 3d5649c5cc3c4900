use axum::{
    extract::State,
    routing::{delete, get},
    Extension, Json, Router,
};

use crate::controllers::movement_controller::MovementController;
use crate::dto::movement_dto::{CreateMovementRequest, MovementCreatedResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::movement::MovementListRow;
use crate::services::Capability;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath};

pub fn create_movement_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movements).post(create_movement))
        .route("/:id", delete(delete_movement))
}

async fn list_movements(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MovementListRow>>>, AppError> {
    let controller = MovementController::new(state.pool.clone());
    Ok(Json(controller.recent().await?))
}

async fn create_movement(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateMovementRequest>,
) -> Result<Json<ApiResponse<MovementCreatedResponse>>, AppError> {
    user.authorize(Capability::RecordMovement)?;
    let controller = MovementController::new(state.pool.clone());
    Ok(Json(controller.create(request, &user).await?))
}

async fn delete_movement(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.authorize(Capability::DeleteMovement)?;
    let controller = MovementController::new(state.pool.clone());
    Ok(Json(controller.delete(id, &user).await?))
}
