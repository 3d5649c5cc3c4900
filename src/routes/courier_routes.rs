use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::controllers::courier_controller::CourierController;
use crate::dto::courier_dto::CreateCourierRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::courier::Courier;
use crate::services::Capability;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;

pub fn create_courier_router() -> Router<AppState> {
    Router::new().route("/", get(list_couriers).post(create_courier))
}

async fn list_couriers(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Courier>>>, AppError> {
    let controller = CourierController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn create_courier(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateCourierRequest>,
) -> Result<Json<ApiResponse<Courier>>, AppError> {
    user.authorize(Capability::ManageCouriers)?;
    let controller = CourierController::new(state.pool.clone());
    Ok(Json(controller.create(request, &user).await?))
}
