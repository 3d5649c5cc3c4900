use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::statistics_controller::StatisticsController;
use crate::dto::ApiResponse;
use crate::models::statistics::DashboardStatistics;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_statistics_router() -> Router<AppState> {
    Router::new().route("/", get(dashboard_statistics))
}

async fn dashboard_statistics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStatistics>>, AppError> {
    let controller = StatisticsController::new(state.pool.clone());
    Ok(Json(controller.dashboard(&state.config.business_timezone).await?))
}
