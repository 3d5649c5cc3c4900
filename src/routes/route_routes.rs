use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{
    FinishRouteRequest, RouteFilters, RouteFinishedResponse, RouteMovementsResponse,
    RouteStartedResponse, StartRouteRequest, UpdateRouteRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::route::DeliveryRoute;
use crate::services::Capability;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes).post(start_route))
        .route("/:id", get(get_route).put(update_route).delete(delete_route))
        .route("/:id/finalizar", post(finish_route))
        .route("/:id/movimientos", get(route_movements))
}

async fn list_routes(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<RouteFilters>,
) -> Result<Json<ApiResponse<Vec<DeliveryRoute>>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.list(filters, &state.config.business_timezone).await?))
}

async fn get_route(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<DeliveryRoute>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.get(id).await?))
}

async fn start_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<StartRouteRequest>,
) -> Result<Json<ApiResponse<RouteStartedResponse>>, AppError> {
    user.authorize(Capability::ManageRoutes)?;
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.start(request, &user).await?))
}

async fn update_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<DeliveryRoute>>, AppError> {
    user.authorize(Capability::ManageRoutes)?;
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn finish_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<FinishRouteRequest>,
) -> Result<Json<ApiResponse<RouteFinishedResponse>>, AppError> {
    user.authorize(Capability::ManageRoutes)?;
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.finish(id, request, &user).await?))
}

async fn route_movements(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<RouteMovementsResponse>>, AppError> {
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.movements(id).await?))
}

async fn delete_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.authorize(Capability::DeleteRoute)?;
    let controller = RouteController::new(state.pool.clone());
    Ok(Json(controller.delete(id, &user).await?))
}
