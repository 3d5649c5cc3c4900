use axum::{
    extract::State,
    routing::{delete, get},
    Extension, Json, Router,
};

use crate::controllers::supplier_controller::SupplierController;
use crate::dto::supplier_dto::{
    CreateSupplierRequest, SupplierBalanceResponse, SupplierMovementRequest, SupplierMovementResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::supplier::{Supplier, SupplierMovement, SupplierSummary};
use crate::services::Capability;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath};

pub fn create_supplier_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/:id/movimientos", get(supplier_movements).post(register_movement))
        .route("/:id/saldo", get(supplier_balance))
        .route("/:id", delete(delete_supplier))
}

async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SupplierSummary>>>, AppError> {
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(controller.list().await?))
}

async fn create_supplier(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateSupplierRequest>,
) -> Result<Json<ApiResponse<Supplier>>, AppError> {
    user.authorize(Capability::ManageSuppliers)?;
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(controller.create(request, &user).await?))
}

async fn supplier_movements(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<Vec<SupplierMovement>>>, AppError> {
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(controller.movements(id).await?))
}

async fn register_movement(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<SupplierMovementRequest>,
) -> Result<Json<ApiResponse<SupplierMovementResponse>>, AppError> {
    user.authorize(Capability::RecordSupplierMovement)?;
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(controller.register_movement(id, request, &user).await?))
}

async fn supplier_balance(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<SupplierBalanceResponse>>, AppError> {
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(controller.balance(id).await?))
}

async fn delete_supplier(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.authorize(Capability::DeleteSupplier)?;
    let controller = SupplierController::new(state.pool.clone());
    Ok(Json(controller.delete(id, &user).await?))
}
