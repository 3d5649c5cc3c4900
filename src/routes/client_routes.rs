use axum::{
    extract::State,
    routing::{delete, get},
    Extension, Json, Router,
};

use crate::controllers::client_controller::ClientController;
use crate::dto::client_dto::{ClientHistoryResponse, CreateClientRequest, PriorBalanceResponse, SearchQuery};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::client::{Client, InventoryRow, InventorySummary};
use crate::services::Capability;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiJson, ApiPath, ApiQuery};

pub fn create_client_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/buscar", get(search_clients))
        .route("/:codigo/saldo-anterior", get(prior_balance))
        .route("/:codigo/historial", get(client_history))
        .route("/:codigo", delete(delete_client))
}

pub fn create_inventory_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients))
        .route("/resumen", get(inventory_summary))
}

async fn list_clients(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<InventoryRow>>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    Ok(Json(controller.inventory().await?))
}

async fn inventory_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InventorySummary>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    Ok(Json(controller.inventory_summary().await?))
}

async fn search_clients(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Client>>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    Ok(Json(controller.search(query.q.as_deref()).await?))
}

async fn prior_balance(
    State(state): State<AppState>,
    ApiPath(codigo): ApiPath<String>,
) -> Result<Json<ApiResponse<PriorBalanceResponse>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    Ok(Json(controller.prior_balance(&codigo).await?))
}

async fn client_history(
    State(state): State<AppState>,
    ApiPath(codigo): ApiPath<String>,
) -> Result<Json<ApiResponse<ClientHistoryResponse>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    Ok(Json(controller.history(&codigo).await?))
}

async fn create_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateClientRequest>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    user.authorize(Capability::ManageClients)?;
    let controller = ClientController::new(state.pool.clone());
    Ok(Json(controller.create(request, &user).await?))
}

async fn delete_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(codigo): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    user.authorize(Capability::DeleteClient)?;
    let controller = ClientController::new(state.pool.clone());
    Ok(Json(controller.delete(&codigo, &user).await?))
}
