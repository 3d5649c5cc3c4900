use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::client_dto::{ClientHistoryResponse, CreateClientRequest, PriorBalanceResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::client::{Client, InventoryRow, InventorySummary};
use crate::models::movement::MovementTotals;
use crate::models::trays::TrayCounts;
use crate::repositories::client_repository::{ClientRepository, NewClient};
use crate::repositories::movement_repository::{MovementRepository, NewMovement};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::normalize_optional;

pub struct ClientController {
    pool: PgPool,
    repository: ClientRepository,
    movements: MovementRepository,
}

impl ClientController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClientRepository::new(pool.clone()),
            movements: MovementRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn inventory(&self) -> AppResult<ApiResponse<Vec<InventoryRow>>> {
        let rows = self.repository.inventory().await?;
        Ok(ApiResponse::success(rows))
    }

    pub async fn inventory_summary(&self) -> AppResult<ApiResponse<InventorySummary>> {
        let summary = self.repository.inventory_summary().await?;
        Ok(ApiResponse::success(summary))
    }

    pub async fn search(&self, term: Option<&str>) -> AppResult<ApiResponse<Vec<Client>>> {
        let term = term.map(str::trim).unwrap_or_default();
        if term.is_empty() {
            return Ok(ApiResponse::success(Vec::new()));
        }

        let clients = self.repository.search(term).await?;
        Ok(ApiResponse::success(clients))
    }

    /// Último saldo reportado por el cliente (0/0 si no tiene movimientos)
    pub async fn prior_balance(&self, code: &str) -> AppResult<ApiResponse<PriorBalanceResponse>> {
        let client = self.find(code).await?;
        let latest = ClientRepository::latest_balance(&self.pool, &client.code).await?;

        let balance = latest.map(|l| l.balance).unwrap_or(TrayCounts::ZERO);
        Ok(ApiResponse::success(PriorBalanceResponse {
            client_code: client.code,
            large: balance.large,
            small: balance.small,
            last_movement_at: latest.map(|l| l.moved_at),
        }))
    }

    pub async fn history(&self, code: &str) -> AppResult<ApiResponse<ClientHistoryResponse>> {
        let client = self.find(code).await?;
        let movements = self.movements.by_client(&client.code).await?;

        let balance = movements
            .first()
            .map(|m| TrayCounts::new(m.reported_large, m.reported_small))
            .unwrap_or(TrayCounts::ZERO);
        let totals = MovementTotals::accumulate(&movements);

        Ok(ApiResponse::success(ClientHistoryResponse {
            client,
            balance,
            totals,
            movements,
        }))
    }

    /// Registrar un cliente. Un saldo inicial queda como movimiento sin ruta.
    pub async fn create(
        &self,
        request: CreateClientRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<ApiResponse<Client>> {
        request.validate()?;

        let code = request.code.trim();
        let establishment = normalize_optional(request.establishment.as_deref());
        let salesperson = normalize_optional(request.salesperson.as_deref());
        let municipality = normalize_optional(request.municipality.as_deref());
        let initial = request.initial_balance();

        let mut tx = self.pool.begin().await?;

        let client = ClientRepository::insert(
            &mut *tx,
            NewClient {
                code,
                name: request.name.trim(),
                establishment: establishment.as_deref(),
                salesperson: salesperson.as_deref(),
                municipality: municipality.as_deref(),
                created_by: &user.username,
            },
        )
        .await?;

        if !initial.is_zero() {
            MovementRepository::insert(
                &mut *tx,
                NewMovement {
                    client_code: &client.code,
                    route_id: None,
                    prior: TrayCounts::ZERO,
                    dropped: TrayCounts::ZERO,
                    picked: TrayCounts::ZERO,
                    reported: initial,
                    verified: true,
                    recorded_by: &user.username,
                },
            )
            .await?;
        }

        tx.commit().await?;

        info!("✅ Cliente {} registrado por '{}' con saldo inicial {}", client.code, user.username, initial);
        Ok(ApiResponse::success_with_message(client, "Cliente registrado exitosamente"))
    }

    /// Eliminar un cliente sin movimientos
    pub async fn delete(&self, code: &str, user: &AuthenticatedUser) -> AppResult<ApiResponse<()>> {
        let mut tx = self.pool.begin().await?;

        let client = ClientRepository::lock_active(&mut *tx, code)
            .await?
            .ok_or_else(|| not_found_error("Cliente", code))?;

        let movements = ClientRepository::movement_count(&mut *tx, &client.code).await?;
        if movements > 0 {
            return Err(AppError::Conflict(format!(
                "El cliente {} tiene {} movimientos registrados y no puede eliminarse",
                client.code, movements
            )));
        }

        ClientRepository::delete(&mut *tx, &client.code).await?;
        tx.commit().await?;

        info!("🗑️ Cliente {} eliminado por '{}'", client.code, user.username);
        Ok(ApiResponse::message(format!("Cliente {} eliminado", client.code)))
    }

    async fn find(&self, code: &str) -> AppResult<Client> {
        self.repository
            .find(code)
            .await?
            .ok_or_else(|| not_found_error("Cliente", code))
    }
}
