use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::movement_dto::{CreateMovementRequest, MovementCreatedResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::movement::MovementListRow;
use crate::models::trays::TrayCounts;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::movement_repository::{MovementRepository, NewMovement};
use crate::repositories::route_repository::RouteRepository;
use crate::services::ledger;
use crate::utils::errors::{AppError, AppResult};

const RECENT_LIMIT: i64 = 100;

pub struct MovementController {
    pool: PgPool,
    repository: MovementRepository,
}

impl MovementController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MovementRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn recent(&self) -> AppResult<ApiResponse<Vec<MovementListRow>>> {
        let rows = self.repository.recent(RECENT_LIMIT).await?;
        Ok(ApiResponse::success(rows))
    }

    /// Registrar charolas descargadas y recogidas en un cliente.
    ///
    /// Bloquea la ruta y el cliente; el saldo anterior se toma del último
    /// movimiento del cliente.
    pub async fn create(
        &self,
        request: CreateMovementRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<ApiResponse<MovementCreatedResponse>> {
        request.validate()?;
        let declared = request.declared_prior()?;

        let mut tx = self.pool.begin().await?;

        let route = RouteRepository::lock(&mut *tx, request.route_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ruta {} no encontrada", request.route_id)))?;

        if !route.is_started() {
            return Err(AppError::InvalidState(format!(
                "La ruta {} ya está finalizada; no admite movimientos",
                route.code
            )));
        }

        let code = request.client_code.trim();
        let client = ClientRepository::lock_active(&mut *tx, code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cliente '{}' no encontrado o inactivo", code)))?;

        let prior = ClientRepository::latest_balance(&mut *tx, &client.code)
            .await?
            .map(|latest| latest.balance)
            .unwrap_or(TrayCounts::ZERO);

        if let Some(declared) = declared {
            if declared != prior {
                return Err(AppError::Conflict(format!(
                    "El saldo anterior del cliente cambió. Saldo actual: {}",
                    prior
                )));
            }
        }

        let dropped = request.dropped();
        let picked = request.picked();
        let plan = ledger::plan_client_movement(route.current(), prior, dropped, picked)?;

        let movement = MovementRepository::insert(
            &mut *tx,
            NewMovement {
                client_code: &client.code,
                route_id: Some(route.id),
                prior,
                dropped,
                picked,
                reported: plan.client_after,
                verified: request.verified,
                recorded_by: &user.username,
            },
        )
        .await?;

        RouteRepository::set_current(&mut *tx, route.id, plan.route_after).await?;

        tx.commit().await?;

        info!(
            "📦 Movimiento {} en cliente {} (ruta {}): descargadas {}, recogidas {}. Saldo cliente: {}",
            movement.id, client.code, route.code, dropped, picked, plan.client_after
        );

        Ok(ApiResponse::success_with_message(
            MovementCreatedResponse {
                movement,
                client_balance: plan.client_after,
                route_current: plan.route_after,
            },
            "Movimiento registrado exitosamente",
        ))
    }

    /// Eliminar un movimiento. Si su ruta sigue iniciada se revierte su
    /// efecto sobre las charolas en ruta.
    pub async fn delete(&self, id: i32, user: &AuthenticatedUser) -> AppResult<ApiResponse<()>> {
        let mut tx = self.pool.begin().await?;

        let movement = MovementRepository::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Movimiento {} no encontrado", id)))?;

        if let Some(route_id) = movement.route_id {
            let route = RouteRepository::lock(&mut *tx, route_id).await?;
            if let Some(route) = route.filter(|r| r.is_started()) {
                let restored =
                    ledger::reverse_client_movement(route.current(), movement.dropped(), movement.picked())?;
                RouteRepository::set_current(&mut *tx, route.id, restored).await?;
            }
        }

        MovementRepository::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!("🗑️ Movimiento {} del cliente {} eliminado por '{}'", id, movement.client_code, user.username);
        Ok(ApiResponse::message("Movimiento eliminado"))
    }
}
