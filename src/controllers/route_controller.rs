use sqlx::PgPool;
use std::collections::HashSet;
use tracing::info;
use validator::Validate;

use crate::dto::route_dto::{
    FinishRouteRequest, RouteFilters, RouteFinishedResponse, RouteMovementsResponse,
    RouteStartedResponse, StartRouteRequest, UpdateRouteRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::movement::MovementTotals;
use crate::models::route::DeliveryRoute;
use crate::repositories::courier_repository::CourierRepository;
use crate::repositories::movement_repository::MovementRepository;
use crate::repositories::route_repository::{NewRoute, RouteRepository};
use crate::repositories::warehouse_repository::WarehouseRepository;
use crate::services::ledger;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{normalize_optional, validate_date};

pub struct RouteController {
    pool: PgPool,
    repository: RouteRepository,
    movements: MovementRepository,
}

impl RouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RouteRepository::new(pool.clone()),
            movements: MovementRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn list(&self, filters: RouteFilters, timezone: &str) -> AppResult<ApiResponse<Vec<DeliveryRoute>>> {
        let date = match filters.fecha.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            Some(fecha) => Some(
                validate_date(fecha)
                    .map_err(|_| AppError::BadRequest(format!("Fecha inválida '{}', use AAAA-MM-DD", fecha)))?,
            ),
            None => None,
        };

        let routes = self.repository.list(filters.estado, date, timezone).await?;
        Ok(ApiResponse::success(routes))
    }

    pub async fn get(&self, id: i32) -> AppResult<ApiResponse<DeliveryRoute>> {
        let route = self.find(id).await?;
        Ok(ApiResponse::success(route))
    }

    /// Iniciar una ruta: retira de bodega las charolas asignadas
    pub async fn start(
        &self,
        request: StartRouteRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<ApiResponse<RouteStartedResponse>> {
        request.validate()?;

        let code = request.code.trim();
        let requested = request.requested();
        let mut tx = self.pool.begin().await?;

        if RouteRepository::code_exists(&mut *tx, code).await? {
            return Err(AppError::DuplicateCode(format!("El código de ruta '{}' ya existe", code)));
        }

        let warehouse = WarehouseRepository::read(&mut *tx).await?;
        let warehouse_after = ledger::plan_route_start(warehouse.counts(), requested)?;

        let courier = CourierRepository::find_active(&mut *tx, request.courier_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Entregador no encontrado o inactivo".to_string()))?;
        let courier_name = courier.full_name();

        let notes = normalize_optional(request.notes.as_deref());
        let route = RouteRepository::insert(
            &mut *tx,
            NewRoute {
                code,
                name: request.name.trim(),
                courier_id: courier.id,
                courier_name: &courier_name,
                started_at: request.started_at.unwrap_or_else(chrono::Utc::now),
                starting: requested,
                notes: notes.as_deref(),
                recorded_by: &user.username,
            },
        )
        .await?;

        let warehouse_notes = format!("Salida de ruta {}", route.code);
        let warehouse = WarehouseRepository::supersede(
            &mut *tx,
            warehouse.version,
            warehouse_after,
            Some(&warehouse_notes),
            &user.username,
        )
        .await?;

        tx.commit().await?;

        info!(
            "🚚 Ruta {} iniciada por '{}' con {}. Bodega: {}",
            route.code, user.username, requested, warehouse.counts()
        );

        Ok(ApiResponse::success_with_message(
            RouteStartedResponse {
                route,
                warehouse: warehouse.counts(),
            },
            "Ruta iniciada exitosamente",
        ))
    }

    pub async fn update(&self, id: i32, request: UpdateRouteRequest) -> AppResult<ApiResponse<DeliveryRoute>> {
        request.validate()?;

        let name = request.name.as_deref().map(str::trim);
        let notes = request.notes.as_deref().map(str::trim);
        let route = self
            .repository
            .update_details(id, name, notes)
            .await?
            .ok_or_else(|| route_not_found(id))?;

        Ok(ApiResponse::success_with_message(route, "Ruta actualizada"))
    }

    /// Finalizar una ruta: lo que regresa vuelve a bodega
    pub async fn finish(
        &self,
        id: i32,
        request: FinishRouteRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<ApiResponse<RouteFinishedResponse>> {
        request.validate()?;

        let returned = request.returned();
        let mut tx = self.pool.begin().await?;

        let route = RouteRepository::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| route_not_found(id))?;

        if !route.is_started() {
            return Err(AppError::InvalidState(format!("La ruta {} ya está finalizada", route.code)));
        }

        let warehouse = WarehouseRepository::read(&mut *tx).await?;
        let plan = ledger::plan_route_finish(warehouse.counts(), route.starting(), returned)?;

        let route = RouteRepository::finish(&mut *tx, route.id, returned).await?;

        let warehouse_notes = format!("Regreso de ruta {}", route.code);
        let warehouse = WarehouseRepository::supersede(
            &mut *tx,
            warehouse.version,
            plan.warehouse_after,
            Some(&warehouse_notes),
            &user.username,
        )
        .await?;

        tx.commit().await?;

        let summary = plan.outcome.describe(plan.difference);
        info!("🏁 Ruta {} finalizada por '{}'. {}", route.code, user.username, summary);

        Ok(ApiResponse::success_with_message(
            RouteFinishedResponse {
                route,
                warehouse: warehouse.counts(),
                difference: plan.difference,
                summary: summary.clone(),
            },
            format!("Ruta finalizada. {}", summary),
        ))
    }

    pub async fn movements(&self, id: i32) -> AppResult<ApiResponse<RouteMovementsResponse>> {
        let route = self.find(id).await?;
        let movements = self.movements.by_route(id).await?;

        let totals = MovementTotals::accumulate(&movements);
        let clients_served = movements
            .iter()
            .map(|m| m.client_code.as_str())
            .collect::<HashSet<_>>()
            .len();

        Ok(ApiResponse::success(RouteMovementsResponse {
            route,
            totals,
            clients_served,
            movements,
        }))
    }

    /// Eliminar una ruta sin movimientos
    pub async fn delete(&self, id: i32, user: &AuthenticatedUser) -> AppResult<ApiResponse<()>> {
        let mut tx = self.pool.begin().await?;

        let route = RouteRepository::lock(&mut *tx, id)
            .await?
            .ok_or_else(|| route_not_found(id))?;

        let movements = MovementRepository::count_by_route(&mut *tx, id).await?;
        if movements > 0 {
            return Err(AppError::Conflict(format!(
                "La ruta {} tiene {} movimientos registrados y no puede eliminarse",
                route.code, movements
            )));
        }

        RouteRepository::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!("🗑️ Ruta {} eliminada por '{}'", route.code, user.username);
        Ok(ApiResponse::message(format!("Ruta {} eliminada", route.code)))
    }

    async fn find(&self, id: i32) -> AppResult<DeliveryRoute> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| route_not_found(id))
    }
}

fn route_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Ruta {} no encontrada", id))
}
