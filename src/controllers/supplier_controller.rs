use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::supplier_dto::{
    CreateSupplierRequest, SupplierBalanceResponse, SupplierMovementRequest, SupplierMovementResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::supplier::{Supplier, SupplierMovement, SupplierSummary};
use crate::models::trays::TrayCounts;
use crate::repositories::supplier_repository::{NewSupplierMovement, SupplierRepository};
use crate::repositories::warehouse_repository::WarehouseRepository;
use crate::services::ledger;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{normalize_optional, normalize_upper};

pub struct SupplierController {
    pool: PgPool,
    repository: SupplierRepository,
}

impl SupplierController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: SupplierRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn list(&self) -> AppResult<ApiResponse<Vec<SupplierSummary>>> {
        let suppliers = self.repository.list_active().await?;
        Ok(ApiResponse::success(suppliers))
    }

    pub async fn create(
        &self,
        request: CreateSupplierRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<ApiResponse<Supplier>> {
        request.validate()?;

        let name = normalize_upper(&request.name);
        let product = normalize_upper(&request.product);
        let supplier = self.repository.create(&name, &product, &user.username).await?;

        info!("✅ Proveedor {} registrado por '{}'", supplier.name, user.username);
        Ok(ApiResponse::success_with_message(supplier, "Proveedor registrado exitosamente"))
    }

    pub async fn movements(&self, id: i32) -> AppResult<ApiResponse<Vec<SupplierMovement>>> {
        self.find(id).await?;
        let movements = self.repository.movements(id).await?;
        Ok(ApiResponse::success(movements))
    }

    pub async fn balance(&self, id: i32) -> AppResult<ApiResponse<SupplierBalanceResponse>> {
        let supplier = self.find(id).await?;
        let latest = SupplierRepository::latest_balance(&self.pool, supplier.id).await?;

        let balance = latest.map(|(counts, _)| counts).unwrap_or(TrayCounts::ZERO);
        Ok(ApiResponse::success(SupplierBalanceResponse {
            supplier_id: supplier.id,
            large: balance.large,
            small: balance.small,
            last_movement_at: latest.map(|(_, moved_at)| moved_at),
        }))
    }

    /// Registrar una entrada o salida de charolas con un proveedor.
    /// Mueve bodega en el mismo sentido dentro de la transacción.
    pub async fn register_movement(
        &self,
        id: i32,
        request: SupplierMovementRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<ApiResponse<SupplierMovementResponse>> {
        request.validate()?;
        let declared = request.declared_prior()?;

        let mut tx = self.pool.begin().await?;

        let supplier = SupplierRepository::lock_active(&mut *tx, id)
            .await?
            .ok_or_else(|| supplier_not_found(id))?;

        let prior = SupplierRepository::latest_balance(&mut *tx, supplier.id)
            .await?
            .map(|(counts, _)| counts)
            .unwrap_or(TrayCounts::ZERO);

        if let Some(declared) = declared {
            if declared != prior {
                return Err(AppError::Conflict(format!(
                    "El saldo anterior del proveedor cambió. Saldo actual: {}",
                    prior
                )));
            }
        }

        let incoming = request.incoming();
        let outgoing = request.outgoing();
        let warehouse = WarehouseRepository::read(&mut *tx).await?;
        let plan = ledger::plan_supplier_movement(warehouse.counts(), prior, request.kind, incoming, outgoing)?;

        let notes = normalize_optional(request.notes.as_deref());
        let movement = SupplierRepository::insert_movement(
            &mut *tx,
            NewSupplierMovement {
                supplier_id: supplier.id,
                kind: request.kind,
                prior,
                incoming,
                outgoing,
                final_balance: plan.supplier_after,
                notes: notes.as_deref(),
                recorded_by: &user.username,
            },
        )
        .await?;

        let warehouse_notes = format!("Movimiento de {} con proveedor {}", request.kind.as_str(), supplier.name);
        let warehouse = WarehouseRepository::supersede(
            &mut *tx,
            warehouse.version,
            plan.warehouse_after,
            Some(&warehouse_notes),
            &user.username,
        )
        .await?;

        tx.commit().await?;

        info!(
            "🏭 {} con proveedor {} registrada por '{}'. Saldo proveedor: {}. Bodega: {}",
            request.kind.as_str(),
            supplier.name,
            user.username,
            movement.final_balance(),
            warehouse.counts()
        );

        Ok(ApiResponse::success_with_message(
            SupplierMovementResponse {
                supplier_balance: movement.final_balance(),
                movement,
                warehouse: warehouse.counts(),
            },
            "Movimiento de proveedor registrado",
        ))
    }

    /// Baja lógica del proveedor
    pub async fn delete(&self, id: i32, user: &AuthenticatedUser) -> AppResult<ApiResponse<()>> {
        if !self.repository.deactivate(id, &user.username).await? {
            return Err(supplier_not_found(id));
        }

        info!("🗑️ Proveedor {} desactivado por '{}'", id, user.username);
        Ok(ApiResponse::message("Proveedor eliminado"))
    }

    async fn find(&self, id: i32) -> AppResult<Supplier> {
        self.repository
            .find_active(id)
            .await?
            .ok_or_else(|| supplier_not_found(id))
    }
}

fn supplier_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Proveedor {} no encontrado", id))
}
