use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::warehouse_dto::UpdateWarehouseRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::warehouse::{WarehouseHistoryEntry, WarehouseState};
use crate::repositories::warehouse_repository::WarehouseRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::normalize_optional;

const HISTORY_LIMIT: i64 = 50;

pub struct WarehouseController {
    pool: PgPool,
    repository: WarehouseRepository,
}

impl WarehouseController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: WarehouseRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn current(&self) -> AppResult<ApiResponse<WarehouseState>> {
        let state = self.repository.current().await?;
        Ok(ApiResponse::success(state))
    }

    pub async fn history(&self) -> AppResult<ApiResponse<Vec<WarehouseHistoryEntry>>> {
        let entries = self.repository.history(HISTORY_LIMIT).await?;
        Ok(ApiResponse::success(entries))
    }

    /// Ajuste administrativo con conteos absolutos
    pub async fn update(
        &self,
        request: UpdateWarehouseRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<ApiResponse<WarehouseState>> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;
        let current = WarehouseRepository::read(&mut *tx).await?;

        if let Some(version) = request.version {
            if version != current.version {
                return Err(AppError::Conflict(format!(
                    "La bodega cambió desde su última lectura (versión actual {})",
                    current.version
                )));
            }
        }

        let notes = normalize_optional(request.notes.as_deref())
            .unwrap_or_else(|| "Ajuste manual".to_string());
        let updated = WarehouseRepository::supersede(
            &mut *tx,
            current.version,
            request.counts(),
            Some(&notes),
            &user.username,
        )
        .await?;

        tx.commit().await?;

        info!(
            "🏬 Bodega ajustada por '{}': {} -> {} (versión {})",
            user.username,
            current.counts(),
            updated.counts(),
            updated.version
        );

        Ok(ApiResponse::success_with_message(updated, "Bodega actualizada"))
    }
}
