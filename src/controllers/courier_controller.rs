use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::courier_dto::CreateCourierRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::courier::{next_courier_code, Courier};
use crate::repositories::courier_repository::CourierRepository;
use crate::utils::errors::AppResult;
use crate::utils::validation::{normalize_optional, normalize_upper};

pub struct CourierController {
    pool: PgPool,
    repository: CourierRepository,
}

impl CourierController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CourierRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn list(&self) -> AppResult<ApiResponse<Vec<Courier>>> {
        let couriers = self.repository.list_active().await?;
        Ok(ApiResponse::success(couriers))
    }

    pub async fn create(
        &self,
        request: CreateCourierRequest,
        user: &AuthenticatedUser,
    ) -> AppResult<ApiResponse<Courier>> {
        request.validate()?;

        let first_name = normalize_upper(&request.first_name);
        let last_name = normalize_upper(&request.last_name);
        let phone = normalize_optional(request.phone.as_deref());

        let mut tx = self.pool.begin().await?;
        let last_code = CourierRepository::last_code(&mut *tx).await?;
        let code = next_courier_code(last_code.as_deref());

        let courier = CourierRepository::insert(
            &mut *tx,
            &code,
            &first_name,
            &last_name,
            phone.as_deref(),
            &user.username,
        )
        .await?;
        tx.commit().await?;

        info!("✅ Entregador {} ({}) registrado por '{}'", courier.full_name(), courier.code, user.username);
        Ok(ApiResponse::success_with_message(courier, "Entregador registrado exitosamente"))
    }
}
