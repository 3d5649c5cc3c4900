use sqlx::PgPool;

use crate::dto::ApiResponse;
use crate::models::statistics::DashboardStatistics;
use crate::repositories::statistics_repository::StatisticsRepository;
use crate::utils::errors::AppResult;

pub struct StatisticsController {
    repository: StatisticsRepository,
}

impl StatisticsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: StatisticsRepository::new(pool),
        }
    }

    pub async fn dashboard(&self, timezone: &str) -> AppResult<ApiResponse<DashboardStatistics>> {
        let stats = self.repository.dashboard(timezone).await?;
        Ok(ApiResponse::success(stats))
    }
}
