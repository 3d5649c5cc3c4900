use sqlx::PgPool;

use crate::models::statistics::DashboardStatistics;
use crate::utils::errors::AppResult;

pub struct StatisticsRepository {
    pool: PgPool,
}

impl StatisticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cifras del tablero; "hoy" se evalúa en la zona horaria `timezone`
    pub async fn dashboard(&self, timezone: &str) -> AppResult<DashboardStatistics> {
        let stats = sqlx::query_as::<_, DashboardStatistics>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM clients WHERE active)::bigint AS total_clients,
                (SELECT COUNT(*)
                   FROM client_movements
                  WHERE (moved_at AT TIME ZONE $1)::date = (now() AT TIME ZONE $1)::date
                )::bigint AS movements_today,
                (SELECT COUNT(*) FROM suppliers WHERE active)::bigint AS total_suppliers,
                COALESCE((SELECT (large + small)::bigint FROM warehouse_state WHERE id = 1), 0) AS warehouse_trays
            "#,
        )
        .bind(timezone)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
