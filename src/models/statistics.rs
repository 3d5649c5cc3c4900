use serde::Serialize;
use sqlx::FromRow;

/// Estadísticas generales del tablero
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DashboardStatistics {
    pub total_clients: i64,
    pub movements_today: i64,
    pub total_suppliers: i64,
    pub warehouse_trays: i64,
}
