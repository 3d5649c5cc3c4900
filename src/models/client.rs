//! Modelo de Client
//!
//! Mapea a la tabla `clients`. El código de cliente es la llave primaria.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::trays::TrayCounts;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Client {
    pub code: String,
    pub name: String,
    pub establishment: Option<String>,
    pub salesperson: Option<String>,
    pub municipality: Option<String>,
    pub active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Fila del inventario: cliente con su último saldo reportado y acumulados
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryRow {
    pub code: String,
    pub name: String,
    pub establishment: Option<String>,
    pub salesperson: Option<String>,
    pub municipality: Option<String>,
    pub prior_large: i32,
    pub prior_small: i32,
    pub total_dropped_large: i64,
    pub total_picked_large: i64,
    pub total_dropped_small: i64,
    pub total_picked_small: i64,
    pub balance_large: i32,
    pub balance_small: i32,
    pub balance_total: i64,
}

impl InventoryRow {
    pub fn balance(&self) -> TrayCounts {
        TrayCounts::new(self.balance_large, self.balance_small)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventorySummary {
    pub total_clients: i64,
    pub total_trays: i64,
    pub clients_with_trays: i64,
}
