//! Modelo de bodega
//!
//! La bodega es una sola fila (`warehouse_state.id = 1`) con una versión
//! monótona. Toda escritura compara la versión leída con la actual.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::trays::TrayCounts;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WarehouseState {
    pub large: i32,
    pub small: i32,
    pub notes: Option<String>,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl WarehouseState {
    pub fn counts(&self) -> TrayCounts {
        TrayCounts::new(self.large, self.small)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WarehouseHistoryEntry {
    pub id: i64,
    pub version: i64,
    pub large: i32,
    pub small: i32,
    pub notes: Option<String>,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}
