//! Modelo de movimientos de cliente
//!
//! Cada fila registra la visita de una ruta a un cliente: saldo anterior,
//! charolas descargadas, recogidas y saldo reportado, por tamaño.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::trays::TrayCounts;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ClientMovement {
    pub id: i32,
    pub client_code: String,
    pub route_id: Option<i32>,
    pub moved_at: DateTime<Utc>,
    pub prior_large: i32,
    pub dropped_large: i32,
    pub picked_large: i32,
    pub reported_large: i32,
    pub prior_small: i32,
    pub dropped_small: i32,
    pub picked_small: i32,
    pub reported_small: i32,
    pub verified: bool,
    pub recorded_by: String,
}

impl ClientMovement {
    pub fn dropped(&self) -> TrayCounts {
        TrayCounts::new(self.dropped_large, self.dropped_small)
    }

    pub fn picked(&self) -> TrayCounts {
        TrayCounts::new(self.picked_large, self.picked_small)
    }

    pub fn reported(&self) -> TrayCounts {
        TrayCounts::new(self.reported_large, self.reported_small)
    }
}

/// Movimiento con datos del cliente y de la ruta para listados
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MovementListRow {
    pub id: i32,
    pub client_code: String,
    pub client_name: String,
    pub establishment: Option<String>,
    pub route_id: Option<i32>,
    pub route_code: Option<String>,
    pub courier_name: Option<String>,
    pub moved_at: DateTime<Utc>,
    pub prior_large: i32,
    pub dropped_large: i32,
    pub picked_large: i32,
    pub reported_large: i32,
    pub prior_small: i32,
    pub dropped_small: i32,
    pub picked_small: i32,
    pub reported_small: i32,
    /// Diferencia total entre saldo reportado y saldo anterior
    pub difference: i32,
    pub verified: bool,
    pub recorded_by: String,
}

/// Totales de una colección de movimientos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MovementTotals {
    pub dropped_large: i64,
    pub picked_large: i64,
    pub dropped_small: i64,
    pub picked_small: i64,
}

impl MovementTotals {
    pub fn accumulate<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a MovementListRow>,
    {
        rows.into_iter().fold(Self::default(), |mut acc, row| {
            acc.dropped_large += row.dropped_large as i64;
            acc.picked_large += row.picked_large as i64;
            acc.dropped_small += row.dropped_small as i64;
            acc.picked_small += row.picked_small as i64;
            acc
        })
    }
}
