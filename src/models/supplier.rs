//! Modelo de proveedores y sus movimientos

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::trays::TrayCounts;

/// Tipo de movimiento de proveedor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupplierMovementKind {
    /// Charolas que entran a bodega
    #[serde(rename = "entrada", alias = "incoming")]
    Incoming,
    /// Charolas que salen de bodega
    #[serde(rename = "salida", alias = "outgoing")]
    Outgoing,
}

impl SupplierMovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierMovementKind::Incoming => "entrada",
            SupplierMovementKind::Outgoing => "salida",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: i32,
    pub name: String,
    pub product: String,
    pub active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Proveedor con el saldo derivado de su último movimiento
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupplierSummary {
    pub id: i32,
    pub name: String,
    pub product: String,
    pub created_at: DateTime<Utc>,
    pub balance_large: i32,
    pub balance_small: i32,
    pub last_movement_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupplierMovement {
    pub id: i32,
    pub supplier_id: i32,
    pub kind: String,
    pub moved_at: DateTime<Utc>,
    pub prior_large: i32,
    pub incoming_large: i32,
    pub outgoing_large: i32,
    pub prior_small: i32,
    pub incoming_small: i32,
    pub outgoing_small: i32,
    pub final_large: i32,
    pub final_small: i32,
    pub notes: Option<String>,
    pub recorded_by: String,
}

impl SupplierMovement {
    pub fn final_balance(&self) -> TrayCounts {
        TrayCounts::new(self.final_large, self.final_small)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_accepts_spanish_and_english() {
        let kind: SupplierMovementKind = serde_json::from_str("\"salida\"").unwrap();
        assert_eq!(kind, SupplierMovementKind::Outgoing);
        let kind: SupplierMovementKind = serde_json::from_str("\"incoming\"").unwrap();
        assert_eq!(kind, SupplierMovementKind::Incoming);
        assert!(serde_json::from_str::<SupplierMovementKind>("\"ajuste\"").is_err());
        assert_eq!(serde_json::to_value(SupplierMovementKind::Incoming).unwrap(), "entrada");
    }
}
