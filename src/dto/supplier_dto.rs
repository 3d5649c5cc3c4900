use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::supplier::{SupplierMovement, SupplierMovementKind};
use crate::models::trays::TrayCounts;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_not_blank;

// Request para registrar un proveedor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub name: String,
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub product: String,
}

// Request de movimiento de proveedor
#[derive(Debug, Deserialize, Validate)]
pub struct SupplierMovementRequest {
    pub kind: SupplierMovementKind,
    #[validate(range(min = 0, max = 1000000))]
    pub prior_large: Option<i32>,
    #[validate(range(min = 0, max = 1000000))]
    pub prior_small: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub incoming_large: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub incoming_small: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub outgoing_large: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub outgoing_small: i32,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl SupplierMovementRequest {
    pub fn incoming(&self) -> TrayCounts {
        TrayCounts::new(self.incoming_large, self.incoming_small)
    }

    pub fn outgoing(&self) -> TrayCounts {
        TrayCounts::new(self.outgoing_large, self.outgoing_small)
    }

    pub fn declared_prior(&self) -> AppResult<Option<TrayCounts>> {
        match (self.prior_large, self.prior_small) {
            (Some(large), Some(small)) => Ok(Some(TrayCounts::new(large, small))),
            (None, None) => Ok(None),
            _ => Err(AppError::BadRequest(
                "El saldo anterior debe incluir charolas grandes y pequeñas".to_string(),
            )),
        }
    }
}

// Response de movimiento de proveedor registrado
#[derive(Debug, Serialize)]
pub struct SupplierMovementResponse {
    pub movement: SupplierMovement,
    pub supplier_balance: TrayCounts,
    pub warehouse: TrayCounts,
}

// Saldo actual de un proveedor
#[derive(Debug, Serialize)]
pub struct SupplierBalanceResponse {
    pub supplier_id: i32,
    pub large: i32,
    pub small: i32,
    pub last_movement_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_request_from_json() {
        let req: SupplierMovementRequest = serde_json::from_str(
            r#"{"kind":"salida","outgoing_large":30,"outgoing_small":5,"notes":"Devolución"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.kind, SupplierMovementKind::Outgoing);
        assert_eq!(req.outgoing(), TrayCounts::new(30, 5));
        assert!(req.incoming().is_zero());
        assert!(req.declared_prior().unwrap().is_none());
    }

    #[test]
    fn test_half_declared_prior_rejected() {
        let req: SupplierMovementRequest =
            serde_json::from_str(r#"{"kind":"entrada","prior_small":4,"incoming_small":4}"#).unwrap();
        assert!(matches!(req.declared_prior(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let parsed = serde_json::from_str::<SupplierMovementRequest>(r#"{"kind":"ajuste"}"#);
        assert!(parsed.is_err());
    }
}
