use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::movement::ClientMovement;
use crate::models::trays::TrayCounts;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_not_blank;

// Request para registrar un movimiento de cliente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMovementRequest {
    pub route_id: i32,
    #[validate(length(min = 1, max = 20), custom = "validate_not_blank")]
    pub client_code: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub dropped_large: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub dropped_small: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub picked_large: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub picked_small: i32,
    /// Saldo anterior que vio el operador; si llega debe coincidir con el
    /// último saldo reportado
    #[validate(range(min = 0, max = 1000000))]
    pub prior_large: Option<i32>,
    #[validate(range(min = 0, max = 1000000))]
    pub prior_small: Option<i32>,
    #[serde(default)]
    pub verified: bool,
}

impl CreateMovementRequest {
    pub fn dropped(&self) -> TrayCounts {
        TrayCounts::new(self.dropped_large, self.dropped_small)
    }

    pub fn picked(&self) -> TrayCounts {
        TrayCounts::new(self.picked_large, self.picked_small)
    }

    /// Saldo anterior declarado; si llega, debe traer ambos tamaños
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

// Response de un movimiento registrado
#[derive(Debug, Serialize)]
pub struct MovementCreatedResponse {
    pub movement: ClientMovement,
    pub client_balance: TrayCounts,
    pub route_current: TrayCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities_default_to_zero() {
        let req: CreateMovementRequest =
            serde_json::from_str(r#"{"route_id": 3, "client_code": "C1", "dropped_large": 2}"#).unwrap();
        assert_eq!(req.dropped(), TrayCounts::new(2, 0));
        assert!(req.picked().is_zero());
        assert!(req.declared_prior().unwrap().is_none());
        assert!(!req.verified);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let req: CreateMovementRequest =
            serde_json::from_str(r#"{"route_id": 3, "client_code": "C1", "picked_small": -4}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_declared_prior_needs_both_sizes() {
        let req: CreateMovementRequest = serde_json::from_str(
            r#"{"route_id": 1, "client_code": "C1", "prior_large": 10, "prior_small": 5}"#,
        )
        .unwrap();
        assert_eq!(req.declared_prior().unwrap(), Some(TrayCounts::new(10, 5)));
    }

    #[test]
    fn test_half_declared_prior_rejected() {
        let req: CreateMovementRequest = serde_json::from_str(
            r#"{"route_id": 1, "client_code": "C1", "prior_large": 10}"#,
        )
        .unwrap();
        assert!(matches!(req.declared_prior(), Err(AppError::BadRequest(_))));
    }
}
