use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::client::Client;
use crate::models::movement::{MovementListRow, MovementTotals};
use crate::models::trays::TrayCounts;
use crate::utils::validation::validate_not_blank;

// Request para registrar un cliente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 20), custom = "validate_not_blank")]
    pub code: String,
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub name: String,
    #[validate(length(max = 150))]
    pub establishment: Option<String>,
    #[validate(length(max = 100))]
    pub salesperson: Option<String>,
    #[validate(length(max = 100))]
    pub municipality: Option<String>,
    /// Saldo inicial de charolas grandes en poder del cliente
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub initial_large: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub initial_small: i32,
}

impl CreateClientRequest {
    pub fn initial_balance(&self) -> TrayCounts {
        TrayCounts::new(self.initial_large, self.initial_small)
    }
}

// Query de búsqueda
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

// Último saldo reportado de un cliente
#[derive(Debug, Serialize)]
pub struct PriorBalanceResponse {
    pub client_code: String,
    pub large: i32,
    pub small: i32,
    pub last_movement_at: Option<DateTime<Utc>>,
}

// Historial completo de un cliente
#[derive(Debug, Serialize)]
pub struct ClientHistoryResponse {
    pub client: Client,
    pub balance: TrayCounts,
    pub totals: MovementTotals,
    pub movements: Vec<MovementListRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateClientRequest {
        CreateClientRequest {
            code: "CLI-001".to_string(),
            name: "Tienda La Esquina".to_string(),
            establishment: None,
            salesperson: None,
            municipality: Some("Centro".to_string()),
            initial_large: 4,
            initial_small: 0,
        }
    }

    #[test]
    fn test_valid_client() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_blank_code_rejected() {
        let mut req = request();
        req.code = "   ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_initial_balance_rejected() {
        let mut req = request();
        req.initial_small = -1;
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("initial_small"));
    }

    #[test]
    fn test_initial_balance_defaults_to_zero() {
        let req: CreateClientRequest =
            serde_json::from_str(r#"{"code":"C1","name":"Cliente"}"#).unwrap();
        assert!(req.initial_balance().is_zero());
    }
}
