use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::movement::{MovementListRow, MovementTotals};
use crate::models::route::{DeliveryRoute, RouteState};
use crate::models::trays::TrayCounts;
use crate::utils::validation::validate_not_blank;

// Request para iniciar una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct StartRouteRequest {
    #[validate(length(min = 1, max = 30), custom = "validate_not_blank")]
    pub code: String,
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub name: String,
    pub courier_id: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub large: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub small: i32,
    pub started_at: Option<DateTime<Utc>>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl StartRouteRequest {
    pub fn requested(&self) -> TrayCounts {
        TrayCounts::new(self.large, self.small)
    }
}

// Request para finalizar una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct FinishRouteRequest {
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub returned_large: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000000))]
    pub returned_small: i32,
}

impl FinishRouteRequest {
    pub fn returned(&self) -> TrayCounts {
        TrayCounts::new(self.returned_large, self.returned_small)
    }
}

// Request para actualizar nombre u observaciones
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 150), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

// Filtros del listado de rutas
#[derive(Debug, Default, Deserialize)]
pub struct RouteFilters {
    pub estado: Option<RouteState>,
    /// Fecha de inicio `YYYY-MM-DD` en la zona horaria del negocio
    pub fecha: Option<String>,
}

// Response de ruta iniciada
#[derive(Debug, Serialize)]
pub struct RouteStartedResponse {
    pub route: DeliveryRoute,
    pub warehouse: TrayCounts,
}

// Response de ruta finalizada
#[derive(Debug, Serialize)]
pub struct RouteFinishedResponse {
    pub route: DeliveryRoute,
    pub warehouse: TrayCounts,
    /// `inicio - regresan` por tamaño
    pub difference: TrayCounts,
    pub summary: String,
}

// Movimientos de una ruta con su resumen
#[derive(Debug, Serialize)]
pub struct RouteMovementsResponse {
    pub route: DeliveryRoute,
    pub totals: MovementTotals,
    pub clients_served: usize,
    pub movements: Vec<MovementListRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_route_request() {
        let req: StartRouteRequest = serde_json::from_str(
            r#"{"code":"R-01","name":"Norte","courier_id":1,"large":20,"small":10}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.requested(), TrayCounts::new(20, 10));
        assert!(req.started_at.is_none());
    }

    #[test]
    fn test_blank_update_name_rejected() {
        let req = UpdateRouteRequest {
            name: Some(" ".to_string()),
            notes: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_filters_parse_state() {
        let filters: RouteFilters = serde_json::from_str(r#"{"estado":"Iniciada"}"#).unwrap();
        assert_eq!(filters.estado, Some(RouteState::Started));
        assert!(filters.fecha.is_none());
    }
}
