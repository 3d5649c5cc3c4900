//! Modelo de rutas de entrega
//!
//! Una ruta sale de bodega con una dotación de charolas, acumula movimientos
//! de clientes y se cierra devolviendo charolas a bodega.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::trays::TrayCounts;

/// Estado de la ruta, guardado como texto en `delivery_routes.state`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteState {
    #[serde(rename = "Iniciada")]
    Started,
    #[serde(rename = "Finalizada")]
    Finished,
}

impl RouteState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteState::Started => "Iniciada",
            RouteState::Finished => "Finalizada",
        }
    }
}

impl fmt::Display for RouteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Iniciada" => Ok(RouteState::Started),
            "Finalizada" => Ok(RouteState::Finished),
            other => Err(format!("Estado de ruta desconocido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DeliveryRoute {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub courier_id: i32,
    pub courier_name: String,
    pub started_at: DateTime<Utc>,
    pub starting_large: i32,
    pub starting_small: i32,
    pub current_large: i32,
    pub current_small: i32,
    pub returned_large: Option<i32>,
    pub returned_small: Option<i32>,
    pub notes: Option<String>,
    pub state: String,
    pub finished_at: Option<DateTime<Utc>>,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

impl DeliveryRoute {
    pub fn starting(&self) -> TrayCounts {
        TrayCounts::new(self.starting_large, self.starting_small)
    }

    pub fn current(&self) -> TrayCounts {
        TrayCounts::new(self.current_large, self.current_small)
    }

    /// Estado tipado; un valor desconocido se trata como finalizada
    pub fn route_state(&self) -> RouteState {
        self.state.parse().unwrap_or(RouteState::Finished)
    }

    pub fn is_started(&self) -> bool {
        self.route_state() == RouteState::Started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_state_round_trip() {
        assert_eq!("Iniciada".parse::<RouteState>().unwrap(), RouteState::Started);
        assert_eq!("Finalizada".parse::<RouteState>().unwrap(), RouteState::Finished);
        assert!("Cancelada".parse::<RouteState>().is_err());
        assert_eq!(RouteState::Started.to_string(), "Iniciada");
    }

    #[test]
    fn test_route_state_serializes_spanish() {
        assert_eq!(serde_json::to_value(RouteState::Finished).unwrap(), "Finalizada");
    }
}
