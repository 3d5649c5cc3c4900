//! Modelo de Courier (entregador)

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Courier {
    pub id: i32,
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Courier {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Siguiente código `ENT###` a partir del último registrado
pub fn next_courier_code(last_code: Option<&str>) -> String {
    let next = last_code
        .and_then(|code| code.strip_prefix("ENT"))
        .and_then(|digits| digits.parse::<u32>().ok())
        .map(|n| n + 1)
        .unwrap_or(1);
    format!("ENT{:03}", next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_courier_code() {
        assert_eq!(next_courier_code(None), "ENT001");
        assert_eq!(next_courier_code(Some("ENT001")), "ENT002");
        assert_eq!(next_courier_code(Some("ENT099")), "ENT100");
        assert_eq!(next_courier_code(Some("ENT999")), "ENT1000");
        assert_eq!(next_courier_code(Some("XYZ")), "ENT001");
    }
}
