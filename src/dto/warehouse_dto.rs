use serde::Deserialize;
use validator::Validate;

use crate::models::trays::TrayCounts;

// Request de ajuste administrativo de bodega
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWarehouseRequest {
    #[validate(range(min = 0, max = 1000000))]
    pub large: i32,
    #[validate(range(min = 0, max = 1000000))]
    pub small: i32,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    /// Versión leída por el cliente; si llega, el ajuste solo se aplica
    /// sobre esa versión
    pub version: Option<i64>,
}

impl UpdateWarehouseRequest {
    pub fn counts(&self) -> TrayCounts {
        TrayCounts::new(self.large, self.small)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_counts_rejected() {
        let req: UpdateWarehouseRequest = serde_json::from_str(r#"{"large": -1, "small": 3}"#).unwrap();
        assert!(req.validate().is_err());
        assert!(req.version.is_none());
    }
}
