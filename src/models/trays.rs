//! Conteos de charolas por tamaño
//!
//! Todas las cantidades del sistema se manejan en pares grandes/pequeñas.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tamaño de charola
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraySize {
    Large,
    Small,
}

impl TraySize {
    pub const ALL: [TraySize; 2] = [TraySize::Large, TraySize::Small];
}

impl fmt::Display for TraySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraySize::Large => write!(f, "grandes"),
            TraySize::Small => write!(f, "pequeñas"),
        }
    }
}

/// Par de cantidades (grandes, pequeñas)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayCounts {
    pub large: i32,
    pub small: i32,
}

impl TrayCounts {
    pub const ZERO: TrayCounts = TrayCounts { large: 0, small: 0 };

    pub fn new(large: i32, small: i32) -> Self {
        Self { large, small }
    }

    pub fn get(&self, size: TraySize) -> i32 {
        match size {
            TraySize::Large => self.large,
            TraySize::Small => self.small,
        }
    }

    pub fn total(&self) -> i64 {
        self.large as i64 + self.small as i64
    }

    pub fn is_zero(&self) -> bool {
        self.large == 0 && self.small == 0
    }
}

impl fmt::Display for TrayCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} grandes, {} pequeñas", self.large, self.small)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_does_not_overflow() {
        let counts = TrayCounts::new(i32::MAX, i32::MAX);
        assert_eq!(counts.total(), 2 * i32::MAX as i64);
    }

    #[test]
    fn test_display() {
        assert_eq!(TrayCounts::new(12, 7).to_string(), "12 grandes, 7 pequeñas");
        assert!(TrayCounts::ZERO.is_zero());
    }
}
