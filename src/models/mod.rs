//! Modelos del sistema
//!
//! Este módulo contiene las filas que mapean al schema PostgreSQL
//! (ver `migrations/`).

pub mod client;
pub mod courier;
pub mod movement;
pub mod route;
pub mod statistics;
pub mod supplier;
pub mod trays;
pub mod user;
pub mod warehouse;
