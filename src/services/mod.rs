//! Servicios de la aplicación
//!
//! Lógica de dominio independiente de HTTP: aritmética de saldos,
//! sesiones y capacidades por rol.

pub mod authorization_service;
pub mod ledger;
pub mod session_service;

pub use authorization_service::Capability;
pub use session_service::{Session, SessionStore};
