//! Controladores
//!
//! Orquestan cada caso de uso: validan la request, abren la transacción,
//! consultan el libro de saldos y escriben a través de los repositorios.

pub mod auth_controller;
pub mod client_controller;
pub mod courier_controller;
pub mod movement_controller;
pub mod route_controller;
pub mod statistics_controller;
pub mod supplier_controller;
pub mod warehouse_controller;
