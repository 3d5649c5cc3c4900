//! DTOs de la API
//!
//! Cuerpos de request y response de cada recurso.

pub mod auth_dto;
pub mod client_dto;
pub mod courier_dto;
pub mod movement_dto;
pub mod response;
pub mod route_dto;
pub mod supplier_dto;
pub mod warehouse_dto;

pub use response::ApiResponse;
