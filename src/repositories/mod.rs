//! Repositorios
//!
//! Acceso SQL por recurso. Los métodos `&self` leen del pool; las funciones
//! asociadas que reciben `&mut PgConnection` corren dentro de la
//! transacción del controlador.

pub mod client_repository;
pub mod courier_repository;
pub mod movement_repository;
pub mod route_repository;
pub mod statistics_repository;
pub mod supplier_repository;
pub mod user_repository;
pub mod warehouse_repository;

pub use client_repository::ClientRepository;
pub use courier_repository::CourierRepository;
pub use movement_repository::MovementRepository;
pub use route_repository::RouteRepository;
pub use statistics_repository::StatisticsRepository;
pub use supplier_repository::SupplierRepository;
pub use user_repository::UserRepository;
pub use warehouse_repository::WarehouseRepository;
