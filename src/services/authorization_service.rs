//! Capacidades por rol
//!
//! Cada handler que modifica datos declara la capacidad que necesita y la
//! verifica antes de tocar la base de datos. Esta tabla es la única
//! definición de qué puede hacer cada rol.

use std::fmt;

use crate::models::user::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageClients,
    DeleteClient,
    RecordMovement,
    DeleteMovement,
    ManageRoutes,
    DeleteRoute,
    ManageCouriers,
    ManageSuppliers,
    RecordSupplierMovement,
    DeleteSupplier,
    UpdateWarehouse,
}

impl Capability {
    /// Acción en lenguaje del usuario, para mensajes de error
    pub fn action(&self) -> &'static str {
        match self {
            Capability::ManageClients => "registrar clientes",
            Capability::DeleteClient => "eliminar clientes",
            Capability::RecordMovement => "registrar movimientos",
            Capability::DeleteMovement => "eliminar movimientos",
            Capability::ManageRoutes => "gestionar rutas",
            Capability::DeleteRoute => "eliminar rutas",
            Capability::ManageCouriers => "registrar entregadores",
            Capability::ManageSuppliers => "registrar proveedores",
            Capability::RecordSupplierMovement => "registrar movimientos de proveedor",
            Capability::DeleteSupplier => "eliminar proveedores",
            Capability::UpdateWarehouse => "actualizar la bodega",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

const OPERATOR_CAPABILITIES: &[Capability] = &[
    Capability::ManageClients,
    Capability::RecordMovement,
    Capability::ManageRoutes,
    Capability::ManageCouriers,
    Capability::ManageSuppliers,
    Capability::RecordSupplierMovement,
];

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ManageClients,
    Capability::DeleteClient,
    Capability::RecordMovement,
    Capability::DeleteMovement,
    Capability::ManageRoutes,
    Capability::DeleteRoute,
    Capability::ManageCouriers,
    Capability::ManageSuppliers,
    Capability::RecordSupplierMovement,
    Capability::DeleteSupplier,
    Capability::UpdateWarehouse,
];

pub fn role_capabilities(role: UserRole) -> &'static [Capability] {
    match role {
        UserRole::Administrator => ADMIN_CAPABILITIES,
        UserRole::User => OPERATOR_CAPABILITIES,
    }
}

pub fn is_allowed(role: UserRole, capability: Capability) -> bool {
    role_capabilities(role).contains(&capability)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN_ONLY: [Capability; 5] = [
        Capability::DeleteClient,
        Capability::DeleteMovement,
        Capability::DeleteRoute,
        Capability::DeleteSupplier,
        Capability::UpdateWarehouse,
    ];

    #[test]
    fn test_admin_has_everything() {
        for capability in OPERATOR_CAPABILITIES.iter().chain(ADMIN_ONLY.iter()) {
            assert!(is_allowed(UserRole::Administrator, *capability), "{:?}", capability);
        }
    }

    #[test]
    fn test_operator_cannot_delete_or_touch_warehouse() {
        for capability in ADMIN_ONLY {
            assert!(!is_allowed(UserRole::User, capability), "{:?}", capability);
        }
    }

    #[test]
    fn test_operator_can_run_daily_work() {
        assert!(is_allowed(UserRole::User, Capability::ManageRoutes));
        assert!(is_allowed(UserRole::User, Capability::RecordMovement));
        assert!(is_allowed(UserRole::User, Capability::RecordSupplierMovement));
    }
}
