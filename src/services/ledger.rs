//! Aritmética de saldos de charolas
//!
//! Única fuente de verdad para las validaciones de saldo. Las transacciones
//! de rutas, movimientos de clientes y movimientos de proveedores calculan
//! aquí los saldos resultantes antes de escribir nada en la base de datos.
//!
//! Regla general: `actual = anterior + entrantes - salientes`, y ningún saldo
//! puede quedar negativo.

use std::fmt;
use thiserror::Error;

use crate::models::supplier::SupplierMovementKind;
use crate::models::trays::{TrayCounts, TraySize};

/// Quién entrega las charolas en un retiro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockHolder {
    Warehouse,
    Route,
}

impl fmt::Display for StockHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockHolder::Warehouse => write!(f, "bodega"),
            StockHolder::Route => write!(f, "la ruta"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("No hay suficientes charolas {size} en {holder}. Disponibles: {available}, solicitadas: {requested}")]
    InsufficientStock {
        holder: StockHolder,
        size: TraySize,
        available: i32,
        requested: i32,
    },

    #[error("El saldo de charolas {size} no puede quedar negativo (resultado: {resulting})")]
    NegativeBalance { size: TraySize, resulting: i64 },

    #[error("La cantidad de charolas {size} ({field}) no puede ser negativa: {value}")]
    NegativeQuantity {
        field: &'static str,
        size: TraySize,
        value: i32,
    },

    #[error("La cantidad de charolas excede el máximo permitido")]
    Overflow,
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Verifica que ambas cantidades sean >= 0
pub fn ensure_non_negative(counts: TrayCounts, field: &'static str) -> LedgerResult<()> {
    for size in TraySize::ALL {
        let value = counts.get(size);
        if value < 0 {
            return Err(LedgerError::NegativeQuantity { field, size, value });
        }
    }
    Ok(())
}

/// `anterior + entrantes - salientes`, rechazando resultados negativos
pub fn apply_flow(prior: TrayCounts, incoming: TrayCounts, outgoing: TrayCounts) -> LedgerResult<TrayCounts> {
    let compute = |size: TraySize| -> LedgerResult<i32> {
        let resulting = prior.get(size) as i64 + incoming.get(size) as i64 - outgoing.get(size) as i64;
        if resulting < 0 {
            return Err(LedgerError::NegativeBalance { size, resulting });
        }
        i32::try_from(resulting).map_err(|_| LedgerError::Overflow)
    };

    Ok(TrayCounts::new(compute(TraySize::Large)?, compute(TraySize::Small)?))
}

/// Retira `requested` de `available`; falla si alguna cantidad excede lo disponible
pub fn withdraw(holder: StockHolder, available: TrayCounts, requested: TrayCounts) -> LedgerResult<TrayCounts> {
    ensure_non_negative(requested, "retiro")?;

    for size in TraySize::ALL {
        if requested.get(size) > available.get(size) {
            return Err(LedgerError::InsufficientStock {
                holder,
                size,
                available: available.get(size),
                requested: requested.get(size),
            });
        }
    }

    apply_flow(available, TrayCounts::ZERO, requested)
}

/// Suma `incoming` a `available` sin límite superior
pub fn deposit(available: TrayCounts, incoming: TrayCounts) -> LedgerResult<TrayCounts> {
    ensure_non_negative(incoming, "ingreso")?;
    apply_flow(available, incoming, TrayCounts::ZERO)
}

/// Bodega resultante al iniciar una ruta
pub fn plan_route_start(warehouse: TrayCounts, requested: TrayCounts) -> LedgerResult<TrayCounts> {
    withdraw(StockHolder::Warehouse, warehouse, requested)
}

/// Resultado de la devolución de charolas al finalizar una ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// Se entregaron o perdieron charolas
    Shortfall(i64),
    /// El entregador recogió charolas adicionales de clientes
    Surplus(i64),
    Complete,
}

impl ReturnOutcome {
    pub fn describe(&self, difference: TrayCounts) -> String {
        match self {
            ReturnOutcome::Shortfall(total) => format!(
                "Se entregaron/perdieron {} charolas ({} grandes, {} pequeñas).",
                total, difference.large, difference.small
            ),
            ReturnOutcome::Surplus(total) => format!(
                "El entregador recogió {} charolas adicionales de clientes.",
                total
            ),
            ReturnOutcome::Complete => "El entregador regresó con todas las charolas.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteFinishPlan {
    pub warehouse_after: TrayCounts,
    /// `inicio - regresan` por tamaño; puede ser negativo
    pub difference: TrayCounts,
    pub outcome: ReturnOutcome,
}

/// Bodega resultante al finalizar una ruta.
///
/// No se exige que lo devuelto sea menor o igual a lo que salió: el
/// entregador puede regresar con charolas recogidas de clientes.
pub fn plan_route_finish(
    warehouse: TrayCounts,
    started: TrayCounts,
    returned: TrayCounts,
) -> LedgerResult<RouteFinishPlan> {
    let warehouse_after = deposit(warehouse, returned)?;

    let large = started.large.checked_sub(returned.large).ok_or(LedgerError::Overflow)?;
    let small = started.small.checked_sub(returned.small).ok_or(LedgerError::Overflow)?;
    let difference = TrayCounts::new(large, small);

    let total = difference.total();
    let outcome = if total > 0 {
        ReturnOutcome::Shortfall(total)
    } else if total < 0 {
        ReturnOutcome::Surplus(-total)
    } else {
        ReturnOutcome::Complete
    };

    Ok(RouteFinishPlan {
        warehouse_after,
        difference,
        outcome,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientMovementPlan {
    pub client_after: TrayCounts,
    pub route_after: TrayCounts,
}

/// Saldos resultantes de un movimiento de cliente:
/// `cliente = anterior + descargadas - recogidas` y
/// `ruta = actual - descargadas + recogidas`.
pub fn plan_client_movement(
    route_on_hand: TrayCounts,
    client_prior: TrayCounts,
    dropped: TrayCounts,
    picked: TrayCounts,
) -> LedgerResult<ClientMovementPlan> {
    ensure_non_negative(dropped, "descargadas")?;
    ensure_non_negative(picked, "recogidas")?;

    let after_drop = withdraw(StockHolder::Route, route_on_hand, dropped)?;
    let route_after = apply_flow(after_drop, picked, TrayCounts::ZERO)?;
    let client_after = apply_flow(client_prior, dropped, picked)?;

    Ok(ClientMovementPlan {
        client_after,
        route_after,
    })
}

/// Saldo de la ruta tras eliminar un movimiento todavía vigente
pub fn reverse_client_movement(
    route_current: TrayCounts,
    dropped: TrayCounts,
    picked: TrayCounts,
) -> LedgerResult<TrayCounts> {
    apply_flow(route_current, dropped, picked)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplierMovementPlan {
    pub supplier_after: TrayCounts,
    pub warehouse_after: TrayCounts,
}

/// Saldos resultantes de un movimiento de proveedor.
///
/// Una salida retira de bodega las charolas salientes; una entrada suma a
/// bodega las entrantes. El saldo del proveedor es
/// `anterior + entrantes - salientes` y no puede quedar negativo.
pub fn plan_supplier_movement(
    warehouse: TrayCounts,
    supplier_prior: TrayCounts,
    kind: SupplierMovementKind,
    incoming: TrayCounts,
    outgoing: TrayCounts,
) -> LedgerResult<SupplierMovementPlan> {
    ensure_non_negative(supplier_prior, "saldo anterior")?;
    ensure_non_negative(incoming, "entrantes")?;
    ensure_non_negative(outgoing, "salientes")?;

    let warehouse_after = match kind {
        SupplierMovementKind::Outgoing => withdraw(StockHolder::Warehouse, warehouse, outgoing)?,
        SupplierMovementKind::Incoming => deposit(warehouse, incoming)?,
    };

    let supplier_after = apply_flow(supplier_prior, incoming, outgoing)?;

    Ok(SupplierMovementPlan {
        supplier_after,
        warehouse_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(large: i32, small: i32) -> TrayCounts {
        TrayCounts::new(large, small)
    }

    #[test]
    fn test_route_start_rejects_more_than_warehouse() {
        let err = plan_route_start(t(100, 50), t(120, 0)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                holder: StockHolder::Warehouse,
                size: TraySize::Large,
                available: 100,
                requested: 120,
            }
        );
    }

    #[test]
    fn test_route_start_small_shortage() {
        let err = plan_route_start(t(100, 50), t(10, 51)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock { size: TraySize::Small, available: 50, requested: 51, .. }
        ));
    }

    #[test]
    fn test_route_start_withdraws_exact_amount() {
        assert_eq!(plan_route_start(t(100, 50), t(30, 20)).unwrap(), t(70, 30));
        assert_eq!(plan_route_start(t(100, 50), t(100, 50)).unwrap(), t(0, 0));
    }

    #[test]
    fn test_route_start_rejects_negative_request() {
        let err = plan_route_start(t(100, 50), t(-1, 0)).unwrap_err();
        assert!(matches!(err, LedgerError::NegativeQuantity { .. }));
    }

    #[test]
    fn test_route_finish_adds_returned_regardless_of_started() {
        let plan = plan_route_finish(t(70, 30), t(30, 20), t(45, 20)).unwrap();
        assert_eq!(plan.warehouse_after, t(115, 50));
        assert_eq!(plan.difference, t(-15, 0));
        assert_eq!(plan.outcome, ReturnOutcome::Surplus(15));
    }

    #[test]
    fn test_route_finish_outcomes() {
        let plan = plan_route_finish(t(0, 0), t(30, 20), t(25, 18)).unwrap();
        assert_eq!(plan.outcome, ReturnOutcome::Shortfall(7));
        assert!(plan.outcome.describe(plan.difference).contains("5 grandes, 2 pequeñas"));

        let plan = plan_route_finish(t(0, 0), t(30, 20), t(30, 20)).unwrap();
        assert_eq!(plan.outcome, ReturnOutcome::Complete);
        assert_eq!(plan.warehouse_after, t(30, 20));
    }

    #[test]
    fn test_client_movement_scenario() {
        let plan = plan_client_movement(t(40, 20), t(10, 5), t(3, 2), t(1, 0)).unwrap();
        assert_eq!(plan.client_after, t(12, 7));
        assert_eq!(plan.route_after, t(38, 18));
    }

    #[test]
    fn test_client_movement_cannot_drop_more_than_route_has() {
        let err = plan_client_movement(t(2, 20), t(0, 0), t(3, 0), t(0, 0)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock { holder: StockHolder::Route, size: TraySize::Large, .. }
        ));
    }

    #[test]
    fn test_client_movement_rejects_negative_client_balance() {
        let err = plan_client_movement(t(10, 10), t(1, 0), t(0, 0), t(2, 0)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::NegativeBalance { size: TraySize::Large, resulting: -1 }
        );
    }

    #[test]
    fn test_client_movement_route_never_negative() {
        // Descargar todo lo que lleva la ruta deja exactamente cero
        let plan = plan_client_movement(t(5, 5), t(0, 0), t(5, 5), t(0, 0)).unwrap();
        assert_eq!(plan.route_after, t(0, 0));
    }

    #[test]
    fn test_reverse_client_movement() {
        assert_eq!(reverse_client_movement(t(38, 18), t(3, 2), t(1, 0)).unwrap(), t(40, 20));
        assert!(reverse_client_movement(t(0, 0), t(0, 0), t(1, 0)).is_err());
    }

    #[test]
    fn test_supplier_outgoing_checks_warehouse() {
        let err = plan_supplier_movement(
            t(10, 10),
            t(0, 0),
            SupplierMovementKind::Outgoing,
            t(0, 0),
            t(11, 0),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock { holder: StockHolder::Warehouse, .. }));
    }

    #[test]
    fn test_supplier_outgoing_negative_balance() {
        let err = plan_supplier_movement(
            t(10, 10),
            t(2, 0),
            SupplierMovementKind::Outgoing,
            t(0, 0),
            t(5, 0),
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::NegativeBalance { size: TraySize::Large, resulting: -3 });
    }

    #[test]
    fn test_supplier_incoming_has_no_upper_bound() {
        let plan = plan_supplier_movement(
            t(10, 10),
            t(4, 1),
            SupplierMovementKind::Incoming,
            t(500, 30),
            t(0, 0),
        )
        .unwrap();
        assert_eq!(plan.warehouse_after, t(510, 40));
        assert_eq!(plan.supplier_after, t(504, 31));
    }

    #[test]
    fn test_supplier_outgoing_mirrors_warehouse() {
        let plan = plan_supplier_movement(
            t(100, 50),
            t(20, 10),
            SupplierMovementKind::Outgoing,
            t(0, 0),
            t(15, 10),
        )
        .unwrap();
        assert_eq!(plan.warehouse_after, t(85, 40));
        assert_eq!(plan.supplier_after, t(5, 0));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = deposit(t(i32::MAX, 0), t(1, 0)).unwrap_err();
        assert_eq!(err, LedgerError::Overflow);
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        let err = plan_route_start(t(100, 50), t(120, 0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No hay suficientes charolas grandes en bodega. Disponibles: 100, solicitadas: 120"
        );
    }
}
