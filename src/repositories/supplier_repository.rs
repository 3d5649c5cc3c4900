use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::supplier::{Supplier, SupplierMovement, SupplierMovementKind, SupplierSummary};
use crate::models::trays::TrayCounts;
use crate::utils::errors::{map_unique_violation, AppResult};

/// Movimiento de proveedor a insertar
pub struct NewSupplierMovement<'a> {
    pub supplier_id: i32,
    pub kind: SupplierMovementKind,
    pub prior: TrayCounts,
    pub incoming: TrayCounts,
    pub outgoing: TrayCounts,
    pub final_balance: TrayCounts,
    pub notes: Option<&'a str>,
    pub recorded_by: &'a str,
}

pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Proveedores activos con el saldo de su último movimiento
    pub async fn list_active(&self) -> AppResult<Vec<SupplierSummary>> {
        let suppliers = sqlx::query_as::<_, SupplierSummary>(
            r#"
            SELECT s.id, s.name, s.product, s.created_at,
                   COALESCE(latest.final_large, 0) AS balance_large,
                   COALESCE(latest.final_small, 0) AS balance_small,
                   latest.moved_at AS last_movement_at
            FROM suppliers s
            LEFT JOIN LATERAL (
                SELECT sm.final_large, sm.final_small, sm.moved_at
                FROM supplier_movements sm
                WHERE sm.supplier_id = s.id
                ORDER BY sm.id DESC
                LIMIT 1
            ) latest ON TRUE
            WHERE s.active
            ORDER BY s.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    pub async fn find_active(&self, id: i32) -> AppResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, product, active, created_by, created_at FROM suppliers WHERE id = $1 AND active",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn create(&self, name: &str, product: &str, created_by: &str) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, product, active, created_by, created_at)
            VALUES ($1, $2, TRUE, $3, now())
            RETURNING id, name, product, active, created_by, created_at
            "#,
        )
        .bind(name)
        .bind(product)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, format!("Ya existe un proveedor activo llamado '{}'", name)))
    }

    pub async fn movements(&self, supplier_id: i32) -> AppResult<Vec<SupplierMovement>> {
        let movements = sqlx::query_as::<_, SupplierMovement>(
            r#"
            SELECT *
            FROM supplier_movements
            WHERE supplier_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Baja lógica; devuelve `false` si no estaba activo
    pub async fn deactivate(&self, id: i32, updated_by: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET active = FALSE, updated_by = $2, updated_at = now()
            WHERE id = $1 AND active
            "#,
        )
        .bind(id)
        .bind(updated_by)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Saldo final del último movimiento del proveedor
    pub async fn latest_balance<'e, E>(
        executor: E,
        supplier_id: i32,
    ) -> AppResult<Option<(TrayCounts, DateTime<Utc>)>>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, (i32, i32, DateTime<Utc>)>(
            r#"
            SELECT final_large, final_small, moved_at
            FROM supplier_movements
            WHERE supplier_id = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(|(large, small, moved_at)| (TrayCounts::new(large, small), moved_at)))
    }

    pub async fn lock_active(conn: &mut PgConnection, id: i32) -> AppResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, product, active, created_by, created_at
            FROM suppliers
            WHERE id = $1 AND active
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(supplier)
    }

    pub async fn insert_movement(
        conn: &mut PgConnection,
        movement: NewSupplierMovement<'_>,
    ) -> AppResult<SupplierMovement> {
        let created = sqlx::query_as::<_, SupplierMovement>(
            r#"
            INSERT INTO supplier_movements (
                supplier_id, kind, moved_at,
                prior_large, incoming_large, outgoing_large,
                prior_small, incoming_small, outgoing_small,
                final_large, final_small, notes, recorded_by
            )
            VALUES ($1, $2, clock_timestamp(), $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(movement.supplier_id)
        .bind(movement.kind.as_str())
        .bind(movement.prior.large)
        .bind(movement.incoming.large)
        .bind(movement.outgoing.large)
        .bind(movement.prior.small)
        .bind(movement.incoming.small)
        .bind(movement.outgoing.small)
        .bind(movement.final_balance.large)
        .bind(movement.final_balance.small)
        .bind(movement.notes)
        .bind(movement.recorded_by)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }
}
