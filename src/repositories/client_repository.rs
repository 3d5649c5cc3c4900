use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::client::{Client, InventoryRow, InventorySummary};
use crate::models::trays::TrayCounts;
use crate::utils::errors::{map_unique_violation, AppResult};
use crate::utils::validation::contains_pattern;

/// Datos de un cliente nuevo
pub struct NewClient<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub establishment: Option<&'a str>,
    pub salesperson: Option<&'a str>,
    pub municipality: Option<&'a str>,
    pub created_by: &'a str,
}

/// Último saldo reportado de un cliente
#[derive(Debug, Clone, Copy)]
pub struct LatestBalance {
    pub balance: TrayCounts,
    pub moved_at: DateTime<Utc>,
}

// Último movimiento por cliente
const LATEST_MOVEMENT: &str = r#"
    LEFT JOIN LATERAL (
        SELECT m.prior_large, m.prior_small, m.reported_large, m.reported_small
        FROM client_movements m
        WHERE m.client_code = c.code
        ORDER BY m.id DESC
        LIMIT 1
    ) latest ON TRUE
"#;

pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, code: &str) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Búsqueda por código, nombre o establecimiento (máximo 10)
    pub async fn search(&self, term: &str) -> AppResult<Vec<Client>> {
        let pattern = contains_pattern(term);
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT *
            FROM clients
            WHERE active
              AND (code ILIKE $1 ESCAPE '\' OR name ILIKE $1 ESCAPE '\' OR establishment ILIKE $1 ESCAPE '\')
            ORDER BY name
            LIMIT 10
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn inventory(&self) -> AppResult<Vec<InventoryRow>> {
        let query = format!(
            r#"
            SELECT c.code, c.name, c.establishment, c.salesperson, c.municipality,
                   COALESCE(latest.prior_large, 0) AS prior_large,
                   COALESCE(latest.prior_small, 0) AS prior_small,
                   COALESCE(totals.dropped_large, 0) AS total_dropped_large,
                   COALESCE(totals.picked_large, 0) AS total_picked_large,
                   COALESCE(totals.dropped_small, 0) AS total_dropped_small,
                   COALESCE(totals.picked_small, 0) AS total_picked_small,
                   COALESCE(latest.reported_large, 0) AS balance_large,
                   COALESCE(latest.reported_small, 0) AS balance_small,
                   (COALESCE(latest.reported_large, 0) + COALESCE(latest.reported_small, 0))::bigint AS balance_total
            FROM clients c
            {latest}
            LEFT JOIN (
                SELECT client_code,
                       SUM(dropped_large)::bigint AS dropped_large,
                       SUM(picked_large)::bigint AS picked_large,
                       SUM(dropped_small)::bigint AS dropped_small,
                       SUM(picked_small)::bigint AS picked_small
                FROM client_movements
                GROUP BY client_code
            ) totals ON totals.client_code = c.code
            WHERE c.active
            ORDER BY c.name
            "#,
            latest = LATEST_MOVEMENT
        );

        let rows = sqlx::query_as::<_, InventoryRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn inventory_summary(&self) -> AppResult<InventorySummary> {
        let query = format!(
            r#"
            SELECT COUNT(*)::bigint AS total_clients,
                   COALESCE(SUM(COALESCE(latest.reported_large, 0) + COALESCE(latest.reported_small, 0)), 0)::bigint AS total_trays,
                   (COUNT(*) FILTER (
                       WHERE COALESCE(latest.reported_large, 0) + COALESCE(latest.reported_small, 0) > 0
                   ))::bigint AS clients_with_trays
            FROM clients c
            {latest}
            WHERE c.active
            "#,
            latest = LATEST_MOVEMENT
        );

        let summary = sqlx::query_as::<_, InventorySummary>(&query)
            .fetch_one(&self.pool)
            .await?;

        Ok(summary)
    }

    /// Último saldo reportado; `None` si el cliente no tiene movimientos.
    /// Los movimientos se insertan con el cliente bloqueado, así que el `id`
    /// sigue el orden de commit; `moved_at` no.
    pub async fn latest_balance<'e, E>(executor: E, code: &'e str) -> AppResult<Option<LatestBalance>>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query_as::<_, (i32, i32, DateTime<Utc>)>(
            r#"
            SELECT reported_large, reported_small, moved_at
            FROM client_movements
            WHERE client_code = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(|(large, small, moved_at)| LatestBalance {
            balance: TrayCounts::new(large, small),
            moved_at,
        }))
    }

    /// Bloquear un cliente activo hasta el fin de la transacción
    pub async fn lock_active(conn: &mut PgConnection, code: &str) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE code = $1 AND active FOR UPDATE",
        )
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(client)
    }

    pub async fn insert(conn: &mut PgConnection, client: NewClient<'_>) -> AppResult<Client> {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (code, name, establishment, salesperson, municipality, active, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6, now())
            RETURNING *
            "#,
        )
        .bind(client.code)
        .bind(client.name)
        .bind(client.establishment)
        .bind(client.salesperson)
        .bind(client.municipality)
        .bind(client.created_by)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_unique_violation(e, format!("El código de cliente '{}' ya existe", client.code)))
    }

    pub async fn movement_count(conn: &mut PgConnection, code: &str) -> AppResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM client_movements WHERE client_code = $1")
                .bind(code)
                .fetch_one(&mut *conn)
                .await?;

        Ok(count)
    }

    pub async fn delete(conn: &mut PgConnection, code: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM clients WHERE code = $1")
            .bind(code)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
