use sqlx::{PgConnection, PgPool};

use crate::models::trays::TrayCounts;
use crate::models::warehouse::{WarehouseHistoryEntry, WarehouseState};
use crate::utils::errors::{AppError, AppResult};

const SELECT_STATE: &str = r#"
    SELECT large, small, notes, updated_by, updated_at, version
    FROM warehouse_state
    WHERE id = 1
"#;

pub struct WarehouseRepository {
    pool: PgPool,
}

impl WarehouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn current(&self) -> AppResult<WarehouseState> {
        sqlx::query_as::<_, WarehouseState>(SELECT_STATE)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(missing_state)
    }

    pub async fn history(&self, limit: i64) -> AppResult<Vec<WarehouseHistoryEntry>> {
        let entries = sqlx::query_as::<_, WarehouseHistoryEntry>(
            r#"
            SELECT id, version, large, small, notes, updated_by, updated_at
            FROM warehouse_history
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Leer el estado dentro de una transacción. No bloquea la fila: la
    /// escritura posterior valida la versión leída.
    pub async fn read(conn: &mut PgConnection) -> AppResult<WarehouseState> {
        sqlx::query_as::<_, WarehouseState>(SELECT_STATE)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(missing_state)
    }

    /// Reemplazar el estado de bodega si sigue en `expected_version`.
    ///
    /// El estado reemplazado se guarda en `warehouse_history`. Si otra
    /// transacción escribió primero no se actualiza ninguna fila y se
    /// devuelve `Conflict`; el llamador debe descartar su transacción.
    pub async fn supersede(
        conn: &mut PgConnection,
        expected_version: i64,
        counts: TrayCounts,
        notes: Option<&str>,
        updated_by: &str,
    ) -> AppResult<WarehouseState> {
        sqlx::query(
            r#"
            INSERT INTO warehouse_history (version, large, small, notes, updated_by, updated_at)
            SELECT version, large, small, notes, updated_by, updated_at
            FROM warehouse_state
            WHERE id = 1 AND version = $1
            "#,
        )
        .bind(expected_version)
        .execute(&mut *conn)
        .await?;

        let updated = sqlx::query_as::<_, WarehouseState>(
            r#"
            UPDATE warehouse_state
            SET large = $2,
                small = $3,
                notes = $4,
                updated_by = $5,
                updated_at = now(),
                version = version + 1
            WHERE id = 1 AND version = $1
            RETURNING large, small, notes, updated_by, updated_at, version
            "#,
        )
        .bind(expected_version)
        .bind(counts.large)
        .bind(counts.small)
        .bind(notes)
        .bind(updated_by)
        .fetch_optional(&mut *conn)
        .await?;

        updated.ok_or_else(|| {
            tracing::warn!("⚠️ Bodega modificada concurrentemente (versión esperada {})", expected_version);
            AppError::Conflict(
                "La bodega fue modificada por otra operación. Intente de nuevo.".to_string(),
            )
        })
    }
}

fn missing_state() -> AppError {
    AppError::Internal("Estado de bodega no inicializado".to_string())
}
