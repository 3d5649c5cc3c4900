use sqlx::{PgConnection, PgPool};

use crate::models::movement::{ClientMovement, MovementListRow};
use crate::models::trays::TrayCounts;
use crate::utils::errors::AppResult;

/// Movimiento de cliente a insertar
pub struct NewMovement<'a> {
    pub client_code: &'a str,
    pub route_id: Option<i32>,
    pub prior: TrayCounts,
    pub dropped: TrayCounts,
    pub picked: TrayCounts,
    pub reported: TrayCounts,
    pub verified: bool,
    pub recorded_by: &'a str,
}

// Movimientos con datos de cliente y ruta
const SELECT_LIST_ROWS: &str = r#"
    SELECT m.id, m.client_code, c.name AS client_name, c.establishment,
           m.route_id, r.code AS route_code, r.courier_name,
           m.moved_at,
           m.prior_large, m.dropped_large, m.picked_large, m.reported_large,
           m.prior_small, m.dropped_small, m.picked_small, m.reported_small,
           (m.dropped_large + m.dropped_small) - (m.picked_large + m.picked_small) AS difference,
           m.verified, m.recorded_by
    FROM client_movements m
    JOIN clients c ON c.code = m.client_code
    LEFT JOIN delivery_routes r ON r.id = m.route_id
"#;

pub struct MovementRepository {
    pool: PgPool,
}

impl MovementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn recent(&self, limit: i64) -> AppResult<Vec<MovementListRow>> {
        let query = format!("{} ORDER BY m.id DESC LIMIT $1", SELECT_LIST_ROWS);
        let rows = sqlx::query_as::<_, MovementListRow>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Historial de un cliente, del más reciente al más antiguo
    pub async fn by_client(&self, client_code: &str) -> AppResult<Vec<MovementListRow>> {
        let query = format!(
            "{} WHERE m.client_code = $1 ORDER BY m.id DESC",
            SELECT_LIST_ROWS
        );
        let rows = sqlx::query_as::<_, MovementListRow>(&query)
            .bind(client_code)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Movimientos de una ruta en orden de registro
    pub async fn by_route(&self, route_id: i32) -> AppResult<Vec<MovementListRow>> {
        let query = format!("{} WHERE m.route_id = $1 ORDER BY m.id", SELECT_LIST_ROWS);
        let rows = sqlx::query_as::<_, MovementListRow>(&query)
            .bind(route_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn insert(conn: &mut PgConnection, movement: NewMovement<'_>) -> AppResult<ClientMovement> {
        let created = sqlx::query_as::<_, ClientMovement>(
            r#"
            INSERT INTO client_movements (
                client_code, route_id, moved_at,
                prior_large, dropped_large, picked_large, reported_large,
                prior_small, dropped_small, picked_small, reported_small,
                verified, recorded_by
            )
            VALUES ($1, $2, clock_timestamp(), $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(movement.client_code)
        .bind(movement.route_id)
        .bind(movement.prior.large)
        .bind(movement.dropped.large)
        .bind(movement.picked.large)
        .bind(movement.reported.large)
        .bind(movement.prior.small)
        .bind(movement.dropped.small)
        .bind(movement.picked.small)
        .bind(movement.reported.small)
        .bind(movement.verified)
        .bind(movement.recorded_by)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    pub async fn lock(conn: &mut PgConnection, id: i32) -> AppResult<Option<ClientMovement>> {
        let movement = sqlx::query_as::<_, ClientMovement>(
            "SELECT * FROM client_movements WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(movement)
    }

    pub async fn delete(conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM client_movements WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_route(conn: &mut PgConnection, route_id: i32) -> AppResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM client_movements WHERE route_id = $1")
                .bind(route_id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(count)
    }
}
