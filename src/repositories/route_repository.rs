use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::models::route::{DeliveryRoute, RouteState};
use crate::models::trays::TrayCounts;
use crate::utils::errors::{map_unique_violation, AppResult};

/// Ruta nueva
pub struct NewRoute<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub courier_id: i32,
    pub courier_name: &'a str,
    pub started_at: DateTime<Utc>,
    pub starting: TrayCounts,
    pub notes: Option<&'a str>,
    pub recorded_by: &'a str,
}

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Listado con filtros opcionales de estado y fecha de inicio.
    /// La fecha se compara en la zona horaria `timezone`.
    pub async fn list(
        &self,
        state: Option<RouteState>,
        date: Option<NaiveDate>,
        timezone: &str,
    ) -> AppResult<Vec<DeliveryRoute>> {
        let routes = sqlx::query_as::<_, DeliveryRoute>(
            r#"
            SELECT *
            FROM delivery_routes
            WHERE ($1::text IS NULL OR state = $1)
              AND ($2::date IS NULL OR (started_at AT TIME ZONE $3)::date = $2)
            ORDER BY started_at DESC, id DESC
            "#,
        )
        .bind(state.map(|s| s.as_str()))
        .bind(date)
        .bind(timezone)
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<DeliveryRoute>> {
        let route = sqlx::query_as::<_, DeliveryRoute>("SELECT * FROM delivery_routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    /// Actualizar nombre u observaciones; los campos ausentes se conservan
    pub async fn update_details(
        &self,
        id: i32,
        name: Option<&str>,
        notes: Option<&str>,
    ) -> AppResult<Option<DeliveryRoute>> {
        let route = sqlx::query_as::<_, DeliveryRoute>(
            r#"
            UPDATE delivery_routes
            SET name = COALESCE($2, name),
                notes = COALESCE($3, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn lock(conn: &mut PgConnection, id: i32) -> AppResult<Option<DeliveryRoute>> {
        let route = sqlx::query_as::<_, DeliveryRoute>(
            "SELECT * FROM delivery_routes WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(route)
    }

    pub async fn code_exists(conn: &mut PgConnection, code: &str) -> AppResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM delivery_routes WHERE code = $1)")
                .bind(code)
                .fetch_one(&mut *conn)
                .await?;

        Ok(exists)
    }

    pub async fn insert(conn: &mut PgConnection, route: NewRoute<'_>) -> AppResult<DeliveryRoute> {
        sqlx::query_as::<_, DeliveryRoute>(
            r#"
            INSERT INTO delivery_routes (
                code, name, courier_id, courier_name, started_at,
                starting_large, starting_small, current_large, current_small,
                notes, state, recorded_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $6, $7, $8, $9, $10, now())
            RETURNING *
            "#,
        )
        .bind(route.code)
        .bind(route.name)
        .bind(route.courier_id)
        .bind(route.courier_name)
        .bind(route.started_at)
        .bind(route.starting.large)
        .bind(route.starting.small)
        .bind(route.notes)
        .bind(RouteState::Started.as_str())
        .bind(route.recorded_by)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_unique_violation(e, format!("El código de ruta '{}' ya existe", route.code)))
    }

    pub async fn set_current(conn: &mut PgConnection, id: i32, current: TrayCounts) -> AppResult<()> {
        sqlx::query("UPDATE delivery_routes SET current_large = $2, current_small = $3 WHERE id = $1")
            .bind(id)
            .bind(current.large)
            .bind(current.small)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Marcar la ruta como finalizada con lo que regresó a bodega
    pub async fn finish(conn: &mut PgConnection, id: i32, returned: TrayCounts) -> AppResult<DeliveryRoute> {
        let route = sqlx::query_as::<_, DeliveryRoute>(
            r#"
            UPDATE delivery_routes
            SET state = $2,
                finished_at = now(),
                returned_large = $3,
                returned_small = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(RouteState::Finished.as_str())
        .bind(returned.large)
        .bind(returned.small)
        .fetch_one(&mut *conn)
        .await?;

        Ok(route)
    }

    pub async fn delete(conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM delivery_routes WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
