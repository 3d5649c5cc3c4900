use sqlx::{PgConnection, PgPool};

use crate::models::courier::Courier;
use crate::utils::errors::{map_unique_violation, AppResult};

pub struct CourierRepository {
    pool: PgPool,
}

impl CourierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> AppResult<Vec<Courier>> {
        let couriers = sqlx::query_as::<_, Courier>(
            "SELECT * FROM couriers WHERE active ORDER BY first_name, last_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(couriers)
    }

    pub async fn find_active(conn: &mut PgConnection, id: i32) -> AppResult<Option<Courier>> {
        let courier = sqlx::query_as::<_, Courier>("SELECT * FROM couriers WHERE id = $1 AND active")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(courier)
    }

    /// Código del último entregador registrado
    pub async fn last_code(conn: &mut PgConnection) -> AppResult<Option<String>> {
        let code: Option<(String,)> =
            sqlx::query_as("SELECT code FROM couriers ORDER BY id DESC LIMIT 1")
                .fetch_optional(&mut *conn)
                .await?;

        Ok(code.map(|(code,)| code))
    }

    pub async fn insert(
        conn: &mut PgConnection,
        code: &str,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
        created_by: &str,
    ) -> AppResult<Courier> {
        sqlx::query_as::<_, Courier>(
            r#"
            INSERT INTO couriers (code, first_name, last_name, phone, active, created_by, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5, now())
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .bind(created_by)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_unique_violation(e, format!("El código de entregador '{}' ya existe", code)))
    }
}
