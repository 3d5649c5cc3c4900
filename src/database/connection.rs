//! Conexión a PostgreSQL
//!
//! Crea el pool de conexiones, ejecuta las migraciones embebidas y
//! verifica que la base de datos responda.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::config::database::{mask_database_url, DatabaseConfig};

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Conectar usando `DATABASE_URL`
    pub async fn new_default() -> Result<Self> {
        let config = DatabaseConfig::from_env()?;
        Self::new(&config).await
    }

    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("🔌 Conectando a la base de datos: {}", mask_database_url(&config.url));
        let pool = config.create_pool().await?;
        info!("✅ Pool de conexiones creado (máximo {} conexiones)", config.max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ejecutar migraciones de la base de datos
    pub async fn run_migrations(&self) -> Result<()> {
        info!("🗄️ Ejecutando migraciones...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("✅ Migraciones aplicadas");
        Ok(())
    }
}

/// Verificar que la conexión funciona
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
