use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use control_charolas::config::environment::EnvironmentConfig;
use control_charolas::controllers::auth_controller::ensure_bootstrap_admin;
use control_charolas::create_app;
use control_charolas::database::DatabaseConnection;
use control_charolas::state::AppState;

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("control_charolas=info,tower_http=info")),
        )
        .init();

    info!("📦 Control de Charolas - API");
    info!("============================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️ Entorno: {} (zona horaria {})", config.environment, config.business_timezone);

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    db_connection.run_migrations().await?;

    let pool = db_connection.pool().clone();

    match &config.bootstrap_admin {
        Some(admin) => {
            if let Err(e) = ensure_bootstrap_admin(pool.clone(), admin).await {
                error!("❌ No se pudo crear el administrador inicial: {}", e);
                return Err(anyhow::anyhow!("Error creando administrador inicial: {}", e));
            }
        }
        None => warn!("⚠️ BOOTSTRAP_ADMIN_USER no definido; no se crea administrador inicial"),
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(pool, config);

    // Limpieza periódica de sesiones expiradas
    let cleanup_state = app_state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            cleanup_state.cleanup_expired_sessions().await;
        }
    });

    let app = create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("🔐 Autenticación:");
    info!("   POST /auth/login - Iniciar sesión");
    info!("   POST /auth/logout - Cerrar sesión");
    info!("   GET  /auth/verify - Usuario de la sesión");
    info!("   GET  /check-session - Estado de la sesión");
    info!("   GET  /health - Health check");
    info!("👥 Clientes e inventario:");
    info!("   GET  /api/inventario - Inventario por cliente");
    info!("   GET  /api/inventario/resumen - Resumen de inventario");
    info!("   GET  /api/clientes - Listar clientes");
    info!("   POST /api/clientes - Registrar cliente");
    info!("   GET  /api/clientes/buscar?q= - Buscar clientes");
    info!("   GET  /api/clientes/:codigo/saldo-anterior - Último saldo");
    info!("   GET  /api/clientes/:codigo/historial - Historial");
    info!("   DELETE /api/clientes/:codigo - Eliminar cliente (admin)");
    info!("📦 Movimientos:");
    info!("   GET  /api/movimientos - Últimos movimientos");
    info!("   POST /api/movimientos - Registrar movimiento");
    info!("   DELETE /api/movimientos/:id - Eliminar movimiento (admin)");
    info!("🏬 Bodega:");
    info!("   GET  /api/bodega - Estado actual");
    info!("   POST /api/bodega/actualizar - Ajuste manual (admin)");
    info!("   GET  /api/bodega/historial - Historial");
    info!("🚚 Rutas y entregadores:");
    info!("   GET  /api/rutas - Listar rutas (?estado=&fecha=)");
    info!("   POST /api/rutas - Iniciar ruta");
    info!("   GET  /api/rutas/:id - Detalle");
    info!("   PUT  /api/rutas/:id - Actualizar nombre/observaciones");
    info!("   POST /api/rutas/:id/finalizar - Finalizar ruta");
    info!("   GET  /api/rutas/:id/movimientos - Movimientos de la ruta");
    info!("   DELETE /api/rutas/:id - Eliminar ruta (admin)");
    info!("   GET  /api/entregadores - Listar entregadores");
    info!("   POST /api/entregadores - Registrar entregador");
    info!("🏭 Proveedores:");
    info!("   GET  /api/proveedores - Listar proveedores");
    info!("   POST /api/proveedores - Registrar proveedor");
    info!("   GET  /api/proveedores/:id/movimientos - Movimientos");
    info!("   POST /api/proveedores/:id/movimientos - Registrar movimiento");
    info!("   GET  /api/proveedores/:id/saldo - Saldo actual");
    info!("   DELETE /api/proveedores/:id - Eliminar proveedor (admin)");
    info!("📊 GET  /api/estadisticas - Estadísticas del tablero");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el manejador de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
