use std::net::SocketAddr;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use repair_status_portal::build_router;
use repair_status_portal::config::environment::EnvironmentConfig;
use repair_status_portal::repositories::validate_schemas;
use repair_status_portal::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("repair_status_portal=debug,tower_http=info")),
        )
        .init();

    info!("🚗 Repair Status Portal");
    info!("================================================");

    let config = EnvironmentConfig::from_env().map_err(|e| {
        error!("❌ Configuración inválida: {}", e);
        anyhow::anyhow!("Error de configuración: {}", e)
    })?;

    if config.demo_mode {
        warn!("🎭 DEMO_MODE activo: datos de ejemplo en memoria");
    }

    let app_state = AppState::from_config(config).await?;

    // Validar la hoja antes de aceptar tráfico
    validate_schemas(app_state.tabular.as_ref()).await.map_err(|e| {
        error!("❌ La hoja no cumple el esquema esperado: {}", e);
        anyhow::anyhow!("Error de esquema: {}", e)
    })?;
    app_state.photos().ensure_photo_columns().await.map_err(|e| {
        error!("❌ Columnas de fotos no disponibles: {}", e);
        anyhow::anyhow!("Error de columnas de fotos: {}", e)
    })?;

    let addr: SocketAddr = app_state.config.server_url().parse()?;
    let app = build_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("👤 Portal del cliente:");
    info!("   POST /api/auth/verify - Verificar RO + contraseña");
    info!("   GET  /api/vehicle/:roNumber?password= - Datos del vehículo");
    info!("   GET  /api/status/:roNumber?password= - Etapa y mensaje");
    info!("   POST /api/messages/send - Mensaje al taller");
    info!("🔧 Panel del taller:");
    info!("   POST   /api/admin/auth - Login");
    info!("   GET    /api/admin/vehicles - Vehículos activos");
    info!("   POST   /api/admin/upload-photo - Subir foto de progreso");
    info!("   GET    /api/admin/cleanup-photos?days=7 - Fotos a limpiar");
    info!("   DELETE /api/admin/cleanup-photos?days=7 - Limpiar fotos antiguas");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
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
