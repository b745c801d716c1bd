use anyhow::{Context, Result};
use arxiv_relay::{app_state::AppState, build_router, config::AppConfig, shutdown::shutdown_signal};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Cargar .env e inicializar logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. Cargar configuración
    let cfg = AppConfig::from_env().context("Error al cargar la configuración")?;
    info!(
        "Backend: {} | prefijo: {} | frontend: {}",
        cfg.backend_url,
        cfg.api_prefix,
        cfg.frontend_dir.display()
    );

    // 3. Estado compartido y router
    let app_state = AppState::new(cfg)?;
    let server_addr = app_state.config.server_addr.clone();
    let open_browser = app_state.config.open_browser;
    let app = build_router(app_state);

    // 4. Iniciar el servidor
    let listener = TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("No se pudo escuchar en {server_addr}"))?;
    let server_url = format!("http://{}", server_addr);
    info!("🚀 Servidor escuchando en {}", &server_url);

    if open_browser && webbrowser::open(&server_url).is_err() {
        info!("No se pudo abrir el navegador. Por favor, accede a {} manualmente.", server_url);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("✅ Servidor cerrado correctamente.");
    Ok(())
}
