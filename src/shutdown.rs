//! Señales de cierre para `axum::serve(..).with_graceful_shutdown(..)`.

use std::future::Future;
use std::io;

use tokio::signal;
use tracing::{info, warn};

/// Espera Ctrl+C o SIGTERM, lo que llegue antes.
pub async fn shutdown_signal() {
    let ctrl_c = wait_for("Ctrl+C", signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                let received = async move {
                    sig.recv().await;
                    Ok::<(), io::Error>(())
                };
                wait_for("SIGTERM", received).await
            }
            Err(e) => {
                warn!("No se pudo instalar el manejador de SIGTERM: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Termina cuando llega la señal. Si el manejador falla no se cierra nada:
/// queda pendiente para que decida la otra señal.
pub async fn wait_for<F>(name: &str, signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("{name} recibido, iniciando cierre del servidor."),
        Err(e) => {
            warn!("No se pudo instalar el manejador de {name}: {e}");
            std::future::pending::<()>().await
        }
    }
}
