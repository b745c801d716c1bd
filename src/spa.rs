//! Ficheros estáticos del frontend y fallback de SPA.
//!
//! Lo que no es un asset ni cae bajo el prefijo del relay recibe el `index.html`
//! para que el enrutado del cliente se encargue. Sin frontend compilado se
//! devuelve un texto de aviso.

use std::path::{Path, PathBuf};

use axum::{
    handler::HandlerWithoutStateExt,
    response::{Html, IntoResponse, Response},
    Router,
};
use tower_http::services::ServeDir;
use tracing::debug;

pub const PLACEHOLDER: &str = "Frontend not built yet.";

/// Router que sólo tiene fallback: assets de `frontend_dir` y, si no existen, `index.html`.
pub fn create_router(frontend_dir: &Path) -> Router {
    let index = frontend_dir.join("index.html");
    let fallback = move || spa_index(index.clone());
    Router::new().fallback_service(ServeDir::new(frontend_dir).fallback(fallback.into_service()))
}

// El index se busca en cada petición: un frontend compilado después del arranque también vale.
async fn spa_index(index: PathBuf) -> Response {
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => {
            debug!("No existe {}, se sirve el aviso", index.display());
            PLACEHOLDER.into_response()
        }
    }
}
