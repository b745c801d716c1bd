//! Relay HTTP para el buscador de papers de arXiv.
//!
//! - `/api/*` se reenvía al backend de búsqueda/resumen ([`api`]).
//! - Todo lo demás sirve el frontend estático con fallback de SPA ([`spa`]).
//! - [`ui`] modela el flujo de búsqueda del cliente (formulario, resultados, historial).

pub mod api;
pub mod app_state;
pub mod config;
pub mod models;
pub mod shutdown;
pub mod spa;
pub mod ui;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::app_state::AppState;

/// Router completo: relay bajo el prefijo y frontend para el resto.
pub fn build_router(app_state: AppState) -> Router {
    let frontend_dir = app_state.config.frontend_dir.clone();
    api::create_router(app_state)
        .merge(spa::create_router(&frontend_dir))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
