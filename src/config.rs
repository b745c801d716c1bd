//! Carga y gestión de configuración del relay (servidor + backend).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use url::Url;

/// Configuración completa de la aplicación.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_addr: String,
    /// URL base del backend de búsqueda/resumen, sin `/` final.
    pub backend_url: String,
    /// Prefijo de las rutas que se reenvían al backend (p. ej. `/api`).
    pub api_prefix: String,
    pub frontend_dir: PathBuf,
    pub upstream_timeout: Duration,
    pub open_browser: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:3000".to_string(),
            backend_url: "http://127.0.0.1:8000".to_string(),
            api_prefix: "/api".to_string(),
            frontend_dir: PathBuf::from("frontend"),
            upstream_timeout: Duration::from_secs(120),
            open_browser: false,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT debe ser un número de puerto válido")?;

        let backend_url = env::var("BACKEND_URL")
            .or_else(|_| env::var("FASTAPI_URL"))
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let backend_url = normalize_backend_url(&backend_url)?;

        let api_prefix =
            normalize_prefix(&env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()))?;

        let frontend_dir =
            PathBuf::from(env::var("FRONTEND_DIR").unwrap_or_else(|_| "frontend".to_string()));

        let timeout_secs: u64 = env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse()
            .context("UPSTREAM_TIMEOUT_SECS debe ser un entero en segundos")?;

        let open_browser = env::var("OPEN_BROWSER")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            server_addr: format!("{host}:{port}"),
            backend_url,
            api_prefix,
            frontend_dir,
            upstream_timeout: Duration::from_secs(timeout_secs),
            open_browser,
        })
    }
}

/// Valida que la URL del backend sea http(s) y le quita la barra final.
pub fn normalize_backend_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim()).map_err(|e| anyhow!("BACKEND_URL inválida ({raw}): {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url.as_str().trim_end_matches('/').to_string()),
        other => Err(anyhow!("Esquema no soportado en BACKEND_URL: {other}")),
    }
}

/// Deja el prefijo con `/` inicial y sin `/` final.
/// La raíz no vale: el relay taparía el frontend y los sufijos perderían su `/`.
pub fn normalize_prefix(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(anyhow!("API_PREFIX no puede ser vacío ni `/`: {raw:?}"));
    }
    Ok(format!("/{trimmed}"))
}
