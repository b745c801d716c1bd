//! Relay `/api/*` → backend.
//!
//! Cada petición bajo el prefijo se reenvía una sola vez al backend con el mismo
//! método, la misma query y el cuerpo JSON. Las descargas de PDF se devuelven como
//! flujo de bytes con cabeceras propias; el resto se devuelve como JSON tal cual.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{app_state::AppState, models::DownloadFilename};

/// Fragmento de ruta que identifica la descarga del PDF generado.
const PDF_ENDPOINT: &str = "/download_pdf";

// --- Errores ---

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("El cuerpo de la petición no es JSON válido: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("El backend no respondió a tiempo")]
    Timeout,

    #[error("Error de conexión con el backend: {0}")]
    Transport(reqwest::Error),

    #[error("Respuesta del backend no es JSON: {0}")]
    Decode(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { status, .. } => *status,
            RelayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout
        } else {
            RelayError::Transport(err)
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!("Error en el relay ({}): {}", status, self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    let prefix = app_state.config.api_prefix.clone();
    Router::new()
        .route(&prefix, any(relay_handler))
        .route(&format!("{prefix}/*rest"), any(relay_handler))
        .with_state(app_state)
}

// --- Handler ---

#[axum::debug_handler]
async fn relay_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Result<Response, RelayError> {
    let suffix = uri
        .path()
        .strip_prefix(state.config.api_prefix.as_str())
        .unwrap_or_default();
    let target = upstream_url(&state.config.backend_url, suffix, uri.query());
    info!("Relay {} {} → {}", method, uri, target);

    let mut request = state
        .http
        .request(method.clone(), &target)
        .header(reqwest::header::CONTENT_TYPE, "application/json");

    if carries_body(&method) && !body.is_empty() {
        let payload: Value = serde_json::from_slice(&body)?;
        request = request.json(&payload);
    }

    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        warn!("El backend respondió {} para {}", status, target);
        return Err(RelayError::Upstream {
            status,
            message: upstream_message(status, &text),
        });
    }

    if suffix.contains(PDF_ENDPOINT) {
        let filename = uri
            .query()
            .and_then(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .find(|(key, _)| key == "filename")
                    .map(|(_, value)| value.into_owned())
            })
            .and_then(|raw| DownloadFilename::sanitize(&raw))
            .unwrap_or_else(DownloadFilename::fallback);
        return Ok(pdf_response(response, &filename));
    }

    // Sin cuerpo (p. ej. 204): se reenvía el estado tal cual.
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(status.into_response());
    }
    let payload: Value =
        serde_json::from_slice(&bytes).map_err(|e| RelayError::Decode(e.to_string()))?;
    Ok((status, Json(payload)).into_response())
}

// --- Utilidades ---

/// `backend + sufijo + ?query`.
pub fn upstream_url(backend: &str, suffix: &str, query: Option<&str>) -> String {
    let mut url = format!("{}{}", backend.trim_end_matches('/'), suffix);
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(q);
    }
    url
}

fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Mensaje a devolver cuando el backend falla: `detail` (FastAPI) o `error`, o el texto crudo.
fn upstream_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "error"] {
            match value.get(key) {
                Some(Value::String(s)) => return s.clone(),
                Some(other) if !other.is_null() => return other.to_string(),
                _ => {}
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("El backend respondió con estado {}", status.as_u16())
    } else {
        trimmed.to_string()
    }
}

fn pdf_response(upstream: reqwest::Response, filename: &DownloadFilename) -> Response {
    let disposition = HeaderValue::from_str(&filename.content_disposition())
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"report.pdf\""));

    let mut response = Body::from_stream(upstream.bytes_stream()).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    response
}
