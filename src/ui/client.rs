//! Acceso a red de la UI: siempre contra el relay, nunca directamente al backend.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::models::{SearchOutcome, SearchRequest};

use super::{UiError, GENERIC_SEARCH_ERROR};

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, UiError>;
}

/// Cliente HTTP contra `<relay>/<prefijo>`.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: Client,
    api_base: String,
}

impl RelayClient {
    pub fn new(http: Client, relay_url: &Url, api_prefix: &str) -> Self {
        let api_base = format!(
            "{}/{}",
            relay_url.as_str().trim_end_matches('/'),
            api_prefix.trim_matches('/')
        );
        Self { http, api_base }
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.api_base)
    }

    pub fn download_url(&self, filename: &str) -> String {
        format!("{}/download_pdf?{}", self.api_base, filename_query(filename))
    }

    /// Descarga el PDF generado por el relay.
    pub async fn download_pdf(&self, filename: &str) -> Result<Response, UiError> {
        let response = self.http.get(self.download_url(filename)).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl SearchBackend for RelayClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, UiError> {
        debug!("POST {} ({:?})", self.search_url(), request);
        let response = self.http.post(self.search_url()).json(request).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| UiError::Decode(e.to_string()))
    }
}

pub fn filename_query(filename: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("filename", filename)
        .finish()
}

async fn error_from_response(response: Response) -> UiError {
    let status = response.status().as_u16();
    let body = response.bytes().await.unwrap_or_default();
    UiError::Upstream {
        status,
        message: error_message(&body),
    }
}

/// Un único mensaje visible: `error` (relay) o `detail` (backend), o el genérico.
pub fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "detail"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_SEARCH_ERROR.to_string())
}
