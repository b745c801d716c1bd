use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::AppConfig;

/// Estado compartido entre handlers. Inmutable: el relay no guarda nada entre peticiones.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub http: Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .context("Error construyendo el cliente HTTP hacia el backend")?;
        Ok(Self { config, http })
    }
}
