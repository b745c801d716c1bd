//! Modelo de la interfaz de búsqueda: formulario, resultados, historial y la
//! máquina de estados `Idle → Searching → {Success, Error}`.
//!
//! La página web de `frontend/` sigue el mismo flujo; aquí queda como código
//! testeable que usa el cliente de terminal.

pub mod client;
pub mod form;
pub mod history;
pub mod session;
pub mod view;

use thiserror::Error;

pub use client::{RelayClient, SearchBackend};
pub use form::SearchForm;
pub use history::{History, HistoryEntry};
pub use session::{Phase, SearchSession, Ticket};
pub use view::DisplayItem;

/// Mensaje genérico cuando el backend no da uno.
pub const GENERIC_SEARCH_ERROR: &str = "Failed to fetch papers";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("{0}")]
    Validation(String),

    #[error("Ya hay una búsqueda en curso")]
    Busy,

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("El servidor no respondió a tiempo")]
    Timeout,

    #[error("{0}")]
    Transport(String),

    #[error("Respuesta con forma desconocida: {0}")]
    Decode(String),
}

impl UiError {
    /// Lo que ve el usuario: el mensaje del cuerpo de la respuesta o el genérico.
    /// El detalle técnico queda en el log.
    pub fn user_message(&self) -> String {
        match self {
            UiError::Validation(msg) => msg.clone(),
            UiError::Upstream { message, .. } => message.clone(),
            _ => GENERIC_SEARCH_ERROR.to_string(),
        }
    }
}

impl From<reqwest::Error> for UiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UiError::Timeout
        } else {
            UiError::Transport(err.to_string())
        }
    }
}
