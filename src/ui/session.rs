//! Sesión de búsqueda: una búsqueda en curso como máximo, respuestas etiquetadas
//! con un id creciente y un historial que sólo crece mientras dura la sesión.

use tracing::{debug, info, warn};

use crate::models::{SearchOutcome, SearchRequest};

use super::{
    client::filename_query,
    form::SearchForm,
    history::{History, HistoryEntry},
    view::{display_items, is_empty_outcome, DisplayItem},
    SearchBackend, UiError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
    Success,
    Error,
}

/// Identifica una búsqueda emitida. Sólo la del id más reciente puede tocar la pantalla.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub query: String,
}

pub struct SearchSession<B> {
    backend: B,
    api_prefix: String,
    phase: Phase,
    display: Vec<DisplayItem>,
    pdf_filename: Option<String>,
    error: Option<String>,
    history: History,
    last_id: u64,
    in_flight: Option<u64>,
}

impl<B: SearchBackend> SearchSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            api_prefix: "/api".to_string(),
            phase: Phase::Idle,
            display: Vec::new(),
            pdf_filename: None,
            error: None,
            history: History::new(),
            last_id: 0,
            in_flight: None,
        }
    }

    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = format!("/{}", prefix.trim_matches('/'));
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn display(&self) -> &[DisplayItem] {
        &self.display
    }

    pub fn pdf_filename(&self) -> Option<&str> {
        self.pdf_filename.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// El botón de búsqueda está deshabilitado mientras hay una en curso.
    pub fn can_submit(&self) -> bool {
        self.phase != Phase::Searching
    }

    /// `Idle|Success|Error → Searching`. No modifica nada si la validación falla.
    pub fn begin(&mut self, form: &SearchForm) -> Result<(Ticket, SearchRequest), UiError> {
        if !self.can_submit() {
            return Err(UiError::Busy);
        }
        let request = form.validate()?;

        self.last_id += 1;
        self.in_flight = Some(self.last_id);
        self.phase = Phase::Searching;
        self.error = None;

        let ticket = Ticket {
            id: self.last_id,
            query: request.query.clone(),
        };
        debug!("Búsqueda #{} iniciada: {}", ticket.id, ticket.query);
        Ok((ticket, request))
    }

    /// `Searching → Success|Error`. Devuelve `false` si la respuesta llega tarde y se descarta.
    pub fn complete(&mut self, ticket: Ticket, result: Result<SearchOutcome, UiError>) -> bool {
        if self.in_flight != Some(ticket.id) {
            debug!("Respuesta obsoleta de la búsqueda #{}, se ignora", ticket.id);
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(outcome) => {
                self.display = display_items(&outcome);
                self.pdf_filename = outcome.pdf_filename().map(str::to_string);
                info!(
                    "Búsqueda #{} completada con {} resultados",
                    ticket.id,
                    self.display.len()
                );
                self.history.prepend(HistoryEntry::new(&ticket.query, outcome));
                self.phase = Phase::Success;
            }
            Err(err) => {
                warn!("Búsqueda #{} fallida: {}", ticket.id, err);
                self.error = Some(err.user_message());
                self.phase = Phase::Error;
            }
        }
        true
    }

    /// Ciclo completo de una búsqueda contra el backend.
    pub async fn submit(&mut self, form: &SearchForm) -> Result<(), UiError> {
        let (ticket, request) = self.begin(form)?;
        let result = self.backend.search(&request).await;
        let failure = result.as_ref().err().cloned();
        self.complete(ticket, result);
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// El usuario abandona la vista: la búsqueda en curso ya no podrá actualizar nada.
    pub fn abandon(&mut self) {
        if self.in_flight.take().is_some() {
            self.phase = Phase::Idle;
        }
    }

    /// Restaura una entrada del historial sin tocar la red.
    pub fn select_history(&mut self, index: usize) -> bool {
        let Some(entry) = self.history.get(index) else {
            return false;
        };
        if is_empty_outcome(&entry.snapshot) {
            self.display.clear();
            self.pdf_filename = None;
        } else {
            self.display = display_items(&entry.snapshot);
            self.pdf_filename = entry.pdf_filename.clone();
        }
        true
    }

    /// Enlace relativo de descarga del PDF actual, si lo hay.
    pub fn download_url(&self) -> Option<String> {
        self.pdf_filename
            .as_deref()
            .map(|name| format!("{}/download_pdf?{}", self.api_prefix, filename_query(name)))
    }
}
