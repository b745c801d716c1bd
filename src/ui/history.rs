//! Historial de búsquedas de la sesión. Sólo en memoria; se pierde al recargar.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::models::SearchOutcome;

/// Entrada inmutable: se crea tras cada búsqueda correcta.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub query: String,
    pub snapshot: SearchOutcome,
    pub pdf_filename: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(query: &str, snapshot: SearchOutcome) -> Self {
        let pdf_filename = snapshot.pdf_filename().map(str::to_string);
        Self {
            id: Uuid::new_v4(),
            query: query.to_string(),
            snapshot,
            pdf_filename,
            timestamp: Local::now(),
        }
    }
}

/// La más reciente va primero.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prepend(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
