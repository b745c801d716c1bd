use crate::models::{SearchRequest, MAX_RESULTS_RANGE, MIN_QUERY_LEN};

use super::UiError;

/// Estado del formulario de búsqueda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub query: String,
    pub max_results: u32,
    pub generate_pdf: bool,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            query: "self-driving cars".to_string(),
            max_results: 3,
            generate_pdf: true,
        }
    }
}

impl SearchForm {
    pub fn new(query: impl Into<String>, max_results: u32, generate_pdf: bool) -> Self {
        Self {
            query: query.into(),
            max_results,
            generate_pdf,
        }
    }

    /// Validación previa al envío; nunca toca la red.
    pub fn validate(&self) -> Result<SearchRequest, UiError> {
        let query = self.query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(UiError::Validation(format!(
                "Query must be at least {MIN_QUERY_LEN} characters."
            )));
        }
        if !MAX_RESULTS_RANGE.contains(&self.max_results) {
            return Err(UiError::Validation(format!(
                "Max results must be between {} and {}.",
                MAX_RESULTS_RANGE.start(),
                MAX_RESULTS_RANGE.end()
            )));
        }
        Ok(SearchRequest {
            query: query.to_string(),
            max_results: self.max_results,
            generate_pdf: self.generate_pdf,
        })
    }
}
