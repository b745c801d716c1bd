//! Modelos de dominio (peticiones de búsqueda, papers y nombres de fichero PDF).
//!
//! El relay trata las respuestas del backend como JSON opaco; estos tipos los usa
//! la capa de UI para interpretarlas.

use serde::{Deserialize, Serialize};

/// Longitud mínima de la consulta (en caracteres, tras recortar espacios).
pub const MIN_QUERY_LEN: usize = 3;
/// Rango de resultados que admite el formulario.
pub const MAX_RESULTS_RANGE: std::ops::RangeInclusive<u32> = 1..=10;
/// Nombre usado cuando el backend no aporta uno válido.
pub const DEFAULT_PDF_FILENAME: &str = "report.pdf";

/// Cuerpo de `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub generate_pdf: bool,
}

/// Resumen estructurado que genera el backend para cada paper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub tldr: String,
    pub key_contributions: Vec<String>,
    pub methods: Vec<String>,
    pub results: Vec<String>,
    pub why_it_matters: String,
    pub citation: String,
}

/// El resumen puede llegar como objeto estructurado o como texto libre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryContent {
    Structured(Summary),
    Text(String),
}

impl Default for SummaryContent {
    fn default() -> Self {
        SummaryContent::Text(String::new())
    }
}

/// Un paper devuelto por el backend (PaperSummary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub summary: SummaryContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    pub papers: Vec<Paper>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default)]
    pub pdf_filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlockResult {
    pub result: String,
    #[serde(default)]
    pub pdf_filename: Option<String>,
}

/// Las dos formas de respuesta de `/search`. Se intenta primero la estructurada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Structured(StructuredResult),
    TextBlock(TextBlockResult),
}

impl SearchOutcome {
    pub fn pdf_filename(&self) -> Option<&str> {
        let name = match self {
            SearchOutcome::Structured(r) => r.pdf_filename.as_deref(),
            SearchOutcome::TextBlock(r) => r.pdf_filename.as_deref(),
        };
        name.filter(|n| !n.trim().is_empty())
    }
}

/// Nombre de fichero saneado, apto para la cabecera `Content-Disposition`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFilename(String);

impl DownloadFilename {
    /// Se queda con el último componente de la ruta (`/` y `\` cuentan como separador),
    /// sin espacios alrededor, comillas ni caracteres de control.
    /// Devuelve `None` si no queda un nombre utilizable.
    pub fn sanitize(raw: &str) -> Option<Self> {
        let unified = raw.replace('\\', "/");
        let base = unified.trim().split('/').filter(|s| !s.is_empty()).last()?;

        let cleaned: String = base
            .chars()
            .filter(|c| !c.is_control() && *c != '"')
            .collect();
        let cleaned = cleaned.trim();

        if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
            return None;
        }
        Some(Self(cleaned.to_string()))
    }

    pub fn fallback() -> Self {
        Self(DEFAULT_PDF_FILENAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Valor completo de la cabecera. Los caracteres no ASCII se sustituyen por `_`.
    pub fn content_disposition(&self) -> String {
        let ascii: String = self
            .0
            .chars()
            .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
            .collect();
        format!("attachment; filename=\"{ascii}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sanitized(raw: &str) -> Option<String> {
        DownloadFilename::sanitize(raw).map(|f| f.as_str().to_string())
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitized("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitized("..\\..\\windows\\win.ini").as_deref(), Some("win.ini"));
        assert_eq!(sanitized("reports/2024/summary.pdf").as_deref(), Some("summary.pdf"));
        assert_eq!(sanitized("  report.pdf  ").as_deref(), Some("report.pdf"));
        assert_eq!(sanitized("dir/ spaced.pdf ").as_deref(), Some("spaced.pdf"));
        assert_eq!(sanitized("folder/").as_deref(), Some("folder"));
    }

    #[test]
    fn sanitize_blocks_header_injection() {
        let name = sanitized("a\"b\r\nSet-Cookie: x=1.pdf").unwrap();
        assert!(!name.contains('"'));
        assert!(!name.contains('\r') && !name.contains('\n'));
    }

    #[test]
    fn sanitize_rejects_empty_and_dot_names() {
        assert_eq!(sanitized(""), None);
        assert_eq!(sanitized("   "), None);
        assert_eq!(sanitized("///"), None);
        assert_eq!(sanitized(".."), None);
        assert_eq!(sanitized("../."), None);
    }

    #[test]
    fn content_disposition_is_ascii() {
        let name = DownloadFilename::sanitize("résumé.pdf").unwrap();
        assert_eq!(name.content_disposition(), "attachment; filename=\"r_sum_.pdf\"");
        assert_eq!(
            DownloadFilename::fallback().content_disposition(),
            "attachment; filename=\"report.pdf\""
        );
    }

    #[test]
    fn structured_outcome_is_preferred() {
        let payload = json!({
            "query": "llm agents",
            "papers": [{
                "title": "Agents",
                "authors": ["Ada", "Alan"],
                "published": "2024-01-01",
                "category": "cs.AI",
                "url": "http://arxiv.org/abs/1",
                "summary": {"tldr": "short", "methods": ["m1"]}
            }],
            "pdf_filename": "agents.pdf"
        });
        let outcome: SearchOutcome = serde_json::from_value(payload).unwrap();
        let SearchOutcome::Structured(result) = &outcome else {
            panic!("se esperaba el resultado estructurado");
        };
        assert_eq!(result.papers.len(), 1);
        match &result.papers[0].summary {
            SummaryContent::Structured(s) => {
                assert_eq!(s.tldr, "short");
                assert_eq!(s.methods, vec!["m1".to_string()]);
                assert!(s.results.is_empty());
            }
            other => panic!("resumen inesperado: {other:?}"),
        }
        assert_eq!(outcome.pdf_filename(), Some("agents.pdf"));
    }

    #[test]
    fn text_block_outcome_and_plain_summary() {
        let outcome: SearchOutcome =
            serde_json::from_value(json!({"result": "a\n---\nb", "pdf_filename": null})).unwrap();
        assert!(matches!(outcome, SearchOutcome::TextBlock(_)));
        assert_eq!(outcome.pdf_filename(), None);

        let paper: Paper = serde_json::from_value(json!({
            "title": "Plain", "authors": [], "published": "", "url": "", "summary": "texto"
        }))
        .unwrap();
        assert_eq!(paper.summary, SummaryContent::Text("texto".to_string()));
    }

    #[test]
    fn unknown_shape_is_rejected() {
        assert!(serde_json::from_value::<SearchOutcome>(json!({"detail": "nope"})).is_err());
    }
}
