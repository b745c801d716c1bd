//! Conversión de la respuesta del backend en elementos a mostrar.

use std::fmt;

use url::Url;

use crate::models::{Paper, SearchOutcome, Summary, SummaryContent};

/// Separador entre papers cuando el backend devuelve un único bloque de texto.
pub const TEXT_BLOCK_DELIMITER: &str = "--------------------------------------------------";

/// Marcas con las que el backend indica una búsqueda vacía o fallida en modo texto.
const EMPTY_RESULT_MARKERS: [&str; 2] = ["No papers found", "Unable to process"];

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    Paper(PaperCard),
    Text { index: usize, text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaperCard {
    pub index: usize,
    pub title: String,
    pub authors: String,
    pub published: String,
    pub category: String,
    /// Solo enlaces http(s); cualquier otro esquema se descarta.
    pub url: Option<String>,
    pub summary: SummaryContent,
}

impl PaperCard {
    fn from_paper(index: usize, paper: &Paper) -> Self {
        let authors = if paper.authors.is_empty() {
            "Unknown".to_string()
        } else {
            paper.authors.join(", ")
        };
        Self {
            index,
            title: paper.title.clone(),
            authors,
            published: paper.published.clone(),
            category: paper.category.clone(),
            url: link(&paper.url),
            summary: paper.summary.clone(),
        }
    }
}

fn link(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| raw.trim().to_string())
}

/// `true` si la respuesta no trae nada que mostrar.
pub fn is_empty_outcome(outcome: &SearchOutcome) -> bool {
    match outcome {
        SearchOutcome::Structured(r) => r.papers.is_empty(),
        SearchOutcome::TextBlock(r) => {
            r.result.trim().is_empty() || EMPTY_RESULT_MARKERS.iter().any(|m| r.result.contains(m))
        }
    }
}

pub fn display_items(outcome: &SearchOutcome) -> Vec<DisplayItem> {
    if is_empty_outcome(outcome) {
        return Vec::new();
    }
    match outcome {
        SearchOutcome::Structured(r) => r
            .papers
            .iter()
            .enumerate()
            .map(|(i, p)| DisplayItem::Paper(PaperCard::from_paper(i + 1, p)))
            .collect(),
        SearchOutcome::TextBlock(r) => r
            .result
            .split(TEXT_BLOCK_DELIMITER)
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .enumerate()
            .map(|(i, piece)| DisplayItem::Text {
                index: i + 1,
                text: piece.to_string(),
            })
            .collect(),
    }
}

impl fmt::Display for DisplayItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayItem::Text { index, text } => write!(f, "{index}. {text}"),
            DisplayItem::Paper(card) => {
                writeln!(f, "{}. {}", card.index, card.title)?;
                writeln!(f, "   Authors: {}", card.authors)?;
                if card.category.is_empty() {
                    writeln!(f, "   Published: {}", card.published)?;
                } else {
                    writeln!(f, "   Published: {} • {}", card.published, card.category)?;
                }
                if let Some(url) = &card.url {
                    writeln!(f, "   {url}")?;
                }
                match &card.summary {
                    SummaryContent::Text(text) if text.is_empty() => write!(f, "   TL;DR: No summary"),
                    SummaryContent::Text(text) => write!(f, "   {text}"),
                    SummaryContent::Structured(summary) => write_summary(f, summary),
                }
            }
        }
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, s: &Summary) -> fmt::Result {
    let tldr = if s.tldr.is_empty() { "No summary" } else { &s.tldr };
    write!(f, "   TL;DR: {tldr}")?;
    for (title, items) in [
        ("Key Contributions", &s.key_contributions),
        ("Methods", &s.methods),
        ("Results", &s.results),
    ] {
        if items.is_empty() {
            continue;
        }
        write!(f, "\n   {title}:")?;
        for item in items {
            write!(f, "\n     - {item}")?;
        }
    }
    if !s.why_it_matters.is_empty() {
        write!(f, "\n   Why it matters: {}", s.why_it_matters)?;
    }
    if !s.citation.is_empty() {
        write!(f, "\n   {}", s.citation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StructuredResult, TextBlockResult};

    fn text(result: &str) -> SearchOutcome {
        SearchOutcome::TextBlock(TextBlockResult {
            result: result.to_string(),
            pdf_filename: None,
        })
    }

    #[test]
    fn text_block_is_split_on_delimiter() {
        let blob = format!("Paper A\n{d}\n  \n{d}\nPaper B\n{d}", d = TEXT_BLOCK_DELIMITER);
        let items = display_items(&text(&blob));
        assert_eq!(
            items,
            vec![
                DisplayItem::Text { index: 1, text: "Paper A".into() },
                DisplayItem::Text { index: 2, text: "Paper B".into() },
            ]
        );
    }

    #[test]
    fn failure_markers_mean_empty() {
        assert!(is_empty_outcome(&text("No papers found for 'zzz'")));
        assert!(is_empty_outcome(&text("Unable to process the request")));
        assert!(display_items(&text("No papers found")).is_empty());
    }

    #[test]
    fn papers_are_numbered_and_authors_joined() {
        let outcome = SearchOutcome::Structured(StructuredResult {
            papers: vec![
                Paper {
                    title: "One".into(),
                    authors: vec!["Ada".into(), "Alan".into()],
                    published: "2024-05-01".into(),
                    category: "cs.RO".into(),
                    url: "http://arxiv.org/abs/1".into(),
                    summary: SummaryContent::Text("s".into()),
                },
                Paper {
                    title: "Two".into(),
                    authors: vec![],
                    published: String::new(),
                    category: String::new(),
                    url: String::new(),
                    summary: SummaryContent::default(),
                },
            ],
            query: None,
            pdf_filename: None,
        });
        let items = display_items(&outcome);
        assert_eq!(items.len(), 2);
        let DisplayItem::Paper(first) = &items[0] else { panic!("se esperaba un paper") };
        assert_eq!(first.index, 1);
        assert_eq!(first.authors, "Ada, Alan");
        let DisplayItem::Paper(second) = &items[1] else { panic!("se esperaba un paper") };
        assert_eq!(second.index, 2);
        assert_eq!(second.authors, "Unknown");
        assert!(items[1].to_string().contains("TL;DR: No summary"));
    }

    #[test]
    fn only_http_links_are_kept() {
        let paper = |url: &str| Paper {
            title: "T".into(),
            authors: vec![],
            published: String::new(),
            category: String::new(),
            url: url.into(),
            summary: SummaryContent::default(),
        };
        let card = |url: &str| PaperCard::from_paper(1, &paper(url));

        assert_eq!(card("https://arxiv.org/abs/1").url.as_deref(), Some("https://arxiv.org/abs/1"));
        assert_eq!(card(" http://arxiv.org/abs/2 ").url.as_deref(), Some("http://arxiv.org/abs/2"));
        for bad in ["javascript:alert(1)", "JavaScript:alert(1)", "data:text/html,x", "arxiv.org/abs/3", ""] {
            assert_eq!(card(bad).url, None, "{bad}");
        }
        let shown = DisplayItem::Paper(card("javascript:alert(1)")).to_string();
        assert!(!shown.contains("javascript"));
    }
}
