//! Named endpoints and the policy that picks one for the active query mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{FullBookQuery, QueryPayload, QuestionQuery, SelectedTextQuery};
use crate::core::constants::{DEFAULT_MAX_RESULTS, DEFAULT_TEMPERATURE, PLACEHOLDER_URL};

/// Which corpus a question is answered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// The whole book.
    #[default]
    Full,
    /// A user-highlighted excerpt.
    Selected,
}

impl QueryMode {
    pub const ALL: [QueryMode; 2] = [QueryMode::Full, QueryMode::Selected];

    pub fn as_str(self) -> &'static str {
        match self {
            QueryMode::Full => "full",
            QueryMode::Selected => "selected",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QueryMode::Full => "Full book",
            QueryMode::Selected => "Selected text",
        }
    }

    pub fn next(self) -> Self {
        match self {
            QueryMode::Full => QueryMode::Selected,
            QueryMode::Selected => QueryMode::Full,
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" | "full-book" | "book" => Ok(QueryMode::Full),
            "selected" | "selected-text" | "selection" => Ok(QueryMode::Selected),
            other => Err(format!(
                "unknown query mode '{other}' (expected 'full' or 'selected')"
            )),
        }
    }
}

/// Body layout an endpoint expects, and where its answer lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestShape {
    FullBook,
    SelectedText,
    Question,
}

impl RequestShape {
    pub fn reply_field(self) -> &'static str {
        match self {
            RequestShape::FullBook | RequestShape::SelectedText => "response",
            RequestShape::Question => "answer",
        }
    }

    /// Modes served when an endpoint does not list any explicitly.
    pub fn default_modes(self) -> &'static [QueryMode] {
        match self {
            RequestShape::FullBook => &[QueryMode::Full],
            RequestShape::SelectedText => &[QueryMode::Selected],
            RequestShape::Question => &QueryMode::ALL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub url: String,
    pub shape: RequestShape,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modes: Vec<QueryMode>,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>, shape: RequestShape) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            shape,
            modes: Vec::new(),
        }
    }

    pub fn serves(&self, mode: QueryMode) -> bool {
        if self.modes.is_empty() {
            self.shape.default_modes().contains(&mode)
        } else {
            self.modes.contains(&mode)
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.url.trim() == PLACEHOLDER_URL
    }
}

/// Request parameters that accompany every query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub book_id: Option<String>,
    pub max_results: u32,
    pub temperature: f64,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            book_id: None,
            max_results: DEFAULT_MAX_RESULTS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Immutable routing state for one session: the first endpoint that serves
/// the active mode wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointTable {
    endpoints: Vec<Endpoint>,
    options: QueryOptions,
}

impl EndpointTable {
    pub fn new(endpoints: Vec<Endpoint>, options: QueryOptions) -> Self {
        Self { endpoints, options }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn resolve(&self, mode: QueryMode) -> Option<&Endpoint> {
        self.endpoints.iter().filter(|e| e.serves(mode)).find(|e| {
            // A full-book query without a book id cannot be answered.
            if e.shape == RequestShape::FullBook
                && !e.is_placeholder()
                && self.options.book_id.is_none()
            {
                warn!(endpoint = %e.name, "full-book endpoint skipped: no book id configured");
                return false;
            }
            true
        })
    }

    pub fn is_configured(&self, mode: QueryMode) -> bool {
        self.resolve(mode).is_some()
    }

    /// Build the body for `endpoint`. `selection` stands in for the
    /// highlighted excerpt; without one the query itself is sent.
    pub fn build_payload(
        &self,
        endpoint: &Endpoint,
        query: &str,
        selection: Option<&str>,
    ) -> QueryPayload {
        match endpoint.shape {
            RequestShape::FullBook => QueryPayload::FullBook(FullBookQuery {
                book_id: self.options.book_id.clone().unwrap_or_default(),
                query: query.to_string(),
                max_results: self.options.max_results,
                temperature: self.options.temperature,
            }),
            RequestShape::SelectedText => QueryPayload::SelectedText(SelectedTextQuery {
                selected_text: selection.unwrap_or(query).to_string(),
                query: query.to_string(),
                temperature: self.options.temperature,
            }),
            RequestShape::Question => QueryPayload::Question(QuestionQuery {
                question: query.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dual_table(book_id: Option<&str>) -> EndpointTable {
        EndpointTable::new(
            vec![
                Endpoint::new("full-book", "http://qa.test/query/full", RequestShape::FullBook),
                Endpoint::new(
                    "selected-text",
                    "http://qa.test/query/selected",
                    RequestShape::SelectedText,
                ),
            ],
            QueryOptions {
                book_id: book_id.map(str::to_string),
                ..Default::default()
            },
        )
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("FULL".parse::<QueryMode>(), Ok(QueryMode::Full));
        assert_eq!("selected-text".parse::<QueryMode>(), Ok(QueryMode::Selected));
        assert!("chapter".parse::<QueryMode>().is_err());
        assert_eq!(QueryMode::Full.next(), QueryMode::Selected);
        assert_eq!(QueryMode::Selected.next(), QueryMode::Full);
    }

    #[test]
    fn resolve_picks_endpoint_by_mode() {
        let table = dual_table(Some("X"));
        assert_eq!(table.resolve(QueryMode::Full).unwrap().name, "full-book");
        assert_eq!(
            table.resolve(QueryMode::Selected).unwrap().name,
            "selected-text"
        );
    }

    #[test]
    fn first_matching_endpoint_wins() {
        let mut legacy = Endpoint::new("legacy", "http://qa.test/ask", RequestShape::Question);
        legacy.modes = vec![QueryMode::Full];
        let table = EndpointTable::new(
            vec![
                legacy,
                Endpoint::new("full-book", "http://qa.test/full", RequestShape::FullBook),
            ],
            QueryOptions {
                book_id: Some("X".into()),
                ..Default::default()
            },
        );
        assert_eq!(table.resolve(QueryMode::Full).unwrap().name, "legacy");
        assert!(table.resolve(QueryMode::Selected).is_none());
    }

    #[test]
    fn full_book_endpoint_needs_book_id() {
        let table = dual_table(None);
        assert!(!table.is_configured(QueryMode::Full));
        assert!(table.is_configured(QueryMode::Selected));
    }

    #[test]
    fn question_shape_serves_both_modes() {
        let table = EndpointTable::new(
            vec![Endpoint::new("legacy", "#", RequestShape::Question)],
            QueryOptions::default(),
        );
        assert!(table.is_configured(QueryMode::Full));
        assert!(table.is_configured(QueryMode::Selected));
        assert!(table.resolve(QueryMode::Full).unwrap().is_placeholder());
    }

    #[test]
    fn selected_payload_falls_back_to_query_text() {
        let table = dual_table(Some("X"));
        let endpoint = table.resolve(QueryMode::Selected).unwrap();

        let payload = table.build_payload(endpoint, "Explain this", None);
        assert_eq!(
            payload,
            QueryPayload::SelectedText(SelectedTextQuery {
                selected_text: "Explain this".into(),
                query: "Explain this".into(),
                temperature: 0.7,
            })
        );

        let payload = table.build_payload(endpoint, "Explain this", Some("ZMP balance"));
        match payload {
            QueryPayload::SelectedText(body) => assert_eq!(body.selected_text, "ZMP balance"),
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
