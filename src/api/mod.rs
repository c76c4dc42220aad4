//! Request and response payloads exchanged with the question-answering backend.

use serde::{Deserialize, Serialize};

use crate::core::constants::NO_RESPONSE_PLACEHOLDER;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullBookQuery {
    pub book_id: String,
    pub query: String,
    pub max_results: u32,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedTextQuery {
    pub selected_text: String,
    pub query: String,
    pub temperature: f64,
}

/// Body of the single-endpoint widget: `{question}` in, `{answer}` out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionQuery {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryPayload {
    FullBook(FullBookQuery),
    SelectedText(SelectedTextQuery),
    Question(QuestionQuery),
}

impl QueryPayload {
    /// The user's question, whichever shape carries it.
    pub fn query_text(&self) -> &str {
        match self {
            QueryPayload::FullBook(body) => &body.query,
            QueryPayload::SelectedText(body) => &body.query,
            QueryPayload::Question(body) => &body.question,
        }
    }
}

/// Pull the answer out of a decoded response body.
///
/// Anything other than a string under `field` degrades to the fixed
/// placeholder; a malformed success body is not an error.
pub fn extract_reply(body: &serde_json::Value, field: &str) -> String {
    body.get(field)
        .and_then(|value| value.as_str())
        .map(str::to_owned)
        .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string())
}
