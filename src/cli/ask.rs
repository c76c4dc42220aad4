//! One-shot `ask` subcommand: a single exchange without the terminal UI.

use crate::core::backend::QueryBackend;
use crate::core::endpoint::{EndpointTable, QueryMode};
use crate::core::widget::{ChatWidget, SendRejected};
use crate::utils::logging::LoggingState;

/// Send `question` once and return the bot's reply text.
pub async fn ask(
    endpoints: EndpointTable,
    mode: QueryMode,
    selection: Option<String>,
    question: &str,
    backend: &dyn QueryBackend,
    logging: &LoggingState,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut widget = ChatWidget::with_mode(endpoints, mode);
    widget.set_selection(selection);

    match widget.send_message(question, backend).await {
        Ok(()) => {}
        Err(SendRejected::Empty) => return Err("nothing to ask: the question is empty".into()),
        Err(e) => return Err(e.into()),
    }

    for message in widget.messages() {
        logging.log_message(message)?;
    }

    widget
        .messages()
        .iter()
        .rev()
        .find(|m| m.is_bot())
        .map(|m| m.text.clone())
        .ok_or_else(|| "no reply was recorded".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::QueryPayload;
    use crate::core::backend::DispatchError;
    use crate::core::constants::{COMING_SOON_MESSAGE, NOT_CONFIGURED_MESSAGE};
    use crate::core::endpoint::{Endpoint, QueryOptions, RequestShape};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        payloads: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl QueryBackend for RecordingBackend {
        async fn post(&self, _url: &str, payload: &QueryPayload) -> Result<Value, DispatchError> {
            let body = serde_json::to_value(payload).expect("payload serializes");
            self.payloads.lock().unwrap().push(body);
            Ok(json!({ "response": "ROS 2 is a robotics middleware.", "answer": "legacy" }))
        }
    }

    fn table(endpoints: Vec<Endpoint>) -> EndpointTable {
        EndpointTable::new(
            endpoints,
            QueryOptions {
                book_id: Some("physical-ai".into()),
                ..QueryOptions::default()
            },
        )
    }

    #[tokio::test]
    async fn ask_returns_reply_and_sends_selection() {
        let backend = RecordingBackend::default();
        let endpoints = table(vec![Endpoint::new(
            "selected-text",
            "http://qa.test/query/selected",
            RequestShape::SelectedText,
        )]);

        let reply = ask(
            endpoints,
            QueryMode::Selected,
            Some("Nodes communicate over topics.".into()),
            "Explain this",
            &backend,
            &LoggingState::new(None).unwrap(),
        )
        .await
        .expect("reply");

        assert_eq!(reply, "ROS 2 is a robotics middleware.");
        let payloads = backend.payloads.lock().unwrap();
        assert_eq!(payloads[0]["selected_text"], "Nodes communicate over topics.");
        assert_eq!(payloads[0]["query"], "Explain this");
    }

    #[tokio::test]
    async fn unconfigured_mode_answers_locally() {
        let backend = RecordingBackend::default();
        let reply = ask(
            table(Vec::new()),
            QueryMode::Full,
            None,
            "What is Isaac Sim?",
            &backend,
            &LoggingState::new(None).unwrap(),
        )
        .await
        .expect("reply");

        assert_eq!(reply, NOT_CONFIGURED_MESSAGE);
        assert!(backend.payloads.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn placeholder_endpoint_is_simulated() {
        let backend = RecordingBackend::default();
        let reply = ask(
            table(vec![Endpoint::new("legacy", "#", RequestShape::Question)]),
            QueryMode::Full,
            None,
            "hello",
            &backend,
            &LoggingState::new(None).unwrap(),
        )
        .await
        .expect("reply");

        assert_eq!(reply, COMING_SOON_MESSAGE);
        assert!(backend.payloads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_question_is_an_error() {
        let backend = RecordingBackend::default();
        let result = ask(
            table(Vec::new()),
            QueryMode::Full,
            None,
            "",
            &backend,
            &LoggingState::new(None).unwrap(),
        )
        .await;
        assert!(result.is_err());
    }
}
