use super::*;
use crate::api::{FullBookQuery, QuestionQuery, SelectedTextQuery};
use crate::core::constants::NO_RESPONSE_PLACEHOLDER;
use crate::core::endpoint::{Endpoint, QueryOptions};
use crate::core::message::Sender;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

/// Records every call and answers with a canned outcome.
struct FakeBackend {
    reply: Result<serde_json::Value, DispatchError>,
    calls: Mutex<Vec<(String, QueryPayload)>>,
}

impl FakeBackend {
    fn replying(body: serde_json::Value) -> Self {
        Self {
            reply: Ok(body),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err(DispatchError::Transport {
                url: "http://qa.test".into(),
                message: "connection refused".into(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, QueryPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryBackend for FakeBackend {
    async fn post(
        &self,
        url: &str,
        payload: &QueryPayload,
    ) -> Result<serde_json::Value, DispatchError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        self.reply.clone()
    }
}

const FULL_URL: &str = "http://qa.test/query/full";
const SELECTED_URL: &str = "http://qa.test/query/selected";

fn dual_widget() -> ChatWidget {
    ChatWidget::new(EndpointTable::new(
        vec![
            Endpoint::new("full-book", FULL_URL, RequestShape::FullBook),
            Endpoint::new("selected-text", SELECTED_URL, RequestShape::SelectedText),
        ],
        QueryOptions {
            book_id: Some("X".into()),
            ..Default::default()
        },
    ))
}

fn texts(widget: &ChatWidget) -> Vec<(Sender, &str)> {
    widget
        .messages()
        .iter()
        .map(|m| (m.sender, m.text.as_str()))
        .collect()
}

#[tokio::test]
async fn full_mode_scenario_posts_expected_body() {
    let backend = FakeBackend::replying(json!({ "response": "A robot middleware." }));
    let mut widget = dual_widget();
    widget.toggle_open();
    assert!(widget.is_open());

    widget
        .send_message("What is ROS 2?", &backend)
        .await
        .expect("send accepted");

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, FULL_URL);
    assert_eq!(
        serde_json::to_value(&calls[0].1).unwrap(),
        json!({
            "book_id": "X",
            "query": "What is ROS 2?",
            "max_results": 5,
            "temperature": 0.7
        })
    );
    assert_eq!(
        texts(&widget),
        vec![
            (Sender::User, "What is ROS 2?"),
            (Sender::Bot, "A robot middleware.")
        ]
    );
}

#[test]
fn user_message_is_appended_before_any_network_activity() {
    let mut widget = dual_widget();
    widget.set_input("What is a digital twin?");

    let dispatch = widget.begin_send_input().expect("send accepted");

    assert!(matches!(dispatch, Dispatch::Request(_)));
    assert_eq!(texts(&widget), vec![(Sender::User, "What is a digital twin?")]);
    assert_eq!(widget.input(), "");
    assert!(widget.is_waiting());
}

#[test]
fn empty_text_is_ignored() {
    let mut widget = dual_widget();
    assert_eq!(widget.begin_send(""), Err(SendRejected::Empty));
    assert!(widget.messages().is_empty());
    assert!(widget.greeting().is_some());
}

#[tokio::test]
async fn unconfigured_mode_appends_fixed_message_without_calling() {
    let backend = FakeBackend::replying(json!({ "response": "unused" }));
    let mut widget = ChatWidget::new(EndpointTable::default());
    widget.set_input("hello");

    widget
        .send_message("hello", &backend)
        .await
        .expect("send accepted");

    assert!(backend.calls().is_empty());
    assert_eq!(
        texts(&widget),
        vec![(Sender::User, "hello"), (Sender::Bot, NOT_CONFIGURED_MESSAGE)]
    );
    assert_eq!(widget.input(), "");
    assert!(!widget.is_waiting());
}

#[tokio::test]
async fn missing_response_field_degrades_to_placeholder() {
    let backend = FakeBackend::replying(json!({ "detail": "Not Found" }));
    let mut widget = dual_widget();

    widget.send_message("hi", &backend).await.unwrap();

    assert_eq!(
        texts(&widget),
        vec![(Sender::User, "hi"), (Sender::Bot, NO_RESPONSE_PLACEHOLDER)]
    );
}

#[tokio::test]
async fn transport_failure_appends_one_error_message() {
    let backend = FakeBackend::failing();
    let mut widget = dual_widget();

    widget.send_message("hi", &backend).await.unwrap();

    assert_eq!(backend.calls().len(), 1);
    assert_eq!(
        texts(&widget),
        vec![(Sender::User, "hi"), (Sender::Bot, ERROR_MESSAGE)]
    );

    // The conversation stays usable.
    let backend = FakeBackend::replying(json!({ "response": "ok" }));
    widget.send_message("again", &backend).await.unwrap();
    assert_eq!(widget.messages().len(), 4);
    assert_eq!(widget.messages()[3].text, "ok");
}

#[tokio::test]
async fn switching_mode_changes_next_request_only() {
    let backend = FakeBackend::replying(json!({ "response": "answer" }));
    let mut widget = dual_widget();

    widget.send_message("first", &backend).await.unwrap();
    let before = widget.messages().to_vec();

    widget.set_mode(QueryMode::Selected);
    widget.send_message("second", &backend).await.unwrap();

    let calls = backend.calls();
    assert_eq!(calls[0].0, FULL_URL);
    assert!(matches!(calls[0].1, QueryPayload::FullBook(FullBookQuery { .. })));
    assert_eq!(calls[1].0, SELECTED_URL);
    assert_eq!(
        calls[1].1,
        QueryPayload::SelectedText(SelectedTextQuery {
            selected_text: "second".into(),
            query: "second".into(),
            temperature: 0.7,
        })
    );
    assert_eq!(&widget.messages()[..2], &before[..]);
}

#[tokio::test]
async fn recorded_selection_is_sent_as_selected_text() {
    let backend = FakeBackend::replying(json!({ "response": "answer" }));
    let mut widget = dual_widget();
    widget.set_mode(QueryMode::Selected);
    widget.set_selection(Some("Zero moment point keeps the robot upright.".into()));

    widget.send_message("Explain", &backend).await.unwrap();

    match &backend.calls()[0].1 {
        QueryPayload::SelectedText(body) => {
            assert_eq!(body.selected_text, "Zero moment point keeps the robot upright.");
            assert_eq!(body.query, "Explain");
        }
        other => panic!("unexpected payload: {other:?}"),
    }

    widget.set_selection(Some("   ".into()));
    assert_eq!(widget.selection(), None);
}

#[test]
fn second_send_while_waiting_is_rejected() {
    let mut widget = dual_widget();
    let first = match widget.begin_send("one").unwrap() {
        Dispatch::Request(request) => request,
        other => panic!("unexpected dispatch: {other:?}"),
    };

    widget.set_input("two");
    assert_eq!(widget.begin_send_input(), Err(SendRejected::Busy));
    assert_eq!(widget.messages().len(), 1);
    assert_eq!(widget.input(), "two");

    assert!(widget.complete(first.seq, Ok(json!({ "response": "1" }))));
    let second = widget.begin_send_input().expect("accepted once idle");
    match second {
        Dispatch::Request(request) => assert!(request.seq > first.seq),
        other => panic!("unexpected dispatch: {other:?}"),
    }
}

#[test]
fn stale_completion_is_discarded() {
    let mut widget = dual_widget();
    let Dispatch::Request(request) = widget.begin_send("one").unwrap() else {
        panic!("expected a request");
    };

    assert!(!widget.complete(request.seq + 7, Ok(json!({ "response": "late" }))));
    assert!(widget.is_waiting());
    assert!(widget.complete(request.seq, Ok(json!({ "response": "on time" }))));
    assert!(!widget.complete(request.seq, Ok(json!({ "response": "twice" }))));
    assert_eq!(
        texts(&widget),
        vec![(Sender::User, "one"), (Sender::Bot, "on time")]
    );
}

#[tokio::test(start_paused = true)]
async fn placeholder_endpoint_simulates_coming_soon_reply() {
    let backend = FakeBackend::replying(json!({ "answer": "unused" }));
    let mut widget = ChatWidget::new(EndpointTable::new(
        vec![Endpoint::new("legacy", "#", RequestShape::Question)],
        QueryOptions::default(),
    ));

    widget.send_message("hello", &backend).await.unwrap();

    assert!(backend.calls().is_empty());
    assert_eq!(
        texts(&widget),
        vec![(Sender::User, "hello"), (Sender::Bot, COMING_SOON_MESSAGE)]
    );
}

#[tokio::test]
async fn legacy_endpoint_sends_question_and_reads_answer() {
    let backend = FakeBackend::replying(json!({ "answer": "Gazebo simulates physics." }));
    let mut widget = ChatWidget::with_mode(
        EndpointTable::new(
            vec![Endpoint::new("legacy", "http://qa.test/ask", RequestShape::Question)],
            QueryOptions::default(),
        ),
        QueryMode::Selected,
    );

    widget.send_message("What is Gazebo?", &backend).await.unwrap();

    assert_eq!(
        backend.calls()[0].1,
        QueryPayload::Question(QuestionQuery {
            question: "What is Gazebo?".into()
        })
    );
    assert_eq!(widget.messages()[1].text, "Gazebo simulates physics.");
}

#[test]
fn toggle_and_cycle_only_touch_ui_state() {
    let mut widget = dual_widget();
    widget.toggle_open();
    widget.toggle_open();
    assert!(!widget.is_open());
    assert_eq!(widget.cycle_mode(), QueryMode::Selected);
    assert_eq!(widget.cycle_mode(), QueryMode::Full);
    assert!(widget.messages().is_empty());
}
