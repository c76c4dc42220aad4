//! The chat widget: transcript, panel visibility, query mode, and dispatch.
//!
//! Sending is split in two so an event loop never blocks on the network:
//! [`ChatWidget::begin_send`] records the user's message and tells the caller
//! what to do next, and [`ChatWidget::complete`] (or
//! [`ChatWidget::complete_simulated`]) appends the bot's side. For callers
//! that can simply await, [`ChatWidget::send_message`] runs the whole exchange.
//!
//! At most one request is outstanding per widget. Each request carries a
//! sequence number; completions for anything other than the outstanding
//! request are dropped.

use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api::{extract_reply, QueryPayload};
use crate::core::backend::{DispatchError, QueryBackend};
use crate::core::constants::{
    COMING_SOON_DELAY, COMING_SOON_MESSAGE, ERROR_MESSAGE, GREETING, NOT_CONFIGURED_MESSAGE,
};
use crate::core::endpoint::{EndpointTable, QueryMode, RequestShape};
use crate::core::message::Message;

/// What the caller must do after a send was accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The bot's reply is already in the transcript; nothing to send.
    Settled,
    /// Wait `delay`, then call [`ChatWidget::complete_simulated`].
    Simulated { seq: u64, delay: Duration },
    /// POST the payload, then call [`ChatWidget::complete`] with the outcome.
    Request(PendingRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub seq: u64,
    pub endpoint: String,
    pub url: String,
    pub payload: QueryPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    /// Nothing to send.
    Empty,
    /// A previous request has not completed yet.
    Busy,
}

impl fmt::Display for SendRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendRejected::Empty => f.write_str("message is empty"),
            SendRejected::Busy => f.write_str("still waiting for the previous answer"),
        }
    }
}

impl std::error::Error for SendRejected {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlight {
    Simulated,
    Request(RequestShape),
}

#[derive(Debug, Clone)]
pub struct ChatWidget {
    messages: Vec<Message>,
    input: String,
    is_open: bool,
    mode: QueryMode,
    selection: Option<String>,
    endpoints: EndpointTable,
    next_seq: u64,
    in_flight: Option<(u64, InFlight)>,
}

impl ChatWidget {
    pub fn new(endpoints: EndpointTable) -> Self {
        Self::with_mode(endpoints, QueryMode::default())
    }

    pub fn with_mode(endpoints: EndpointTable, mode: QueryMode) -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            is_open: false,
            mode,
            selection: None,
            endpoints,
            next_seq: 1,
            in_flight: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    pub fn is_waiting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Text to show in place of an empty transcript.
    pub fn greeting(&self) -> Option<&'static str> {
        self.messages.is_empty().then_some(GREETING)
    }

    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn set_mode(&mut self, mode: QueryMode) {
        self.mode = mode;
    }

    pub fn cycle_mode(&mut self) -> QueryMode {
        self.mode = self.mode.next();
        self.mode
    }

    /// Record (or clear) the excerpt sent with selected-text queries.
    pub fn set_selection(&mut self, selection: Option<String>) {
        self.selection = selection.filter(|text| !text.trim().is_empty());
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_input(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Send whatever is in the input field.
    pub fn begin_send_input(&mut self) -> Result<Dispatch, SendRejected> {
        let text = self.input.clone();
        self.begin_send(&text)
    }

    pub fn begin_send(&mut self, text: &str) -> Result<Dispatch, SendRejected> {
        if text.is_empty() {
            return Err(SendRejected::Empty);
        }
        if self.in_flight.is_some() {
            return Err(SendRejected::Busy);
        }

        self.messages.push(Message::user(text));
        self.input.clear();

        let Some(endpoint) = self.endpoints.resolve(self.mode) else {
            debug!(mode = %self.mode, "no endpoint configured for mode");
            self.messages.push(Message::bot(NOT_CONFIGURED_MESSAGE));
            return Ok(Dispatch::Settled);
        };

        let seq = self.next_seq;
        self.next_seq += 1;

        if endpoint.is_placeholder() {
            debug!(seq, endpoint = %endpoint.name, "placeholder endpoint; simulating reply");
            self.in_flight = Some((seq, InFlight::Simulated));
            return Ok(Dispatch::Simulated {
                seq,
                delay: COMING_SOON_DELAY,
            });
        }

        let payload = self
            .endpoints
            .build_payload(endpoint, text, self.selection.as_deref());
        debug!(seq, mode = %self.mode, endpoint = %endpoint.name, "chat query ready");
        self.in_flight = Some((seq, InFlight::Request(endpoint.shape)));
        Ok(Dispatch::Request(PendingRequest {
            seq,
            endpoint: endpoint.name.clone(),
            url: endpoint.url.clone(),
            payload,
        }))
    }

    /// Append the bot's side of request `seq`. Returns `false` when `seq` is
    /// not the outstanding request.
    pub fn complete(
        &mut self,
        seq: u64,
        outcome: Result<serde_json::Value, DispatchError>,
    ) -> bool {
        let shape = match self.in_flight {
            Some((current, InFlight::Request(shape))) if current == seq => shape,
            _ => {
                debug!(seq, "discarding completion for a request that is not outstanding");
                return false;
            }
        };
        self.in_flight = None;

        let text = match outcome {
            Ok(body) => extract_reply(&body, shape.reply_field()),
            Err(err) => {
                warn!(seq, error = %err, "chat query failed");
                ERROR_MESSAGE.to_string()
            }
        };
        self.messages.push(Message::bot(text));
        true
    }

    pub fn complete_simulated(&mut self, seq: u64) -> bool {
        match self.in_flight {
            Some((current, InFlight::Simulated)) if current == seq => {
                self.in_flight = None;
                self.messages.push(Message::bot(COMING_SOON_MESSAGE));
                true
            }
            _ => false,
        }
    }

    /// Run a full exchange for `text`, awaiting the backend in place.
    pub async fn send_message(
        &mut self,
        text: &str,
        backend: &dyn QueryBackend,
    ) -> Result<(), SendRejected> {
        match self.begin_send(text)? {
            Dispatch::Settled => {}
            Dispatch::Simulated { seq, delay } => {
                tokio::time::sleep(delay).await;
                self.complete_simulated(seq);
            }
            Dispatch::Request(request) => {
                let outcome = backend.post(&request.url, &request.payload).await;
                self.complete(request.seq, outcome);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
