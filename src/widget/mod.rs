// src/widget/mod.rs
//! Chat widget state: the transcript, the typing flag and the open/closed
//! panel. It talks to the relay through a [`RelayTransport`] and turns every
//! outcome, failures included, into exactly one bot message.

pub mod transport;

use thiserror::Error;
use tracing::warn;

pub use transport::{HttpTransport, RelayReply, RelayTransport, TransportError};

pub const GREETING: &str =
    "Hi! I'm the school helper. Ask me about admissions, timings or facilities 😊";
pub const NO_REPLY: &str = "Hmm... no reply from Gemini.";
pub const SERVER_ERROR: &str = "Sorry 😅, the assistant couldn't respond.";
pub const NETWORK_ERROR: &str = "⚠️ Network error. Please try again later.";
pub const TYPING: &str = "🤖 Bot is typing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub origin: Origin,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { origin: Origin::User, text: text.into() }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { origin: Origin::Bot, text: text.into() }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WidgetError {
    #[error("message is empty")]
    Empty,
    #[error("a reply is still pending")]
    Busy,
}

pub struct ChatWidget<T> {
    transport: T,
    transcript: Vec<Message>,
    pending: bool,
    open: bool,
}

/// Clears the pending flag however the surrounding future ends.
struct PendingGuard<'a>(&'a mut bool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl<T: RelayTransport> ChatWidget<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            transcript: vec![Message::bot(GREETING)],
            pending: false,
            open: false,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Append the user's message and mark a reply as pending. Returns the
    /// text to send.
    pub fn begin(&mut self, input: &str) -> Result<String, WidgetError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(WidgetError::Empty);
        }
        if self.pending {
            return Err(WidgetError::Busy);
        }
        self.transcript.push(Message::user(text));
        self.pending = true;
        Ok(text.to_owned())
    }

    /// Append the one bot message for a finished call and clear the pending flag.
    pub fn complete(&mut self, result: Result<RelayReply, TransportError>) -> &Message {
        let text = match result {
            Ok(RelayReply::Ok(Some(reply))) => reply,
            Ok(RelayReply::Ok(None)) => NO_REPLY.to_owned(),
            Ok(RelayReply::Status { status, body }) => {
                warn!(status, body = %body, "relay answered with an error");
                SERVER_ERROR.to_owned()
            }
            Err(e) => {
                warn!(error = %e, "relay unreachable");
                NETWORK_ERROR.to_owned()
            }
        };
        self.pending = false;
        self.transcript.push(Message::bot(text));
        &self.transcript[self.transcript.len() - 1]
    }

    /// Send one message and wait for the bot's answer. Relay failures come
    /// back as fallback bot messages, not errors.
    pub async fn submit(&mut self, input: &str) -> Result<&Message, WidgetError> {
        let text = self.begin(input)?;
        let result = {
            let _pending = PendingGuard(&mut self.pending);
            self.transport.send(&text).await
        };
        Ok(self.complete(result))
    }
}
