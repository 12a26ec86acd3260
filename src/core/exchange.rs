//! Drives one conversation between the terminal and the backend.
//!
//! [`ChatExchange`] owns the session and the visible transcript. Each
//! dispatched message is sent on a spawned task and its settled result comes
//! back over an mpsc channel; the caller feeds it to [`ChatExchange::settle`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ApiError, ChatReply, ChatRequest};
use crate::core::message::Message;
use crate::core::session::{ReplyOutcome, Session, Submission};

pub const CONNECTION_ERROR_NOTICE: &str = "Error connecting to Rex. Please try again.";

#[async_trait]
pub trait ChatBackend: Send + Sync + 'static {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;
}

pub type ExchangeResult = Result<ChatReply, ApiError>;

/// What the UI should do after feeding the exchange an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeEffect {
    Nothing,
    /// A request is in flight; show the loading indicator.
    Sent,
    OpenLogin,
    /// A reply was appended at this transcript index; reveal it.
    Reply { index: usize },
    /// The request failed and a notice was appended.
    Failed,
}

pub struct ChatExchange<B: ChatBackend> {
    backend: Arc<B>,
    session: Session,
    transcript: Vec<Message>,
    tx: mpsc::UnboundedSender<ExchangeResult>,
}

impl<B: ChatBackend> ChatExchange<B> {
    pub fn new(
        backend: Arc<B>,
        session: Session,
    ) -> (Self, mpsc::UnboundedReceiver<ExchangeResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let exchange = Self {
            backend,
            session,
            transcript: Vec::new(),
            tx,
        };
        (exchange, rx)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_loading(&self) -> bool {
        self.session.awaiting_reply()
    }

    pub fn push_system(&mut self, content: impl Into<String>) {
        self.transcript.push(Message::system(content));
    }

    pub fn push_error(&mut self, content: impl Into<String>) {
        self.transcript.push(Message::error(content));
    }

    /// Handle one line of user input.
    pub fn submit(&mut self, text: &str) -> ExchangeEffect {
        let (next, submission) = self.session.submit(text);
        self.session = next;

        match submission {
            Submission::Ignored => ExchangeEffect::Nothing,
            Submission::AdminLogin => ExchangeEffect::OpenLogin,
            Submission::Dispatch(request) => {
                self.transcript.push(Message::user(request.message.clone()));
                debug!(
                    username = %request.username,
                    conversation = ?request.conversation_id,
                    "dispatching chat message"
                );

                let backend = Arc::clone(&self.backend);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = backend.send_chat(&request).await;
                    let _ = tx.send(result);
                });
                ExchangeEffect::Sent
            }
        }
    }

    /// Apply a settled request to the session and transcript.
    pub fn settle(&mut self, result: ExchangeResult) -> ExchangeEffect {
        match result {
            Ok(reply) => {
                let (next, outcome) = self.session.settle_reply(reply);
                self.session = next;
                match outcome {
                    ReplyOutcome::AdminLogin => ExchangeEffect::OpenLogin,
                    ReplyOutcome::Reply(text) => {
                        self.transcript.push(Message::rex(text));
                        ExchangeEffect::Reply {
                            index: self.transcript.len() - 1,
                        }
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "chat request failed");
                self.session = self.session.settle_failure();
                self.push_error(CONNECTION_ERROR_NOTICE);
                ExchangeEffect::Failed
            }
        }
    }
}
