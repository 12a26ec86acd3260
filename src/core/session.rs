//! Client-side chat session and its transitions.
//!
//! A [`Session`] is a plain value. Each transition borrows the current
//! session and returns the next one alongside what the caller should do, so
//! event handlers never share mutable state.

use crate::api::{ChatReply, ChatRequest, ConversationId};
use crate::core::names::extract_name;

/// Typing this exact phrase (any case) opens the admin login instead of
/// chatting.
pub const MAGIC_PHRASE: &str = "heyopenhereiam";

/// Username sent until one is inferred or configured.
pub const PLACEHOLDER_USERNAME: &str = "Anonymous";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    conversation_id: Option<ConversationId>,
    username: Option<String>,
    awaiting_reply: bool,
}

/// What the caller should do with a submitted line.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Empty input, or a reply is still pending.
    Ignored,
    /// The magic phrase: show the login prompt, send nothing.
    AdminLogin,
    /// Send this request to `/chat`.
    Dispatch(ChatRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    Reply(String),
    AdminLogin,
}

pub fn is_magic_phrase(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(MAGIC_PHRASE)
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a known username, e.g. one preset in the config file.
    pub fn with_username(username: Option<String>) -> Self {
        Self {
            username: username.filter(|name| !name.trim().is_empty()),
            ..Self::default()
        }
    }

    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(PLACEHOLDER_USERNAME)
    }

    pub fn has_username(&self) -> bool {
        self.username.is_some()
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Apply the name heuristic to `text`.
    ///
    /// Correcting an already established name drops the conversation id so
    /// the backend starts a fresh conversation under the new identity.
    pub fn observe_name(&self, text: &str) -> Session {
        let mut next = self.clone();
        let Some(candidate) = extract_name(text) else {
            return next;
        };

        if next.username.as_deref() != Some(candidate.name.as_str()) {
            if next.username.is_some() {
                next.conversation_id = None;
            }
            next.username = Some(candidate.name);
        }
        next
    }

    pub fn submit(&self, text: &str) -> (Session, Submission) {
        let message = text.trim();
        if message.is_empty() || self.awaiting_reply {
            return (self.clone(), Submission::Ignored);
        }
        if is_magic_phrase(message) {
            return (self.clone(), Submission::AdminLogin);
        }

        let mut next = self.observe_name(message);
        next.awaiting_reply = true;
        let request = ChatRequest {
            message: message.to_string(),
            username: next.username().to_string(),
            conversation_id: next.conversation_id.clone(),
        };
        (next, Submission::Dispatch(request))
    }

    pub fn settle_reply(&self, reply: ChatReply) -> (Session, ReplyOutcome) {
        let mut next = self.clone();
        next.awaiting_reply = false;

        if reply.admin_request {
            return (next, ReplyOutcome::AdminLogin);
        }
        if let Some(id) = reply.conversation_id {
            next.conversation_id = Some(id);
        }
        (next, ReplyOutcome::Reply(reply.message))
    }

    pub fn settle_failure(&self) -> Session {
        Session {
            awaiting_reply: false,
            ..self.clone()
        }
    }
}
