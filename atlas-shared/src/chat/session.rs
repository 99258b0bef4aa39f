//! The chat controller: the one place that mutates a conversation.
//!
//! [`ChatSession`] owns the message store and the expansion set and hands out
//! [`PendingReply`] tickets for replies that are still being produced. A
//! ticket carries the generation it was issued in; once the session is
//! invalidated (a screen unmounted, a driver shut down) older tickets complete
//! as no-ops.

use std::collections::HashSet;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::expansion::ExpansionSet;
use super::render::{ViewNode, render};
use super::store::{MessageStore, StoreError};
use crate::api::ApiError;
use crate::models::{Message, Sender};

/// Text of the agent message appended when the backend call fails.
pub const ERROR_REPLY_TEXT: &str = "Sorry, there was an error processing your request.";

/// Canned text of the simulated responder unless configured otherwise.
pub const DEFAULT_SIMULATED_REPLY: &str =
    "Thank you for your message. I'm processing your request and will respond shortly.";

/// Default latency of the simulated responder.
pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(2000);

/// Reasons a submission is refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ChatError {
    /// The text was empty or only whitespace.
    #[error("message is empty")]
    EmptyMessage,

    /// The message being replied to is gone.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A reply that has been requested but not yet delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    /// Identifies this request within the session.
    pub request_id: Uuid,
    /// Session generation at submission time.
    pub generation: u64,
    /// Id of the user message that triggered the request.
    pub message_id: Uuid,
    /// What the user typed; sent to the responder.
    pub prompt: String,
    /// The message the user was replying to, if any.
    pub parent_id: Option<Uuid>,
    /// Where the agent's answer will be threaded.
    pub thread_parent: Uuid,
}

/// Store, expansion state and in-flight bookkeeping for one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    store: MessageStore,
    expansion: ExpansionSet,
    generation: u64,
    pending: HashSet<Uuid>,
}

impl ChatSession {
    /// Empty conversation with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session whose first message is an agent greeting.
    #[must_use]
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.store.append_top_level(greeting, Sender::Agent);
        session
    }

    /// Appends the user's message and issues a ticket for the agent reply.
    ///
    /// The reply will be threaded under `parent_id` when the user was replying,
    /// otherwise under the new message itself.
    ///
    /// # Errors
    /// [`ChatError::EmptyMessage`] for blank input; [`ChatError::Store`] when
    /// `parent_id` is not in the store. Neither mutates the session.
    pub fn submit(
        &mut self,
        text: impl Into<String>,
        parent_id: Option<Uuid>,
    ) -> Result<PendingReply, ChatError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let message_id = match parent_id {
            Some(parent) => self.store.append_reply(parent, text.clone(), Sender::User)?.id(),
            None => self.store.append_top_level(text.clone(), Sender::User).id(),
        };

        let pending = PendingReply {
            request_id: Uuid::new_v4(),
            generation: self.generation,
            message_id,
            prompt: text,
            parent_id,
            thread_parent: parent_id.unwrap_or(message_id),
        };
        self.pending.insert(pending.request_id);
        debug!(
            request_id = %pending.request_id,
            %message_id,
            thread_parent = %pending.thread_parent,
            generation = pending.generation,
            "reply requested"
        );
        Ok(pending)
    }

    /// Delivers the outcome of a pending reply.
    ///
    /// Success appends the agent's text; failure appends an error-kind message
    /// with [`ERROR_REPLY_TEXT`]. Returns the appended message, or `None` when
    /// the ticket is stale, already completed, or its thread has vanished.
    pub fn complete(
        &mut self,
        pending: &PendingReply,
        outcome: Result<String, ApiError>,
    ) -> Option<Message> {
        if pending.generation != self.generation {
            warn!(
                request_id = %pending.request_id,
                generation = pending.generation,
                current = self.generation,
                "discarding stale reply"
            );
            return None;
        }
        if !self.pending.remove(&pending.request_id) {
            debug!(request_id = %pending.request_id, "reply already delivered");
            return None;
        }

        let appended = match outcome {
            Ok(text) => self
                .store
                .append_reply(pending.thread_parent, text, Sender::Agent),
            Err(error) => {
                warn!(
                    request_id = %pending.request_id,
                    %error,
                    transient = error.is_transient(),
                    "reply failed"
                );
                self.store
                    .append_error_reply(pending.thread_parent, ERROR_REPLY_TEXT)
            }
        };
        appended.ok().cloned()
    }

    /// Drops every outstanding ticket; later completions become no-ops.
    pub fn invalidate_pending(&mut self) {
        self.generation += 1;
        if !self.pending.is_empty() {
            debug!(
                dropped = self.pending.len(),
                generation = self.generation,
                "invalidated pending replies"
            );
        }
        self.pending.clear();
    }

    /// Whether any reply is still outstanding.
    #[must_use]
    pub fn is_awaiting_reply(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of replies still outstanding.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Read access to the messages.
    #[must_use]
    pub const fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Read access to the expand/collapse state.
    #[must_use]
    pub const fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    /// Flips a thread open or closed; returns whether it is now expanded.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        self.expansion.toggle(id)
    }

    /// Expands every message that has replies.
    pub fn expand_all(&mut self) {
        let with_replies: Vec<Uuid> = self
            .store
            .iter()
            .filter(|(_, message)| !message.replies().is_empty())
            .map(|(_, message)| message.id())
            .collect();
        self.expansion.extend(with_replies);
    }

    /// Collapses every thread.
    pub fn collapse_all(&mut self) {
        self.expansion.clear();
    }

    /// Projects the conversation for display.
    #[must_use]
    pub fn render(&self) -> Vec<ViewNode> {
        render(self.store.roots(), &self.expansion)
    }
}
