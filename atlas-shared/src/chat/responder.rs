//! Producers of agent replies and the task driver that delivers them.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::session::{
    ChatError, ChatSession, DEFAULT_SIMULATED_DELAY, DEFAULT_SIMULATED_REPLY, PendingReply,
};
use crate::api::{ApiResult, AtlasClient};
use crate::models::Message;

/// Something that turns a user prompt into an agent reply.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce the reply text for `prompt`.
    async fn respond(&self, prompt: &str) -> ApiResult<String>;
}

/// Answers every prompt with the same text after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedResponder {
    delay: Duration,
    reply: String,
}

impl SimulatedResponder {
    /// Responder that waits `delay` before answering with `reply`.
    #[must_use]
    pub fn new(delay: Duration, reply: impl Into<String>) -> Self {
        Self {
            delay,
            reply: reply.into(),
        }
    }
}

impl Default for SimulatedResponder {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_DELAY, DEFAULT_SIMULATED_REPLY)
    }
}

#[async_trait]
impl Responder for SimulatedResponder {
    async fn respond(&self, _prompt: &str) -> ApiResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }
}

#[async_trait]
impl Responder for AtlasClient {
    async fn respond(&self, prompt: &str) -> ApiResult<String> {
        self.send_message(prompt).await
    }
}

/// Progress notifications published by [`ResponseDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A reply (possibly the error message) was appended to the session.
    Replied {
        /// Ticket the reply answers.
        request_id: Uuid,
        /// The appended agent message.
        message: Message,
    },
    /// The request was cancelled or its result arrived after invalidation.
    Discarded {
        /// Ticket that produced nothing.
        request_id: Uuid,
    },
}

/// Runs one task per submission and feeds completions back into a shared
/// [`ChatSession`].
pub struct ResponseDriver {
    session: Arc<Mutex<ChatSession>>,
    responder: Arc<dyn Responder>,
    events: mpsc::UnboundedSender<SessionEvent>,
    cancel: CancellationToken,
    tasks: JoinSet<()>,
}

impl fmt::Debug for ResponseDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseDriver")
            .field("in_flight", &self.tasks.len())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl ResponseDriver {
    /// Wraps `session` and returns the driver with its event stream.
    #[must_use]
    pub fn new(
        session: ChatSession,
        responder: Arc<dyn Responder>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let driver = Self {
            session: Arc::new(Mutex::new(session)),
            responder,
            events,
            cancel: CancellationToken::new(),
            tasks: JoinSet::new(),
        };
        (driver, receiver)
    }

    /// Shared handle to the session, for reading and for expansion changes.
    #[must_use]
    pub fn session(&self) -> Arc<Mutex<ChatSession>> {
        Arc::clone(&self.session)
    }

    /// Number of replies still being produced.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Appends the user's message and starts producing the agent reply.
    ///
    /// # Errors
    /// Propagates [`ChatError`] from [`ChatSession::submit`]; no task is spawned.
    pub async fn submit(
        &mut self,
        text: impl Into<String>,
        parent_id: Option<Uuid>,
    ) -> Result<PendingReply, ChatError> {
        let pending = self.session.lock().await.submit(text, parent_id)?;
        while self.tasks.try_join_next().is_some() {}

        let session = Arc::clone(&self.session);
        let responder = Arc::clone(&self.responder);
        let events = self.events.clone();
        let cancel = self.cancel.child_token();
        let ticket = pending.clone();

        self.tasks.spawn(async move {
            let request_id = ticket.request_id;
            let outcome = tokio::select! {
                () = cancel.cancelled() => {
                    debug!(%request_id, "reply cancelled");
                    publish(&events, SessionEvent::Discarded { request_id });
                    return;
                }
                outcome = responder.respond(&ticket.prompt) => outcome,
            };

            let appended = session.lock().await.complete(&ticket, outcome);
            let event = match appended {
                Some(message) => SessionEvent::Replied {
                    request_id,
                    message,
                },
                None => SessionEvent::Discarded { request_id },
            };
            publish(&events, event);
        });

        Ok(pending)
    }

    /// Waits until every spawned reply has finished.
    pub async fn wait_idle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "reply task failed");
            }
        }
    }

    /// Cancels outstanding replies and invalidates their tickets.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        self.session.lock().await.invalidate_pending();
        self.wait_idle().await;
        debug!("response driver stopped");
    }
}

fn publish(events: &mpsc::UnboundedSender<SessionEvent>, event: SessionEvent) {
    if events.send(event).is_err() {
        debug!("session event receiver dropped");
    }
}
