//! Chat messages and their authors.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter, Result as FmtResult};
use uuid::Uuid;

use super::Timestamp;
use super::tree::{self, Branching};

/// Who authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Typed by the person using the dashboard.
    User,
    /// Produced by the chat backend or the response simulator.
    Agent,
}

impl Sender {
    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }
}

impl Display for Sender {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Sender {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Self::User),
            "agent" => Ok(Self::Agent),
            _ => Err("invalid message sender"),
        }
    }
}

/// Distinguishes regular content from the synthetic message shown when a
/// backend call fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Ordinary content.
    #[default]
    Text,
    /// Stands in for a reply that could not be produced.
    Error,
}

/// A single chat message and the replies threaded beneath it.
///
/// Everything except `replies` is fixed at construction. Replies only grow,
/// and only through [`crate::chat::MessageStore`]. Drop, clone and equality
/// walk the thread with an explicit stack, so depth is unbounded.
pub struct Message {
    id: Uuid,
    text: String,
    sender: Sender,
    kind: MessageKind,
    timestamp: Timestamp,
    parent_id: Option<Uuid>,
    replies: Vec<Message>,
}

/// Flat wire form of one message. A thread travels as its pre-order list of
/// records; nesting is rebuilt from `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct MessageRecord {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    #[serde(default)]
    pub kind: MessageKind,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
}

impl Message {
    /// Creates a top-level message with a fresh identifier.
    #[must_use]
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            kind: MessageKind::Text,
            timestamp: Timestamp::now(),
            parent_id: None,
            replies: Vec::new(),
        }
    }

    /// Creates a message that replies to `parent_id`.
    #[must_use]
    pub fn reply(parent_id: Uuid, text: impl Into<String>, sender: Sender) -> Self {
        let mut message = Self::new(text, sender);
        message.parent_id = Some(parent_id);
        message
    }

    /// Sets the kind; the store uses it for error replies.
    #[must_use]
    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Unique identifier, generated at construction.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Message body as typed or received.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Author of the message.
    #[must_use]
    pub const fn sender(&self) -> Sender {
        self.sender
    }

    /// Regular text or a failed-request notice.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Shorthand for `kind() == MessageKind::Error`.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, MessageKind::Error)
    }

    /// When the message was created.
    #[must_use]
    pub const fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// The message this one replies to; `None` for top-level messages.
    #[must_use]
    pub const fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }

    /// Direct replies in append order.
    #[must_use]
    pub fn replies(&self) -> &[Message] {
        &self.replies
    }

    pub(crate) fn replies_mut(&mut self) -> &mut [Message] {
        &mut self.replies
    }

    pub(crate) fn push_reply(&mut self, reply: Message) -> &Message {
        self.replies.push(reply);
        let last = self.replies.len() - 1;
        &self.replies[last]
    }

    pub(crate) fn to_record(&self) -> MessageRecord {
        MessageRecord {
            id: self.id,
            text: self.text.clone(),
            sender: self.sender,
            kind: self.kind,
            timestamp: self.timestamp,
            parent_id: self.parent_id,
        }
    }

    pub(crate) fn from_record(record: MessageRecord) -> Self {
        Self {
            id: record.id,
            text: record.text,
            sender: record.sender,
            kind: record.kind,
            timestamp: record.timestamp,
            parent_id: record.parent_id,
            replies: Vec::new(),
        }
    }
}

impl Branching for Message {
    fn branches(&self) -> &[Self] {
        &self.replies
    }

    fn branches_mut(&mut self) -> &mut Vec<Self> {
        &mut self.replies
    }

    fn detached(&self) -> Self {
        Self::from_record(self.to_record())
    }

    fn same_node(&self, other: &Self) -> bool {
        self.id == other.id
            && self.text == other.text
            && self.sender == other.sender
            && self.kind == other.kind
            && self.timestamp == other.timestamp
            && self.parent_id == other.parent_id
    }
}

impl Drop for Message {
    fn drop(&mut self) {
        tree::dismantle(self);
    }
}

impl Clone for Message {
    fn clone(&self) -> Self {
        tree::deep_clone(self)
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        tree::deep_eq(self, other)
    }
}

impl Eq for Message {}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Message")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("sender", &self.sender)
            .field("kind", &self.kind)
            .field("timestamp", &self.timestamp)
            .field("parent_id", &self.parent_id)
            .field("replies", &self.replies.len())
            .finish()
    }
}
