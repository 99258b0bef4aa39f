//! In-memory threaded message store.
//!
//! Messages form a forest: an ordered list of top-level messages, each
//! carrying its replies. Lookups walk the forest depth-first with an explicit
//! stack, so arbitrarily deep threads never grow the call stack.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::message::MessageRecord;
use crate::models::{Message, MessageKind, Sender};

/// Failures raised by [`MessageStore`] mutations and hydration.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The message a reply targets is not in the store. Nothing was inserted.
    #[error("reply target {parent_id} not found")]
    NotFound {
        /// Id the reply was addressed to.
        parent_id: Uuid,
    },
    /// A serialized store lists the same id twice.
    #[error("message {id} appears more than once")]
    DuplicateId {
        /// The repeated id.
        id: Uuid,
    },
    /// A serialized reply does not follow its parent or one of the parent's
    /// descendants.
    #[error("reply {id} is not placed under its parent {parent_id}")]
    MisplacedReply {
        /// Id of the reply.
        id: Uuid,
        /// Parent the reply names.
        parent_id: Uuid,
    },
}

/// Owns every message and the nesting between them.
///
/// Serializes as a flat pre-order list of messages, each naming its parent,
/// so neither encoding nor decoding recurses per nesting level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageStore {
    roots: Vec<Message>,
    revision: u64,
}

impl MessageStore {
    /// Empty store at revision 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the forest from a pre-order listing.
    ///
    /// Every id must be unique and every reply must come after its parent
    /// while that parent's subtree is still open.
    fn from_records(records: Vec<MessageRecord>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut roots = Vec::new();
        // Path from the current root down to the most recent record.
        let mut open: Vec<Message> = Vec::new();

        for record in records {
            let id = record.id;
            if !seen.insert(id) {
                return Err(StoreError::DuplicateId { id });
            }
            match record.parent_id {
                None => {
                    while !open.is_empty() {
                        close_last(&mut open, &mut roots);
                    }
                }
                Some(parent_id) => {
                    while open.last().is_some_and(|message| message.id() != parent_id) {
                        close_last(&mut open, &mut roots);
                    }
                    if open.is_empty() {
                        return Err(StoreError::MisplacedReply { id, parent_id });
                    }
                }
            }
            open.push(Message::from_record(record));
        }
        while !open.is_empty() {
            close_last(&mut open, &mut roots);
        }

        Ok(Self { roots, revision: 0 })
    }

    /// Appends a new top-level message. Always succeeds.
    pub fn append_top_level(&mut self, text: impl Into<String>, sender: Sender) -> &Message {
        let message = Message::new(text, sender);
        debug!(message_id = %message.id(), sender = %sender, "appending top-level message");
        self.roots.push(message);
        self.revision += 1;
        let last = self.roots.len() - 1;
        &self.roots[last]
    }

    /// Appends a reply beneath the first message whose id is `parent_id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when no message has that id; the store
    /// is left untouched.
    pub fn append_reply(
        &mut self,
        parent_id: Uuid,
        text: impl Into<String>,
        sender: Sender,
    ) -> Result<&Message, StoreError> {
        self.insert_reply(parent_id, Message::reply(parent_id, text, sender))
    }

    /// Appends an error-kind agent message beneath `parent_id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when no message has that id.
    pub fn append_error_reply(
        &mut self,
        parent_id: Uuid,
        text: impl Into<String>,
    ) -> Result<&Message, StoreError> {
        let message = Message::reply(parent_id, text, Sender::Agent).with_kind(MessageKind::Error);
        self.insert_reply(parent_id, message)
    }

    fn insert_reply(&mut self, parent_id: Uuid, message: Message) -> Result<&Message, StoreError> {
        let Some(path) = self.locate(parent_id) else {
            warn!(%parent_id, "dropping reply: target message not found");
            return Err(StoreError::NotFound { parent_id });
        };
        let parent =
            node_at_mut(&mut self.roots, &path).ok_or(StoreError::NotFound { parent_id })?;
        debug!(
            message_id = %message.id(),
            %parent_id,
            depth = path.len(),
            "appending reply"
        );
        self.revision += 1;
        Ok(parent.push_reply(message))
    }

    /// Index path from the root list down to the first message with `id`,
    /// in pre-order.
    fn locate(&self, id: Uuid) -> Option<Vec<usize>> {
        // Each frame is a sibling list plus the index of the next sibling to visit.
        let mut frames: Vec<(&[Message], usize)> = vec![(self.roots.as_slice(), 0)];
        while let Some(&(level, cursor)) = frames.last() {
            let top = frames.len() - 1;
            let Some(message) = level.get(cursor) else {
                frames.pop();
                continue;
            };
            frames[top].1 = cursor + 1;
            if message.id() == id {
                return Some(frames.iter().map(|&(_, next)| next - 1).collect());
            }
            if !message.replies().is_empty() {
                frames.push((message.replies(), 0));
            }
        }
        None
    }

    /// Finds a message anywhere in the forest.
    #[must_use]
    pub fn find(&self, id: Uuid) -> Option<&Message> {
        self.iter()
            .map(|(_, message)| message)
            .find(|message| message.id() == id)
    }

    /// Top-level messages in append order.
    #[must_use]
    pub fn roots(&self) -> &[Message] {
        &self.roots
    }

    /// Total number of messages, replies included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True when no message has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Bumped on every successful mutation; views compare it to decide
    /// whether to re-project.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Pre-order walk yielding each message with its depth (roots are 0).
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            frames: vec![(self.roots.as_slice(), 0)],
        }
    }
}

/// Depth-first iterator returned by [`MessageStore::iter`].
#[derive(Debug)]
pub struct Iter<'a> {
    frames: Vec<(&'a [Message], usize)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Message);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let &(level, cursor) = self.frames.last()?;
            let top = self.frames.len() - 1;
            let Some(message) = level.get(cursor) else {
                self.frames.pop();
                continue;
            };
            self.frames[top].1 = cursor + 1;
            if !message.replies().is_empty() {
                self.frames.push((message.replies(), 0));
            }
            return Some((top, message));
        }
    }
}

/// Attaches the innermost open message to its parent, or to `roots` when
/// nothing encloses it.
fn close_last(open: &mut Vec<Message>, roots: &mut Vec<Message>) {
    let Some(done) = open.pop() else { return };
    match open.last_mut() {
        Some(parent) => {
            parent.push_reply(done);
        }
        None => roots.push(done),
    }
}

fn node_at_mut<'a>(roots: &'a mut [Message], path: &[usize]) -> Option<&'a mut Message> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get_mut(*first)?;
    for &index in rest {
        node = node.replies_mut().get_mut(index)?;
    }
    Some(node)
}

impl<'a> IntoIterator for &'a MessageStore {
    type Item = (usize, &'a Message);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for MessageStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(_, message)| message.to_record()))
    }
}

impl<'de> Deserialize<'de> for MessageStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<MessageRecord>::deserialize(deserializer)?;
        Self::from_records(records).map_err(serde::de::Error::custom)
    }
}

/// Single chain `depth` replies deep, built without going through
/// [`MessageStore::append_reply`]. Returns the store and the deepest id.
#[cfg(test)]
pub(crate) fn linear_thread(depth: usize) -> (MessageStore, Uuid) {
    let mut chain = vec![Message::new("root", Sender::User)];
    for level in 0..depth {
        let parent = chain[chain.len() - 1].id();
        chain.push(Message::reply(parent, format!("level {level}"), Sender::Agent));
    }
    let deepest = chain[chain.len() - 1].id();

    let mut node = chain.pop().expect("chain has a root");
    while let Some(mut parent) = chain.pop() {
        parent.push_reply(node);
        node = parent;
    }
    (
        MessageStore {
            roots: vec![node],
            revision: 0,
        },
        deepest,
    )
}
