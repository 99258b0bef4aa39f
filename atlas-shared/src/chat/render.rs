//! Projection of the message forest into displayable view nodes.

use std::fmt;
use uuid::Uuid;

use super::expansion::ExpansionSet;
use crate::models::tree::{self, Branching};
use crate::models::{Message, MessageKind, Sender, Timestamp};

/// One displayed message. `children` is populated only for expanded threads.
///
/// Like [`Message`], drop, clone and equality run on an explicit stack.
pub struct ViewNode {
    /// Id of the message this node shows.
    pub id: Uuid,
    /// Id of the message it replies to; `None` for top-level messages.
    pub parent_id: Option<Uuid>,
    /// Message body.
    pub text: String,
    /// Author of the message.
    pub sender: Sender,
    /// Regular text or a failed-request notice.
    pub kind: MessageKind,
    /// When the message was created.
    pub timestamp: Timestamp,
    /// Nesting level; top-level messages are 0.
    pub depth: usize,
    /// Number of direct replies, whether or not they are shown.
    pub reply_count: usize,
    /// Whether the thread under this message is open.
    pub expanded: bool,
    /// Rendered direct replies; empty unless expanded.
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    fn leaf(message: &Message, depth: usize, expanded: bool) -> Self {
        Self {
            id: message.id(),
            parent_id: message.parent_id(),
            text: message.text().to_string(),
            sender: message.sender(),
            kind: message.kind(),
            timestamp: *message.timestamp(),
            depth,
            reply_count: message.replies().len(),
            expanded,
            children: Vec::new(),
        }
    }

    /// Copy of this node alone, for row-per-message views.
    #[must_use]
    pub fn without_children(&self) -> Self {
        Self {
            id: self.id,
            parent_id: self.parent_id,
            text: self.text.clone(),
            sender: self.sender,
            kind: self.kind,
            timestamp: self.timestamp,
            depth: self.depth,
            reply_count: self.reply_count,
            expanded: self.expanded,
            children: Vec::new(),
        }
    }

    /// Whether the message has replies to expand.
    #[must_use]
    pub const fn has_replies(&self) -> bool {
        self.reply_count > 0
    }
}

impl Branching for ViewNode {
    fn branches(&self) -> &[Self] {
        &self.children
    }

    fn branches_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    fn detached(&self) -> Self {
        self.without_children()
    }

    fn same_node(&self, other: &Self) -> bool {
        self.id == other.id
            && self.parent_id == other.parent_id
            && self.text == other.text
            && self.sender == other.sender
            && self.kind == other.kind
            && self.timestamp == other.timestamp
            && self.depth == other.depth
            && self.reply_count == other.reply_count
            && self.expanded == other.expanded
    }
}

impl Drop for ViewNode {
    fn drop(&mut self) {
        tree::dismantle(self);
    }
}

impl Clone for ViewNode {
    fn clone(&self) -> Self {
        tree::deep_clone(self)
    }
}

impl PartialEq for ViewNode {
    fn eq(&self, other: &Self) -> bool {
        tree::deep_eq(self, other)
    }
}

impl Eq for ViewNode {}

impl fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewNode")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("sender", &self.sender)
            .field("depth", &self.depth)
            .field("reply_count", &self.reply_count)
            .field("expanded", &self.expanded)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

/// Renders `roots` into view nodes, descending into a message's replies only
/// when it is expanded and has replies. Pure; safe to call on every change.
#[must_use]
pub fn render(roots: &[Message], expansion: &ExpansionSet) -> Vec<ViewNode> {
    let mut rendered: Vec<ViewNode> = Vec::new();
    // Ancestors of the node being visited; `open[d]` sits at depth `d`.
    let mut open: Vec<ViewNode> = Vec::new();

    for (depth, message) in visible(roots, expansion) {
        while open.len() > depth {
            let Some(done) = open.pop() else { break };
            attach(&mut open, &mut rendered, done);
        }
        open.push(ViewNode::leaf(
            message,
            depth,
            expansion.is_expanded(message.id()),
        ));
    }
    while let Some(done) = open.pop() {
        attach(&mut open, &mut rendered, done);
    }

    rendered
}

/// Pre-order listing of a rendered forest, for list-style views that indent
/// by [`ViewNode::depth`].
#[must_use]
pub fn flatten(nodes: &[ViewNode]) -> Vec<&ViewNode> {
    let mut rows = Vec::new();
    let mut frames: Vec<(&[ViewNode], usize)> = vec![(nodes, 0)];
    while let Some(&(level, cursor)) = frames.last() {
        let top = frames.len() - 1;
        let Some(node) = level.get(cursor) else {
            frames.pop();
            continue;
        };
        frames[top].1 = cursor + 1;
        rows.push(node);
        if !node.children.is_empty() {
            frames.push((node.children.as_slice(), 0));
        }
    }
    rows
}

fn attach(open: &mut [ViewNode], rendered: &mut Vec<ViewNode>, node: ViewNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => rendered.push(node),
    }
}

fn visible<'a>(roots: &'a [Message], expansion: &ExpansionSet) -> Vec<(usize, &'a Message)> {
    let mut out = Vec::new();
    let mut frames: Vec<(&'a [Message], usize)> = vec![(roots, 0)];
    while let Some(&(level, cursor)) = frames.last() {
        let top = frames.len() - 1;
        let Some(message) = level.get(cursor) else {
            frames.pop();
            continue;
        };
        frames[top].1 = cursor + 1;
        out.push((top, message));
        if expansion.is_expanded(message.id()) && !message.replies().is_empty() {
            frames.push((message.replies(), 0));
        }
    }
    out
}
