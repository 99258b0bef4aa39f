//! Summary figures for the dashboard screen and the CLI `/stats` command.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Sender, Timestamp};
use crate::chat::ChatSession;

/// Longest excerpt shown for a recent message, in characters.
pub const EXCERPT_LEN: usize = 80;
/// Number of threads listed under recent activity.
pub const RECENT_LIMIT: usize = 3;

/// One stat tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    /// Heading, also the lookup key for [`DashboardSnapshot::card`].
    pub title: String,
    /// Figure shown in large type.
    pub value: String,
    /// Caption under the figure.
    pub description: String,
    /// Percentage shown as a progress bar, when the metric has one.
    pub progress: Option<u8>,
}

impl MetricCard {
    fn new(title: &str, value: usize, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
            description: description.into(),
            progress: None,
        }
    }

    fn with_progress(mut self, progress: Option<u8>) -> Self {
        self.progress = progress;
        self
    }
}

/// A recently started thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivity {
    /// Id of the top-level message.
    pub id: Uuid,
    /// Who started the thread.
    pub sender: Sender,
    /// Start of the message text, at most [`EXCERPT_LEN`] characters.
    pub excerpt: String,
    /// Direct replies so far.
    pub reply_count: usize,
    /// When the thread was started.
    pub timestamp: Timestamp,
}

/// Everything the dashboard shows, computed from one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Stat tiles in display order.
    pub cards: Vec<MetricCard>,
    /// Newest threads first, at most [`RECENT_LIMIT`].
    pub recent: Vec<RecentActivity>,
}

impl DashboardSnapshot {
    /// Counts messages, replies and failures in `session`.
    #[must_use]
    pub fn from_session(session: &ChatSession) -> Self {
        let store = session.store();
        let mut total = 0_usize;
        let mut answered = 0_usize;
        let mut failed = 0_usize;
        for (_, message) in store {
            total += 1;
            match (message.sender(), message.is_error()) {
                (Sender::Agent, true) => failed += 1,
                // Replies only; a top-level agent message is the greeting.
                (Sender::Agent, false) if message.parent_id().is_some() => answered += 1,
                _ => {}
            }
        }

        let success = success_rate(answered, failed);
        let failed_description = success.map_or_else(
            || "No completed requests yet".to_string(),
            |rate| format!("{rate}% success rate"),
        );

        let cards = vec![
            MetricCard::new(
                "Total Conversations",
                store.roots().len(),
                "Top-level threads",
            ),
            MetricCard::new("Messages", total, "Across all threads"),
            MetricCard::new("Agent Replies", answered, "Answered by the assistant"),
            MetricCard::new("Failed Requests", failed, failed_description).with_progress(success),
        ];

        let recent = store
            .roots()
            .iter()
            .rev()
            .take(RECENT_LIMIT)
            .map(|message| RecentActivity {
                id: message.id(),
                sender: message.sender(),
                excerpt: excerpt(message.text()),
                reply_count: message.replies().len(),
                timestamp: *message.timestamp(),
            })
            .collect();

        Self { cards, recent }
    }

    /// Card with the given title.
    #[must_use]
    pub fn card(&self, title: &str) -> Option<&MetricCard> {
        self.cards.iter().find(|card| card.title == title)
    }
}

fn success_rate(answered: usize, failed: usize) -> Option<u8> {
    let completed = answered + failed;
    if completed == 0 {
        return None;
    }
    Some(u8::try_from(answered * 100 / completed).unwrap_or(100))
}

fn excerpt(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_LEN {
        return flat;
    }
    let mut cut: String = flat.chars().take(EXCERPT_LEN - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn empty_session_has_zeroed_cards() {
        let snapshot = DashboardSnapshot::from_session(&ChatSession::new());
        assert_eq!(snapshot.cards.len(), 4);
        assert_eq!(snapshot.card("Messages").unwrap().value, "0");
        let failed = snapshot.card("Failed Requests").unwrap();
        assert_eq!(failed.progress, None);
        assert_eq!(failed.description, "No completed requests yet");
        assert!(snapshot.recent.is_empty());
    }

    #[test]
    fn counts_replies_and_failures() {
        let mut session = ChatSession::with_greeting("Hello!");
        for outcome in [Ok("a".to_string()), Ok("b".to_string()), Ok("c".to_string())] {
            let pending = session.submit("question", None).unwrap();
            session.complete(&pending, outcome);
        }
        let pending = session.submit("doomed", None).unwrap();
        session.complete(&pending, Err(ApiError::status(500, "boom")));

        let snapshot = DashboardSnapshot::from_session(&session);
        assert_eq!(snapshot.card("Total Conversations").unwrap().value, "5");
        assert_eq!(snapshot.card("Messages").unwrap().value, "9");
        assert_eq!(snapshot.card("Agent Replies").unwrap().value, "3");
        let failed = snapshot.card("Failed Requests").unwrap();
        assert_eq!(failed.value, "1");
        assert_eq!(failed.progress, Some(75));
        assert_eq!(failed.description, "75% success rate");
    }

    #[test]
    fn recent_lists_latest_threads_first() {
        let mut session = ChatSession::new();
        for text in ["one", "two", "three", "four"] {
            session.submit(text, None).unwrap();
        }
        let snapshot = DashboardSnapshot::from_session(&session);
        let excerpts: Vec<&str> = snapshot.recent.iter().map(|r| r.excerpt.as_str()).collect();
        assert_eq!(excerpts, ["four", "three", "two"]);
    }

    #[test]
    fn long_text_is_truncated() {
        let long = "word ".repeat(40);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_LEN);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("short\n text"), "short text");
    }
}
