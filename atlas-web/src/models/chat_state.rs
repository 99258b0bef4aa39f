use shared::ChatSession;
use yewdux::Store;

use crate::config::FrontendConfig;

/// Conversation shared by every screen. Lives for the lifetime of the tab.
#[derive(Debug, Clone, PartialEq, Eq, Store)]
pub struct ChatState {
    pub session: ChatSession,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            session: ChatSession::with_greeting(FrontendConfig::new().greeting),
        }
    }
}
