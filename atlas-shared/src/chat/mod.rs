//! Threaded conversation core.

pub mod expansion;
pub mod render;
#[cfg(all(feature = "tokio", not(target_arch = "wasm32")))]
pub mod responder;
pub mod session;
pub mod store;

pub use expansion::ExpansionSet;
pub use render::{ViewNode, flatten, render};
#[cfg(all(feature = "tokio", not(target_arch = "wasm32")))]
pub use responder::{Responder, ResponseDriver, SessionEvent, SimulatedResponder};
pub use session::{
    ChatError, ChatSession, DEFAULT_SIMULATED_DELAY, DEFAULT_SIMULATED_REPLY, ERROR_REPLY_TEXT,
    PendingReply,
};
pub use store::{Iter, MessageStore, StoreError};
