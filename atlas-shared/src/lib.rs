#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]
#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::multiple_crate_versions)]

//! Domain core of the Atlas chat dashboard: message models, the threaded
//! message store, the chat session controller, and the backend client shared
//! by the terminal and browser front ends.

pub mod api;
pub mod chat;
pub mod config;
pub mod models;

pub use api::{ApiError, ApiResult, AtlasClient};
pub use chat::{ChatError, ChatSession, ExpansionSet, MessageStore, PendingReply, StoreError};
pub use models::{Message, MessageKind, Sender, Settings, SettingsError};
