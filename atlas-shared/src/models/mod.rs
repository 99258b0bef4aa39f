//! Data types shared by the store, the backend client and both front ends.

pub mod chat;
pub mod dashboard;
pub mod errors;
pub mod message;
pub mod settings;
pub mod timestamp;
pub(crate) mod tree;

pub use chat::{ChatRequest, ChatResponse};
pub use dashboard::{DashboardSnapshot, MetricCard, RecentActivity};
pub use errors::ErrorResponse;
pub use message::{Message, MessageKind, Sender};
pub use settings::{
    MAX_TOKENS_RANGE, MEMORY_RETENTION_RANGE, Settings, SettingsError, SettingsPatch,
    TEMPERATURE_RANGE,
};
pub use timestamp::Timestamp;
