mod chat;
mod dashboard;
mod error;
mod settings;

pub use chat::ChatPage;
pub use dashboard::DashboardPage;
pub use error::ErrorPage;
pub use settings::SettingsPage;
