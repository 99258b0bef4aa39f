pub mod chat_state;
pub mod toast;
