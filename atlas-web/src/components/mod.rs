pub(crate) mod loading;
pub(crate) mod message_node;
pub(crate) mod nav_item;
pub(crate) mod stat_card;
pub(crate) mod thread_composer;
pub(crate) mod thread_view;
pub(crate) mod toast;
pub(crate) mod typing_indicator;

// Re-export components for convenience
pub use stat_card::StatCard;
pub use thread_composer::ThreadComposer;
pub use thread_view::ThreadView;
pub use toast::ToastView;
pub use typing_indicator::TypingIndicator;
