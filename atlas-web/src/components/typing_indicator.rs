use yew::{Html, Properties, function_component, html};

#[derive(Properties, PartialEq, Eq)]
pub struct TypingIndicatorProps {
    /// Replies still outstanding; nothing renders at zero.
    #[prop_or_default]
    pub pending: usize,
}

fn label(pending: usize) -> String {
    match pending {
        0 | 1 => "Agent is typing…".to_string(),
        n => format!("Agent is typing {n} replies…"),
    }
}

#[function_component(TypingIndicator)]
pub fn typing_indicator(props: &TypingIndicatorProps) -> Html {
    if props.pending == 0 {
        return Html::default();
    }

    html! {
        <div class="flex items-center gap-2 text-xs text-base-content/70 py-2" aria-live="polite">
            <span class="loading loading-dots loading-xs"></span>
            { label(props.pending) }
        </div>
    }
}
