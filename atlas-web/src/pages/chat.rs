use crate::api::shared_client;
use crate::components::{ThreadComposer, ThreadView, TypingIndicator};
use crate::config::FrontendConfig;
use crate::models::chat_state::ChatState;
use gloo_timers::future::TimeoutFuture;
use shared::{ApiError, ChatError, PendingReply};
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use yew::{Callback, Html, function_component, html, use_effect_with, use_state};
use yewdux::prelude::{Dispatch, use_store};

const BANNER_EXCERPT_LEN: usize = 60;

/// Shortens a message for the "Replying to" banner.
fn banner_excerpt(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= BANNER_EXCERPT_LEN {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(BANNER_EXCERPT_LEN - 3).collect();
    format!("{cut}...")
}

/// Produces the agent's answer to `prompt`, simulated or from the backend.
async fn fetch_reply(prompt: &str, config: FrontendConfig) -> Result<String, ApiError> {
    if config.simulate {
        TimeoutFuture::new(config.simulated_delay_ms).await;
        return Ok(config.simulated_reply);
    }
    shared_client().send_message(prompt).await
}

/// Awaits the reply for `pending` and threads it into the shared session.
fn spawn_reply(dispatch: Dispatch<ChatState>, pending: PendingReply, config: FrontendConfig) {
    spawn_local(async move {
        let outcome = fetch_reply(&pending.prompt, config).await;
        if let Err(err) = &outcome {
            web_sys::console::warn_1(&format!("Chat request failed: {err}").into());
        }
        dispatch.reduce_mut(|state| {
            state.session.complete(&pending, outcome);
        });
    });
}

/// Threaded chat page component
#[function_component(ChatPage)]
#[allow(clippy::too_many_lines)]
pub fn chat_page() -> Html {
    let (state, dispatch) = use_store::<ChatState>();
    let composer_text = use_state(String::new);
    let reply_target = use_state(|| None::<Uuid>);
    let error_message = use_state(|| None::<String>);

    // Replies still in flight when the page goes away must not land later.
    {
        let dispatch = dispatch.clone();
        use_effect_with((), move |()| {
            move || {
                dispatch.reduce_mut(|state| state.session.invalidate_pending());
            }
        });
    }

    let on_reply = {
        let reply_target = reply_target.clone();
        Callback::from(move |id: Uuid| reply_target.set(Some(id)))
    };

    let on_toggle = {
        let dispatch = dispatch.clone();
        Callback::from(move |id: Uuid| {
            dispatch.reduce_mut(|state| {
                state.session.toggle(id);
            });
        })
    };

    let on_expand_all = {
        let dispatch = dispatch.clone();
        Callback::from(move |_| dispatch.reduce_mut(|state| state.session.expand_all()))
    };

    let on_collapse_all = {
        let dispatch = dispatch.clone();
        Callback::from(move |_| dispatch.reduce_mut(|state| state.session.collapse_all()))
    };

    let on_composer_text = {
        let composer_text = composer_text.clone();
        Callback::from(move |value: String| composer_text.set(value))
    };

    let on_cancel_reply = {
        let reply_target = reply_target.clone();
        Callback::from(move |()| reply_target.set(None))
    };

    let on_submit_message = {
        let composer_text = composer_text.clone();
        let reply_target = reply_target.clone();
        let error = error_message.clone();
        Callback::from(move |()| {
            let text = (*composer_text).clone();
            let parent_id = *reply_target;
            let mut submitted = None;
            dispatch.reduce_mut(|state| {
                submitted = Some(state.session.submit(text, parent_id));
            });

            match submitted {
                Some(Ok(pending)) => {
                    composer_text.set(String::new());
                    reply_target.set(None);
                    error.set(None);
                    spawn_reply(dispatch.clone(), pending, FrontendConfig::new());
                }
                Some(Err(ChatError::EmptyMessage)) | None => {}
                Some(Err(err)) => {
                    reply_target.set(None);
                    error.set(Some(format!("Failed to send message: {err}")));
                }
            }
        })
    };

    let replying_to = (*reply_target)
        .and_then(|id| state.session.store().find(id))
        .map(|message| banner_excerpt(message.text()));

    html! {
        <div class="flex flex-col h-full gap-4 p-4">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">{ "Chat" }</h1>
                <div class="flex gap-2">
                    <button class="btn btn-ghost btn-sm" type="button" onclick={on_expand_all}>
                        {"Expand all"}
                    </button>
                    <button class="btn btn-ghost btn-sm" type="button" onclick={on_collapse_all}>
                        {"Collapse all"}
                    </button>
                </div>
            </div>

            if let Some(message) = (*error_message).clone() {
                <div class="alert alert-error" role="alert">
                    <span>{ message }</span>
                </div>
            }

            <div class="flex-grow overflow-y-auto rounded-box bg-base-100 border border-base-300 p-4">
                <ThreadView
                    nodes={state.session.render()}
                    {on_reply}
                    {on_toggle}
                    reply_target={*reply_target}
                />
                <TypingIndicator pending={state.session.pending_count()} />
            </div>

            <ThreadComposer
                text={(*composer_text).clone()}
                on_text_change={on_composer_text}
                on_submit={on_submit_message}
                {replying_to}
                {on_cancel_reply}
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use yewdux::YewduxRoot;

    wasm_bindgen_test_configure!(run_in_browser);

    #[function_component(ChatHarness)]
    fn chat_harness() -> Html {
        html! {
            <YewduxRoot>
                <ChatPage />
            </YewduxRoot>
        }
    }

    #[wasm_bindgen_test]
    fn banner_excerpt_truncates_long_messages() {
        assert_eq!(banner_excerpt("short  and\nsweet"), "short and sweet");
        let long = "x".repeat(200);
        let excerpt = banner_excerpt(&long);
        assert_eq!(excerpt.chars().count(), BANNER_EXCERPT_LEN);
        assert!(excerpt.ends_with("..."));
    }

    #[wasm_bindgen_test]
    async fn simulated_reply_uses_configured_text() {
        let config = FrontendConfig {
            simulate: true,
            simulated_delay_ms: 0,
            simulated_reply: "canned".to_string(),
            ..FrontendConfig::default()
        };
        assert_eq!(fetch_reply("Hi", config).await.unwrap(), "canned");
    }

    #[wasm_bindgen_test]
    async fn new_conversation_shows_greeting() {
        let html = yew::LocalServerRenderer::<ChatHarness>::new().render().await;
        assert!(html.contains(&FrontendConfig::new().greeting));
        assert!(html.contains("Type your message..."));
        assert!(!html.contains("Agent is typing"));
    }
}
