use web_sys::HtmlTextAreaElement;
use yew::{Callback, Html, Properties, TargetCast, classes, function_component, html};
use yew_icons::{Icon, IconId};

#[derive(Properties, PartialEq, Clone)]
pub struct ThreadComposerProps {
    pub text: String,
    pub on_text_change: Callback<String>,
    pub on_submit: Callback<()>,
    /// Excerpt of the message being replied to, if any.
    #[prop_or_default]
    pub replying_to: Option<String>,
    #[prop_or_default]
    pub on_cancel_reply: Callback<()>,
}

#[function_component(ThreadComposer)]
pub fn thread_composer(props: &ThreadComposerProps) -> Html {
    let on_change = {
        let on_text_change = props.on_text_change.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let target: HtmlTextAreaElement = event.target_unchecked_into();
            on_text_change.emit(target.value());
        })
    };

    // Enter sends; Shift+Enter falls through and inserts a newline.
    let on_keydown = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: yew::events::KeyboardEvent| {
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                on_submit.emit(());
            }
        })
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: yew::events::SubmitEvent| {
            event.prevent_default();
            on_submit.emit(());
        })
    };

    let on_cancel = {
        let on_cancel = props.on_cancel_reply.clone();
        Callback::from(move |_| on_cancel.emit(()))
    };

    let placeholder = if props.replying_to.is_some() {
        "Write a reply..."
    } else {
        "Type your message..."
    };

    html! {
        <form class="space-y-3" onsubmit={on_submit}>
            if let Some(excerpt) = props.replying_to.clone() {
                <div class="alert alert-info py-2 text-sm flex justify-between">
                    <span class="truncate">{ format!("Replying to: {excerpt}") }</span>
                    <button
                        class="btn btn-ghost btn-xs"
                        type="button"
                        onclick={on_cancel}
                    >
                        {"Cancel"}
                    </button>
                </div>
            }
            <textarea
                class={classes!("textarea", "textarea-bordered", "w-full", "min-h-[6rem]")}
                {placeholder}
                value={props.text.clone()}
                oninput={on_change}
                onkeydown={on_keydown}
            />
            <div class="flex items-center justify-end">
                <button
                    class="btn btn-primary gap-2"
                    type="submit"
                    disabled={props.text.trim().is_empty()}
                >
                    <Icon icon_id={IconId::HeroiconsSolidPaperAirplane} class="w-4 h-4" />
                    {"Send"}
                </button>
            </div>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn props(replying_to: Option<&str>) -> ThreadComposerProps {
        ThreadComposerProps {
            text: String::new(),
            on_text_change: Callback::noop(),
            on_submit: Callback::noop(),
            replying_to: replying_to.map(str::to_string),
            on_cancel_reply: Callback::noop(),
        }
    }

    #[wasm_bindgen_test]
    async fn reply_banner_only_when_replying() {
        let idle = yew::LocalServerRenderer::<ThreadComposer>::with_props(props(None))
            .render()
            .await;
        assert!(!idle.contains("Replying to"));
        assert!(idle.contains("Type your message..."));

        let replying = yew::LocalServerRenderer::<ThreadComposer>::with_props(props(Some("Hi")))
            .render()
            .await;
        assert!(replying.contains("Replying to: Hi"));
        assert!(replying.contains("Cancel"));
    }
}
