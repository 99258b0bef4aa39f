use shared::chat::ViewNode;
use shared::{MessageKind, Sender};
use uuid::Uuid;
use yew::{Callback, Html, Properties, classes, function_component, html};

#[derive(Properties, PartialEq, Clone)]
pub struct MessageNodeProps {
    pub node: ViewNode,
    pub on_reply: Callback<Uuid>,
    pub on_toggle: Callback<Uuid>,
    /// Highlights the message the composer is currently replying to.
    #[prop_or(false)]
    pub is_reply_target: bool,
}

const fn bubble_classes(sender: Sender, kind: MessageKind) -> &'static str {
    match (sender, kind) {
        (_, MessageKind::Error) => "bg-error/20 text-error border border-error/40",
        (Sender::User, MessageKind::Text) => "bg-primary text-primary-content",
        (Sender::Agent, MessageKind::Text) => "bg-base-200 text-base-content",
    }
}

const fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "You",
        Sender::Agent => "Agent",
    }
}

#[allow(clippy::cast_precision_loss)]
fn indent_style(depth: usize) -> String {
    let rem = depth as f32 * 1.25;
    format!("margin-left: {rem}rem;")
}

fn toggle_label(node: &ViewNode) -> String {
    match (node.expanded, node.reply_count) {
        (true, _) => "Hide replies".to_string(),
        (false, 1) => "Show 1 reply".to_string(),
        (false, n) => format!("Show {n} replies"),
    }
}

#[function_component(MessageNode)]
pub fn message_node(props: &MessageNodeProps) -> Html {
    let id = props.node.id;

    let reply_callback = {
        let on_reply = props.on_reply.clone();
        Callback::from(move |_| on_reply.emit(id))
    };
    let toggle_callback = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_| on_toggle.emit(id))
    };

    let classes = classes!(
        "rounded-xl",
        "px-4",
        "py-3",
        "shadow-sm",
        "whitespace-pre-wrap",
        bubble_classes(props.node.sender, props.node.kind),
        props.is_reply_target.then_some("ring-2 ring-accent"),
    );

    html! {
        <div class="mb-3 space-y-1" style={indent_style(props.node.depth)} data-message-id={id.to_string()}>
            <div class="flex items-center gap-2 text-xs text-base-content/70">
                <span class="font-semibold">{ sender_label(props.node.sender) }</span>
                <span>{ props.node.timestamp.time_of_day() }</span>
            </div>
            <div class={classes}>
                { props.node.text.clone() }
            </div>
            <div class="flex items-center gap-2 text-xs">
                <button
                    class="btn btn-ghost btn-xs"
                    type="button"
                    onclick={reply_callback}
                >
                    {"Reply"}
                </button>
                if props.node.has_replies() {
                    <button
                        class="btn btn-ghost btn-xs"
                        type="button"
                        aria-expanded={props.node.expanded.to_string()}
                        onclick={toggle_callback}
                    >
                        { toggle_label(&props.node) }
                    </button>
                }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ChatSession;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn threaded_root() -> ViewNode {
        let mut session = ChatSession::new();
        let pending = session.submit("Hi", None).unwrap();
        session.complete(&pending, Ok("Hello there".to_string()));
        session.render().remove(0)
    }

    #[wasm_bindgen_test]
    fn toggle_label_reflects_state() {
        let mut node = threaded_root();
        assert_eq!(toggle_label(&node), "Show 1 reply");
        node.reply_count = 4;
        assert_eq!(toggle_label(&node), "Show 4 replies");
        node.expanded = true;
        assert_eq!(toggle_label(&node), "Hide replies");
    }

    #[wasm_bindgen_test]
    fn indentation_grows_with_depth() {
        assert_eq!(indent_style(0), "margin-left: 0rem;");
        assert_eq!(indent_style(2), "margin-left: 2.5rem;");
    }

    #[wasm_bindgen_test]
    async fn renders_reply_and_toggle_controls() {
        let html = yew::LocalServerRenderer::<MessageNode>::with_props(MessageNodeProps {
            node: threaded_root(),
            on_reply: Callback::noop(),
            on_toggle: Callback::noop(),
            is_reply_target: false,
        })
        .render()
        .await;

        assert!(html.contains("Hi"));
        assert!(html.contains("Reply"));
        assert!(html.contains("Show 1 reply"));
    }
}
