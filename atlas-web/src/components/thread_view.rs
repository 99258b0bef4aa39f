use shared::chat::{ViewNode, flatten};
use uuid::Uuid;
use yew::{Callback, Html, Properties, function_component, html};

use super::message_node::MessageNode;

#[derive(Properties, PartialEq)]
pub struct ThreadViewProps {
    pub nodes: Vec<ViewNode>,
    pub on_reply: Callback<Uuid>,
    pub on_toggle: Callback<Uuid>,
    #[prop_or_default]
    pub reply_target: Option<Uuid>,
}

/// Every visible message, in reading order, indented by thread depth.
#[function_component(ThreadView)]
pub fn thread_view(props: &ThreadViewProps) -> Html {
    if props.nodes.is_empty() {
        return html! {
            <div class="p-6 text-sm text-base-content/70">
                {"No messages yet. Say hello below."}
            </div>
        };
    }

    html! {
        <div class="flex flex-col gap-2">
            { for flatten(&props.nodes).into_iter().map(|row| {
                let node = row.without_children();
                let key = node.id.to_string();
                let is_reply_target = props.reply_target == Some(node.id);
                html! {
                    <MessageNode
                        {key}
                        {is_reply_target}
                        {node}
                        on_reply={props.on_reply.clone()}
                        on_toggle={props.on_toggle.clone()}
                    />
                }
            }) }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ChatSession;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn render(nodes: Vec<ViewNode>) -> String {
        yew::LocalServerRenderer::<ThreadView>::with_props(ThreadViewProps {
            nodes,
            on_reply: Callback::noop(),
            on_toggle: Callback::noop(),
            reply_target: None,
        })
        .render()
        .await
    }

    #[wasm_bindgen_test]
    async fn empty_view_shows_placeholder() {
        assert!(render(Vec::new()).await.contains("No messages yet"));
    }

    #[wasm_bindgen_test]
    async fn collapsed_replies_stay_hidden_until_toggled() {
        let mut session = ChatSession::new();
        let pending = session.submit("Hi", None).unwrap();
        session.complete(&pending, Ok("Threaded answer".to_string()));

        let collapsed = render(session.render()).await;
        assert!(collapsed.contains("Hi"));
        assert!(!collapsed.contains("Threaded answer"));

        session.toggle(pending.message_id);
        let expanded = render(session.render()).await;
        assert!(expanded.contains("Threaded answer"));
        assert!(expanded.contains("margin-left: 1.25rem;"));
    }
}
