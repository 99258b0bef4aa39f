use gloo_timers::callback::Timeout;
use yew::{Callback, Html, Properties, classes, function_component, html, use_effect_with};

use crate::models::toast::Toast;

/// How long a toast stays on screen before dismissing itself.
pub const TOAST_DURATION_MS: u32 = 3000;

#[derive(Properties, PartialEq)]
pub struct ToastViewProps {
    pub toast: Option<Toast>,
    pub on_dismiss: Callback<()>,
}

#[function_component(ToastView)]
pub fn toast_view(props: &ToastViewProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(props.toast.clone(), move |toast| {
            let timeout = toast
                .is_some()
                .then(|| Timeout::new(TOAST_DURATION_MS, move || on_dismiss.emit(())));
            move || drop(timeout)
        });
    }

    let Some(toast) = props.toast.as_ref() else {
        return Html::default();
    };

    html! {
        <div class="toast toast-top toast-end">
            <div class={classes!("alert", toast.kind.alert_class())} role="alert">
                <span>{ toast.message.clone() }</span>
            </div>
        </div>
    }
}
