use crate::api::shared_client;
use crate::components::ToastView;
use crate::components::loading::Loading;
use crate::models::toast::Toast;
use shared::{ApiError, Settings};
use shared::models::{MAX_TOKENS_RANGE, MEMORY_RETENTION_RANGE};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::{
    Callback, Html, TargetCast, UseStateHandle, function_component, html, use_effect_with,
    use_state,
};

/// Editable settings fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsField {
    Temperature,
    MaxTokens,
    EnableMemory,
    ApiEndpoint,
    MemoryRetention,
}

impl SettingsField {
    /// Writes the raw input value into `settings`. Unparseable numbers are ignored.
    fn apply(self, settings: &mut Settings, raw: &str) {
        match self {
            Self::Temperature => {
                if let Ok(value) = raw.parse() {
                    settings.model_temperature = value;
                }
            }
            Self::MaxTokens => {
                if let Ok(value) = raw.parse() {
                    settings.max_tokens = value;
                }
            }
            Self::EnableMemory => settings.enable_memory = raw == "true",
            Self::ApiEndpoint => settings.api_endpoint = raw.trim().to_string(),
            Self::MemoryRetention => {
                if let Ok(value) = raw.parse() {
                    settings.memory_retention = value;
                }
            }
        }
    }
}

/// Toast text for a failed backend call; suggests retrying when that may help.
fn failure_notice(action: &str, err: &ApiError) -> String {
    if err.is_transient() {
        format!("Error {action}. The server may be busy, try again shortly.")
    } else {
        format!("Error {action}")
    }
}

fn field_callback(
    settings: &UseStateHandle<Option<Settings>>,
    field: SettingsField,
) -> Callback<yew::events::InputEvent> {
    let settings = settings.clone();
    Callback::from(move |event: yew::events::InputEvent| {
        let input: HtmlInputElement = event.target_unchecked_into();
        if let Some(mut next) = (*settings).clone() {
            field.apply(&mut next, &input.value());
            settings.set(Some(next));
        }
    })
}

/// `SettingsPage` page component
#[function_component(SettingsPage)]
#[allow(clippy::too_many_lines)]
pub fn settings_page() -> Html {
    let settings = use_state(|| None::<Settings>);
    let toast = use_state(|| None::<Toast>);
    let saving = use_state(|| false);

    {
        let settings = settings.clone();
        let toast = toast.clone();
        use_effect_with((), move |()| {
            spawn_local(async move {
                match shared_client().fetch_settings().await {
                    Ok(loaded) => settings.set(Some(loaded)),
                    Err(err) => {
                        web_sys::console::warn_1(&format!("Error loading settings: {err}").into());
                        settings.set(Some(Settings::default()));
                        toast.set(Some(Toast::error(failure_notice("loading settings", &err))));
                    }
                }
            });
            || ()
        });
    }

    let on_dismiss = {
        let toast = toast.clone();
        Callback::from(move |()| toast.set(None))
    };

    let Some(current) = (*settings).clone() else {
        return html! { <Loading label="Loading settings" /> };
    };

    let on_memory_change = {
        let settings = settings.clone();
        Callback::from(move |event: yew::events::Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            if let Some(mut next) = (*settings).clone() {
                SettingsField::EnableMemory.apply(&mut next, &input.checked().to_string());
                settings.set(Some(next));
            }
        })
    };

    let on_save = {
        let toast = toast.clone();
        let saving = saving.clone();
        let current = current.clone();
        Callback::from(move |event: yew::events::SubmitEvent| {
            event.prevent_default();
            if let Err(err) = current.validate() {
                toast.set(Some(Toast::error(err.to_string())));
                return;
            }

            saving.set(true);
            let toast = toast.clone();
            let saving = saving.clone();
            let to_save = current.clone();
            spawn_local(async move {
                match shared_client().save_settings(&to_save).await {
                    Ok(()) => toast.set(Some(Toast::success("Settings saved successfully"))),
                    Err(err) => {
                        web_sys::console::warn_1(&format!("Error saving settings: {err}").into());
                        toast.set(Some(Toast::error(failure_notice("saving settings", &err))));
                    }
                }
                saving.set(false);
            });
        })
    };

    html! {
        <div class="p-4 space-y-6 max-w-2xl">
            <h1 class="text-2xl font-bold">{ "Settings" }</h1>
            <ToastView toast={(*toast).clone()} {on_dismiss} />

            <form class="space-y-6" onsubmit={on_save}>
                <div class="card bg-base-200 shadow">
                    <div class="card-body space-y-4">
                        <h2 class="card-title">{ "Model Configuration" }</h2>
                        <label class="form-control w-full">
                            <span class="label-text">{ format!("Temperature: {:.1}", current.model_temperature) }</span>
                            <input
                                type="range" class="range range-primary"
                                min="0" max="1" step="0.1"
                                value={current.model_temperature.to_string()}
                                oninput={field_callback(&settings, SettingsField::Temperature)}
                            />
                        </label>
                        <label class="form-control w-full">
                            <span class="label-text">{ format!("Max Tokens: {}", current.max_tokens) }</span>
                            <input
                                type="range" class="range range-primary"
                                min={MAX_TOKENS_RANGE.start().to_string()}
                                max={MAX_TOKENS_RANGE.end().to_string()}
                                step="100"
                                value={current.max_tokens.to_string()}
                                oninput={field_callback(&settings, SettingsField::MaxTokens)}
                            />
                        </label>
                    </div>
                </div>

                <div class="card bg-base-200 shadow">
                    <div class="card-body space-y-4">
                        <h2 class="card-title">{ "Memory" }</h2>
                        <label class="label cursor-pointer justify-start gap-3">
                            <input
                                type="checkbox" class="toggle toggle-primary"
                                checked={current.enable_memory}
                                onchange={on_memory_change}
                            />
                            <span class="label-text">{ "Enable Memory" }</span>
                        </label>
                        <label class="form-control w-full">
                            <span class="label-text">{ format!("Memory Retention (days): {}", current.memory_retention) }</span>
                            <input
                                type="range" class="range range-secondary"
                                min={MEMORY_RETENTION_RANGE.start().to_string()}
                                max={MEMORY_RETENTION_RANGE.end().to_string()}
                                step="1"
                                disabled={!current.enable_memory}
                                value={current.memory_retention.to_string()}
                                oninput={field_callback(&settings, SettingsField::MemoryRetention)}
                            />
                        </label>
                    </div>
                </div>

                <div class="card bg-base-200 shadow">
                    <div class="card-body space-y-4">
                        <h2 class="card-title">{ "Connection" }</h2>
                        <label class="form-control w-full">
                            <span class="label-text">{ "API Endpoint" }</span>
                            <input
                                type="url" class="input input-bordered w-full"
                                value={current.api_endpoint.clone()}
                                oninput={field_callback(&settings, SettingsField::ApiEndpoint)}
                            />
                        </label>
                    </div>
                </div>

                <div class="flex justify-end">
                    <button class="btn btn-primary" type="submit" disabled={*saving}>
                        if *saving {
                            <span class="loading loading-spinner loading-sm"></span>
                        }
                        { "Save Settings" }
                    </button>
                </div>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn fields_update_their_setting() {
        let mut settings = Settings::default();
        SettingsField::MaxTokens.apply(&mut settings, "1200");
        SettingsField::Temperature.apply(&mut settings, "0.3");
        SettingsField::EnableMemory.apply(&mut settings, "false");
        SettingsField::ApiEndpoint.apply(&mut settings, " http://example.com ");
        SettingsField::MemoryRetention.apply(&mut settings, "45");

        assert_eq!(settings.max_tokens, 1200);
        assert!((settings.model_temperature - 0.3).abs() < f32::EPSILON);
        assert!(!settings.enable_memory);
        assert_eq!(settings.api_endpoint, "http://example.com");
        assert_eq!(settings.memory_retention, 45);
    }

    #[wasm_bindgen_test]
    fn unparseable_numbers_are_ignored() {
        let mut settings = Settings::default();
        SettingsField::MaxTokens.apply(&mut settings, "lots");
        assert_eq!(settings, Settings::default());
    }

    #[wasm_bindgen_test]
    fn out_of_range_field_fails_validation() {
        let mut settings = Settings::default();
        SettingsField::MaxTokens.apply(&mut settings, "50");
        let err = settings.validate().unwrap_err();
        assert_eq!(err.to_string(), "Max tokens must be between 100 and 4000");
    }

    #[wasm_bindgen_test]
    fn failure_notice_suggests_retry_for_server_errors() {
        let busy = failure_notice("saving settings", &ApiError::status(503, "busy"));
        assert!(busy.starts_with("Error saving settings."));
        assert!(busy.contains("try again"));

        let rejected = failure_notice("saving settings", &ApiError::status(400, "bad"));
        assert_eq!(rejected, "Error saving settings");
    }

    #[wasm_bindgen_test]
    async fn page_shows_loading_before_settings_arrive() {
        let html = yew::LocalServerRenderer::<SettingsPage>::new().render().await;
        assert!(html.contains("Loading settings"));
    }
}
