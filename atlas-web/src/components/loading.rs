use yew::{Html, Properties, function_component, html};
use yew_icons::{Icon, IconId};

#[derive(Properties, PartialEq, Eq)]
pub struct LoadingProps {
    /// What is being waited on, shown under the brand line.
    #[prop_or_else(|| "Loading".to_string())]
    pub label: String,
}

#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="flex flex-col items-center justify-center h-full py-10" role="status">
            <div class="bg-base-200 p-6 rounded-lg shadow-md flex flex-col items-center gap-3">
                <div class="text-xl font-medium flex items-center gap-2">
                    <Icon icon_id={IconId::HeroiconsSolidSparkles} class="w-5 h-5 text-primary" />
                    <span>{"Atlas"}</span>
                </div>
                <div class="flex items-center gap-2 text-sm">
                    <span class="loading loading-dots loading-sm"></span>
                    <span>{ props.label.clone() }</span>
                </div>
            </div>
        </div>
    }
}
