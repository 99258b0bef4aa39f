use strum::IntoEnumIterator;
use yew::{Html, Properties, function_component, html};
use yew_icons::{Icon, IconId};

use crate::components::nav_item::NavItem;
use crate::routes::MainRoute;

#[derive(Properties, PartialEq, Eq)]
pub struct SidebarProps {
    #[prop_or_default]
    pub current_route: Option<MainRoute>,
}

/// Persistent navigation between the dashboard screens.
#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    html! {
        <aside class="w-60 shrink-0 min-h-screen bg-base-200 border-r border-base-300">
            <div class="flex items-center gap-2 px-5 py-6 text-xl font-bold">
                <Icon icon_id={IconId::HeroiconsSolidSparkles} class="w-6 h-6 text-primary" />
                <span>{"Atlas"}</span>
            </div>
            <ul class="menu w-full gap-1 px-3">
                { for MainRoute::iter().filter(MainRoute::in_navigation).map(|route| html! {
                    <NavItem {route} current_route={props.current_route.clone()} />
                }) }
            </ul>
        </aside>
    }
}
