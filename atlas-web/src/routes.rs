use crate::{containers::layout::Layout, pages::*};
use strum::EnumIter;
use yew::prelude::*;
use yew_icons::IconId;
use yew_router::prelude::*;

/// The main routes
#[derive(Debug, Clone, PartialEq, Eq, Routable, EnumIter)]
pub enum MainRoute {
    #[at("/")]
    Dashboard,
    #[at("/chat")]
    Chat,
    #[at("/settings")]
    Settings,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl MainRoute {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Chat => "Chat",
            Self::Settings => "Settings",
            Self::NotFound => "Not Found",
        }
    }

    pub const fn icon(&self) -> IconId {
        match self {
            Self::Dashboard => IconId::HeroiconsOutlineHome,
            Self::Chat => IconId::HeroiconsOutlineChatBubbleLeftRight,
            Self::Settings => IconId::HeroiconsOutlineCog6Tooth,
            Self::NotFound => IconId::HeroiconsOutlineExclamationTriangle,
        }
    }

    /// Whether the route gets an entry in the sidebar.
    pub const fn in_navigation(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Switch function for the main routes.
pub fn switch(route: MainRoute) -> Html {
    web_sys::console::debug_1(&format!("Switching to main route: {route:?}").into());
    let page = match route {
        MainRoute::Dashboard => html! { <DashboardPage /> },
        MainRoute::Chat => html! { <ChatPage /> },
        MainRoute::Settings => html! { <SettingsPage /> },
        MainRoute::NotFound => html! { <ErrorPage /> },
    };
    html! {
        <Layout current_route={route}>
            { page }
        </Layout>
    }
}
