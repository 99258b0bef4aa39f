use crate::routes::MainRoute;
use yew::{Html, function_component, html};
use yew_icons::{Icon, IconId};
use yew_router::prelude::*;

/// Shown for any path no route matches.
#[function_component(ErrorPage)]
pub fn error_page() -> Html {
    html! {
        <div class="hero min-h-[60vh]">
            <div class="hero-content text-center">
                <div class="max-w-md space-y-4">
                    <Icon icon_id={IconId::HeroiconsOutlineExclamationTriangle} class="w-16 h-16 mx-auto text-warning" />
                    <h1 class="text-4xl font-bold">{ "Page not found" }</h1>
                    <p>{ "The page you are looking for does not exist." }</p>
                    <Link<MainRoute> to={MainRoute::Dashboard} classes="btn btn-primary">
                        { "Back to Dashboard" }
                    </Link<MainRoute>>
                </div>
            </div>
        </div>
    }
}
