use crate::routes::{MainRoute, switch};
use yew::suspense::Suspense;
use yew::{Html, function_component, html};
use yew_router::prelude::*;
use yewdux::YewduxRoot;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <YewduxRoot>
            <Suspense fallback={ html!{ <crate::components::loading::Loading/> } }>
                <BrowserRouter>
                    <Switch<MainRoute> render={switch} />
                </BrowserRouter>
            </Suspense>
        </YewduxRoot>
    }
}
