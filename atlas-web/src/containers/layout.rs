use crate::containers::sidebar::Sidebar;
use crate::routes::MainRoute;
use web_sys::window;
use yew::{Children, Html, Properties, classes, function_component, html, use_effect_with};

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    #[prop_or_default]
    pub current_route: Option<MainRoute>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    // Adds data-theme attribute to html tag for theme support
    use_effect_with((), |()| {
        if let Some(html_element) = window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
        {
            html_element
                .set_attribute("data-theme", "dark")
                .unwrap_or_default();
        }
        || {}
    });

    html! {
        <div class="min-h-screen bg-base-100 flex">
            <Sidebar current_route={props.current_route.clone()} />
            <div class="flex flex-col flex-grow min-w-0">
                <main class={classes!(
                    "flex-grow",
                    "p-4",
                    "transition-all",
                    "duration-300"
                )}>
                    {props.children.clone()}
                </main>
                <footer class="footer footer-center p-4 border-t border-base-300 text-base-content">
                    <div>
                        <p>{"Atlas · Powered by Rust, Yew and DaisyUI"}</p>
                    </div>
                </footer>
            </div>
        </div>
    }
}
