use yew::{Html, Properties, classes, function_component, html};
use yew_icons::Icon;
use yew_router::prelude::Link;

use crate::routes::MainRoute;

#[derive(Properties, PartialEq, Eq)]
pub struct NavItemProps {
    pub route: MainRoute,
    #[prop_or_default]
    pub current_route: Option<MainRoute>,
}

#[function_component(NavItem)]
pub fn nav_item(props: &NavItemProps) -> Html {
    let active_route_class = if props.current_route.as_ref() == Some(&props.route) {
        "menu-active"
    } else {
        ""
    };

    html! {
      <li>
          <Link<MainRoute> to={props.route.clone()} classes={classes!("gap-3", active_route_class)}>
              <Icon icon_id={props.route.icon()} class="w-5 h-5" />
              { props.route.title() }
          </Link<MainRoute>>
      </li>
    }
}
