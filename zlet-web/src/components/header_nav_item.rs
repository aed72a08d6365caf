use i18nrs::yew::use_translation;
use shared::navigation::Page;
use yew::{Html, Properties, classes, function_component, html};
use yew_router::prelude::Link;

use crate::routes::MainRoute;

#[derive(Properties, PartialEq, Eq)]
pub struct HeaderNavItemProps {
    pub page: Page,
    pub current_route: Option<MainRoute>,
}

#[function_component(HeaderNavItem)]
pub fn header_nav_item(props: &HeaderNavItemProps) -> Html {
    let (i18n, ..) = use_translation();

    let route = MainRoute::from(props.page);
    let active_route_class = if props.current_route == Some(route) {
        "btn-soft"
    } else {
        ""
    };
    let icon = match props.page {
        Page::Trail => "route",
        Page::Morning => "sun",
        Page::Afternoon => "campground",
        Page::Roster => "users",
    };

    html! {
      <li>
          <Link<MainRoute> to={route} classes={classes!("btn", "btn-ghost", "gap-2", active_route_class)}>
              <i class={classes!("fa-solid", "fa-fw", format!("fa-{icon}"))}></i>
              {i18n.t(props.page.title_key())}
          </Link<MainRoute>>
      </li>
    }
}
