use shared::navigation::{Page, landing_page};
use shared::session::Access;
use yew::{Children, Html, Properties, function_component, html};
use yew_router::prelude::Redirect;
use yewdux::prelude::use_selector;

use crate::api::shared_client;
use crate::models::app_state::AppState;
use crate::routes::MainRoute;

#[derive(Properties, PartialEq)]
pub struct PrivateRouteProps {
    pub children: Children,
    /// Role-gated page behind the route, if any.
    #[prop_or_default]
    pub page: Option<Page>,
}

/// Renders its children only for an active session whose role may see the page.
#[function_component(PrivateRoute)]
pub fn private_route(props: &PrivateRouteProps) -> Html {
    let profile = use_selector(|state: &AppState| state.profile.clone());

    if shared_client().session().guard() == Access::RedirectToEntry {
        return html! { <Redirect<MainRoute> to={MainRoute::Login} /> };
    }
    if let (Some(page), Some(profile)) = (props.page, (*profile).as_ref())
        && !page.visible_to(profile.leader)
    {
        let landing = MainRoute::from(landing_page(profile.leader));
        tracing::debug!(?page, ?landing, "page hidden for role");
        return html! { <Redirect<MainRoute> to={landing} /> };
    }

    html! { <>{ props.children.clone() }</> }
}
