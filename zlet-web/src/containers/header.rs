use crate::{
    api::shared_client,
    components::{header_nav_item::HeaderNavItem, language_selector::LanguageSelector},
    models::app_state::AppState,
    routes::MainRoute,
};
use i18nrs::yew::use_translation;
use shared::navigation::{landing_page, pages_for};
use yew::prelude::*;
use yew_router::prelude::{Link, use_navigator};
use yewdux::prelude::use_store;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    #[prop_or_default]
    pub current_route: Option<MainRoute>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let (i18n, ..) = use_translation();
    let (state, dispatch) = use_store::<AppState>();
    let navigator = use_navigator();

    // Until the profile arrives no role is known, so no page is offered.
    let pages = state
        .profile
        .as_ref()
        .map(|profile| pages_for(profile.leader))
        .unwrap_or_default();
    let home = state.profile.as_ref().map_or(MainRoute::Login, |profile| {
        MainRoute::from(landing_page(profile.leader))
    });

    let on_logout = Callback::from(move |_: MouseEvent| {
        shared_client().logout();
        dispatch.reduce_mut(|state| state.profile = None);
        if let Some(navigator) = &navigator {
            navigator.push(&MainRoute::Login);
        }
    });

    let render_pages = || -> Html {
        html! {
            { for pages.iter().map(|page| html! {
                <HeaderNavItem page={*page} current_route={props.current_route} />
            }) }
        }
    };

    html! {
        <nav class="navbar justify-between bg-base-300">
            <Link<MainRoute> to={home} classes="btn btn-ghost text-lg">
                {i18n.t("app.title")}
            </Link<MainRoute>>
            <div class="dropdown dropdown-end sm:hidden">
                <button class="btn btn-soft">
                <i class="fa-solid fa-bars text-lg"></i>
                </button>
                <ul
                tabindex="0"
                class="dropdown-content menu z-[1] bg-base-200 p-6 rounded-box shadow w-56 gap-2"
                >
                { render_pages() }
                </ul>
            </div>
            <ul class="hidden menu sm:menu-horizontal">
                { render_pages() }
            </ul>
            <div class="flex items-center gap-2">
                <LanguageSelector />
                {
                    state.profile.as_ref().map_or_else(
                        || html! {},
                        |profile| html! {
                            <span class="hidden sm:inline text-sm text-base-content/80">
                                { profile.display_name() }
                            </span>
                        },
                    )
                }
                <button class="btn btn-ghost btn-sm" onclick={on_logout}>
                    <i class="fa-solid fa-right-from-bracket"></i>
                    <span class="hidden sm:inline">{i18n.t("nav.logout")}</span>
                </button>
            </div>
        </nav>
    }
}
