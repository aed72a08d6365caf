use crate::{
    components::private_route::PrivateRoute,
    containers::layout::Layout,
    pages::{ApplyPage, ErrorPage, LoginPage, RosterPage},
};
use shared::navigation::Page;
use strum::EnumIter;
use yew::prelude::*;
use yew_router::prelude::*;

/// The main routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Routable, EnumIter)]
pub enum MainRoute {
    #[at("/")]
    Login,
    #[at("/prijava-bivak")]
    Trail,
    #[at("/prijava-program-dop")]
    Morning,
    #[at("/prijava-program-pop")]
    Afternoon,
    #[at("/prijave-clani")]
    Roster,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl MainRoute {
    /// Shell page behind the route, if it is one.
    pub const fn page(self) -> Option<Page> {
        match self {
            Self::Trail => Some(Page::Trail),
            Self::Morning => Some(Page::Morning),
            Self::Afternoon => Some(Page::Afternoon),
            Self::Roster => Some(Page::Roster),
            Self::Login | Self::NotFound => None,
        }
    }
}

impl From<Page> for MainRoute {
    fn from(page: Page) -> Self {
        match page {
            Page::Trail => Self::Trail,
            Page::Morning => Self::Morning,
            Page::Afternoon => Self::Afternoon,
            Page::Roster => Self::Roster,
        }
    }
}

fn guarded(route: MainRoute, content: Html) -> Html {
    html! {
        <PrivateRoute page={route.page()}>
            <Layout current_route={route}>
                { content }
            </Layout>
        </PrivateRoute>
    }
}

fn apply(route: MainRoute) -> Html {
    let content = match route.page().and_then(Page::category) {
        Some(category) => html! { <ApplyPage key={category.as_str()} {category} /> },
        None => html! { <ErrorPage /> },
    };
    guarded(route, content)
}

/// Switch function for the main routes.
pub fn switch(route: MainRoute) -> Html {
    tracing::debug!(?route, "switching route");
    match route {
        MainRoute::Login => html! { <LoginPage /> },
        MainRoute::Trail | MainRoute::Morning | MainRoute::Afternoon => apply(route),
        MainRoute::Roster => guarded(route, html! { <RosterPage /> }),
        MainRoute::NotFound => guarded(route, html! { <ErrorPage /> }),
    }
}
