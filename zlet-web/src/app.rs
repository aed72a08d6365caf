use crate::api::shared_client;
use crate::models::app_state::AppState;
use crate::routes::{MainRoute, switch};
use wasm_bindgen_futures::spawn_local;
use yew::{Html, function_component, html, use_effect_with};
use yew_router::prelude::*;
use yewdux::prelude::use_store;

#[function_component(App)]
pub fn app() -> Html {
    let (state, dispatch) = use_store::<AppState>();

    // A stored token from an earlier visit still needs the role flag.
    {
        let dispatch = dispatch.clone();
        let needs_profile = state.profile.is_none();
        use_effect_with((), move |()| {
            let client = shared_client();
            if needs_profile && client.session().is_active() {
                spawn_local(async move {
                    match client.me().await {
                        Ok(profile) => dispatch.reduce_mut(|state| state.profile = Some(profile)),
                        Err(err) => tracing::warn!(error = %err, "could not load profile"),
                    }
                });
            }
            || ()
        });
    }

    html! {
        <BrowserRouter>
            <Switch<MainRoute> render={switch} />
        </BrowserRouter>
    }
}
