use crate::{api::shared_client, models::app_state::AppState, routes::MainRoute};
use i18nrs::yew::use_translation;
use shared::models::{LoginForm, LoginRejection};
use shared::navigation::landing_page;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::hooks::use_navigator;
use yewdux::prelude::use_store;

/// Why the last sign-in attempt did not go through.
#[derive(Debug, Clone, PartialEq)]
enum LoginFailure {
    Rejected(LoginRejection),
    Profile,
}

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let (i18n, ..) = use_translation();
    let (state, dispatch) = use_store::<AppState>();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let failure = use_state(|| None::<LoginFailure>);
    let loading = use_state(|| false);
    let navigator = use_navigator();

    // Returning users with a live session skip the form.
    {
        let navigator = navigator.clone();
        let profile = state.profile.clone();
        use_effect_with(profile, move |profile| {
            if let (Some(profile), Some(navigator)) = (profile, &navigator)
                && shared_client().session().is_active()
            {
                navigator.push(&MainRoute::from(landing_page(profile.leader)));
            }
            || ()
        });
    }

    let onsubmit = {
        let username_handle = username.clone();
        let password_handle = password.clone();
        let failure_handle = failure.clone();
        let loading_handle = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let form = LoginForm {
                username: (*username_handle).clone(),
                password: (*password_handle).clone(),
            };
            loading_handle.set(true);
            failure_handle.set(None);
            let loading_ref = loading_handle.clone();
            let failure_ref = failure_handle.clone();
            let dispatch = dispatch.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                let client = shared_client();
                let outcome = match client.login(&form).await {
                    Ok(_) => client.me().await.map_err(|err| {
                        tracing::warn!(error = %err, "profile fetch after login failed");
                        LoginFailure::Profile
                    }),
                    Err(err) => Err(LoginFailure::Rejected(LoginRejection::classify(&err))),
                };
                loading_ref.set(false);
                match outcome {
                    Ok(profile) => {
                        let landing = MainRoute::from(landing_page(profile.leader));
                        dispatch.reduce_mut(|state| state.profile = Some(profile));
                        if let Some(nav) = navigator {
                            nav.push(&landing);
                        }
                    }
                    Err(reason) => failure_ref.set(Some(reason)),
                }
            });
        })
    };

    let on_username_change = {
        let username = username.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                username.set(input.value());
            }
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                password.set(input.value());
            }
        })
    };

    let message = (*failure).as_ref().map(|failure| match failure {
        LoginFailure::Rejected(LoginRejection::Refused(detail)) if !detail.is_empty() => {
            format!("{} ({detail})", i18n.t("login.errors.refused"))
        }
        LoginFailure::Rejected(rejection) => i18n.t(rejection.i18n_key()),
        LoginFailure::Profile => i18n.t("selection.notice.load_failed"),
    });
    let is_busy = *loading;
    let disable_submit = (*username).is_empty() || (*password).is_empty() || is_busy;

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" onsubmit={onsubmit}>
                    <h2 class="card-title text-2xl">{i18n.t("login.title")}</h2>
                    if let Some(message) = message {
                        <div class="alert alert-error">
                            <span>{message}</span>
                        </div>
                    }
                    <div class="form-control">
                        <label class="label" for="username">
                            <span class="label-text">{i18n.t("login.username")}</span>
                        </label>
                        <input
                            id="username"
                            class="input input-bordered"
                            type="text"
                            autocomplete="username"
                            required=true
                            value={(*username).clone()}
                            oninput={on_username_change}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="password">
                            <span class="label-text">{i18n.t("login.password")}</span>
                        </label>
                        <input
                            id="password"
                            class="input input-bordered"
                            type="password"
                            autocomplete="current-password"
                            required=true
                            value={(*password).clone()}
                            oninput={on_password_change}
                        />
                    </div>
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" type="submit" disabled={disable_submit}>
                            {if is_busy { i18n.t("login.submitting") } else { i18n.t("login.submit") }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
