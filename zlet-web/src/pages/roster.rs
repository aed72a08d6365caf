use i18nrs::yew::use_translation;
use shared::roster::{self, RosterMachine, RosterView};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::shared_client;
use crate::components::{DayStepper, Loading};
use crate::config::FrontendConfig;

/// Leader view of the group's afternoon applications, one day at a time.
#[function_component(RosterPage)]
pub fn roster_page() -> Html {
    let (i18n, ..) = use_translation();
    let machine = use_mut_ref(|| {
        let config = FrontendConfig::default();
        RosterMachine::new(config.program_days(), config.client.excursion_name)
    });
    let redraw = use_force_update();

    let run = {
        let machine = machine.clone();
        let redraw = redraw.clone();
        Callback::from(move |day: Option<String>| {
            let machine = machine.clone();
            let after = redraw.clone();
            spawn_local(async move {
                let client = shared_client();
                let result = match day {
                    Some(day) => roster::switch_day(&client, &machine, &day).await,
                    None => roster::start(&client, &machine).await,
                };
                if let Err(err) = result
                    && !err.is_unauthorized()
                {
                    tracing::debug!(error = %err, "roster request failed");
                }
                after.force_update();
            });
            redraw.force_update();
        })
    };

    {
        let run = run.clone();
        use_effect_with((), move |()| {
            run.emit(None);
            || ()
        });
    }
    let on_day = run.reform(Some);

    let machine = machine.borrow();
    let on_retry = {
        let day = machine.day().map(ToString::to_string);
        run.reform(move |_: MouseEvent| day.clone())
    };
    let body = match machine.view() {
        RosterView::Loading => html! { <Loading /> },
        RosterView::Failed(_) => html! {
            <div class="alert alert-error" role="alert">
                <span>{i18n.t("selection.notice.load_failed")}</span>
                <button class="btn btn-sm" onclick={on_retry}>{i18n.t("selection.retry")}</button>
            </div>
        },
        RosterView::Empty => html! {
            <div class="alert alert-info">
                <span>{i18n.t("roster.empty")}</span>
            </div>
        },
        RosterView::Excursion { name, description } => html! {
            <div class="card bg-base-100 border-2 border-info shadow-sm">
                <div class="card-body p-4 gap-1">
                    <span class="badge badge-info">{i18n.t("roster.excursion")}</span>
                    <h3 class="card-title text-lg">{name}</h3>
                    <p class="text-sm whitespace-pre-line">{description}</p>
                </div>
            </div>
        },
        RosterView::Table(rows) => html! {
            <div class="overflow-x-auto">
                <table class="table table-zebra">
                    <thead>
                        <tr>
                            <th>{i18n.t("roster.name")}</th>
                            <th>{i18n.t("roster.program")}</th>
                            <th>{i18n.t("roster.equipment")}</th>
                            <th>{i18n.t("roster.location")}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for rows.iter().map(|row| html! {
                            <tr key={row.user_id.to_string()}>
                                <td>{&row.name}</td>
                                <td>{&row.program}</td>
                                <td>{&row.equipment}</td>
                                <td>{&row.location}</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            </div>
        },
    };

    html! {
        <div class="space-y-4">
            <h1 class="text-2xl font-bold">{i18n.t("roster.title")}</h1>
            <DayStepper
                days={machine.days().to_vec()}
                active={machine.day().map(ToString::to_string)}
                applied={machine.applied_days().to_vec()}
                on_select={on_day}
            />
            { body }
        </div>
    }
}
