use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use i18nrs::yew::use_translation;
use shared::models::OfferingId;
use shared::program::Category;
use shared::selection::{Phase, SelectionMachine, flow};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::shared_client;
use crate::components::{AppliedCard, DayStepper, Loading, OfferingCard};
use crate::config::FrontendConfig;

#[derive(Properties, PartialEq)]
pub struct ApplyPageProps {
    pub category: Category,
}

#[derive(Debug, Clone)]
enum Action {
    Start,
    SwitchDay(String),
    Retry,
    Submit,
    Cancel,
}

async fn perform(machine: Rc<RefCell<SelectionMachine>>, action: Action) {
    let client = shared_client();
    let result = match action {
        Action::Start => flow::start(&client, &machine).await,
        Action::SwitchDay(day) => flow::switch_day(&client, &machine, &day).await,
        Action::Retry => flow::retry(&client, &machine).await,
        Action::Submit => flow::submit(&client, &machine).await,
        Action::Cancel => flow::cancel(&client, &machine, Utc::now()).await,
    };
    // A 401 already sent the browser back to the entry view.
    if let Err(err) = result
        && !err.is_unauthorized()
    {
        tracing::debug!(error = %err, "selection step failed");
    }
}

fn title_key(category: Category) -> &'static str {
    match category {
        Category::Trail => "selection.title.trail",
        Category::Morning => "selection.title.morning",
        Category::Afternoon => "selection.title.afternoon",
    }
}

fn start_note_key(category: Category) -> Option<&'static str> {
    match category {
        Category::Trail => None,
        Category::Morning => Some("selection.morning_start"),
        Category::Afternoon => Some("selection.afternoon_start"),
    }
}

fn apply_key(category: Category) -> &'static str {
    match category {
        Category::Trail => "selection.apply.trail",
        Category::Morning | Category::Afternoon => "selection.apply.program",
    }
}

/// Selection view for trails and the morning or afternoon program.
#[function_component(ApplyPage)]
pub fn apply_page(props: &ApplyPageProps) -> Html {
    let (i18n, ..) = use_translation();
    let category = props.category;
    let machine = use_mut_ref(|| {
        let config = FrontendConfig::default();
        SelectionMachine::new(
            category,
            config.program_days(),
            config.client.cancellation_policy(),
        )
    });
    let redraw = use_force_update();

    let run = {
        let machine = machine.clone();
        let redraw = redraw.clone();
        Callback::from(move |action: Action| {
            let machine = machine.clone();
            let after = redraw.clone();
            spawn_local(async move {
                perform(machine, action).await;
                after.force_update();
            });
            // The render is queued behind the first step of the flow.
            redraw.force_update();
        })
    };

    {
        let run = run.clone();
        use_effect_with(category, move |_| {
            run.emit(Action::Start);
            || ()
        });
    }

    let on_select = {
        let machine = machine.clone();
        let redraw = redraw.clone();
        Callback::from(move |id: OfferingId| {
            if machine.borrow_mut().choose(id) {
                redraw.force_update();
            }
        })
    };
    let on_day = run.reform(Action::SwitchDay);
    let on_submit = run.reform(|_: MouseEvent| Action::Submit);
    let on_cancel = run.reform(|_: MouseEvent| Action::Cancel);
    let on_retry = run.reform(|_: MouseEvent| Action::Retry);
    let on_dismiss = {
        let machine = machine.clone();
        Callback::from(move |_: MouseEvent| {
            machine.borrow_mut().dismiss_notice();
            redraw.force_update();
        })
    };

    let machine = machine.borrow();
    // A failed load is reported by the body together with its retry button.
    let notice = machine
        .notice()
        .filter(|_| !machine.is_failed())
        .map(|notice| i18n.t(notice.i18n_key(category)));

    let body = match machine.phase() {
        Phase::Loading => html! { <Loading /> },
        Phase::Failed(_) => html! {
            <div class="alert alert-error" role="alert">
                <span>{i18n.t("selection.notice.load_failed")}</span>
                <button class="btn btn-sm" onclick={on_retry}>{i18n.t("selection.retry")}</button>
            </div>
        },
        Phase::Applied | Phase::Cancelling => {
            let cancelling = *machine.phase() == Phase::Cancelling;
            html! {
                <div class="space-y-4">
                    <AppliedCard offering={machine.applied_offering().cloned()} />
                    if cancelling || machine.can_cancel(Utc::now()) {
                        <button class="btn btn-error" onclick={on_cancel} disabled={cancelling}>
                            if cancelling {
                                <span class="loading loading-spinner loading-sm"></span>
                            }
                            {i18n.t("selection.cancel")}
                        </button>
                    }
                </div>
            }
        }
        Phase::Choosing | Phase::Submitting => {
            let submitting = *machine.phase() == Phase::Submitting;
            let offerings = machine.selectable_offerings();
            if offerings.is_empty() {
                html! {
                    <div class="alert alert-info">
                        <span>{i18n.t("selection.empty")}</span>
                    </div>
                }
            } else {
                html! {
                    <div class="space-y-4">
                        <div class="grid gap-4 md:grid-cols-2">
                            { for offerings.into_iter().map(|offering| html! {
                                <OfferingCard
                                    key={offering.id.to_string()}
                                    offering={offering.clone()}
                                    selected={machine.selected() == Some(offering.id)}
                                    disabled={submitting}
                                    on_select={on_select.clone()}
                                />
                            }) }
                        </div>
                        <button class="btn btn-primary" onclick={on_submit} disabled={submitting}>
                            if submitting {
                                <span class="loading loading-spinner loading-sm"></span>
                            }
                            {i18n.t(apply_key(category))}
                        </button>
                    </div>
                }
            }
        }
    };

    html! {
        <div class="space-y-4">
            <h1 class="text-2xl font-bold">{i18n.t(title_key(category))}</h1>
            if category.is_day_scoped() {
                <DayStepper
                    days={machine.days().to_vec()}
                    active={machine.day().map(ToString::to_string)}
                    applied={machine.applied_days().to_vec()}
                    on_select={on_day}
                />
            }
            if let Some(key) = start_note_key(category) {
                <p class="text-sm italic">{i18n.t(key)}</p>
            }
            if let Some(message) = notice {
                <div class="alert alert-warning" role="alert">
                    <span>{message}</span>
                    <button class="btn btn-ghost btn-xs" onclick={on_dismiss}>{"✕"}</button>
                </div>
            }
            { body }
        </div>
    }
}
