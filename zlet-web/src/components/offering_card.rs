use i18nrs::yew::use_translation;
use shared::models::{Offering, OfferingId};
use yew::{Callback, Html, MouseEvent, Properties, classes, function_component, html};

fn detail(label: String, value: Option<&str>) -> Html {
    value.filter(|text| !text.is_empty()).map_or_else(
        || html! {},
        |text| {
            html! {
                <p class="text-sm"><span class="font-semibold">{label}</span>{" "}{text.to_string()}</p>
            }
        },
    )
}

#[derive(Properties, PartialEq)]
pub struct OfferingCardProps {
    pub offering: Offering,
    pub selected: bool,
    #[prop_or_default]
    pub disabled: bool,
    pub on_select: Callback<OfferingId>,
}

/// A trail or activity the user can pick.
#[function_component(OfferingCard)]
pub fn offering_card(props: &OfferingCardProps) -> Html {
    let (i18n, ..) = use_translation();
    let offering = &props.offering;

    let onclick = {
        let on_select = props.on_select.clone();
        let id = offering.id;
        let disabled = props.disabled;
        Callback::from(move |_: MouseEvent| {
            if !disabled {
                on_select.emit(id);
            }
        })
    };
    let free_spots = offering.free_spots.map(|spots| spots.to_string());
    let border = if props.selected {
        "border-primary"
    } else {
        "border-base-300"
    };

    html! {
        <div
            class={classes!("card", "bg-base-100", "border-2", "shadow-sm", "cursor-pointer", border)}
            {onclick}
        >
            <div class="card-body p-4 gap-1">
                <h3 class="card-title text-lg">
                    if props.selected {
                        <i class="fa-solid fa-circle-check text-primary"></i>
                    }
                    {&offering.name}
                </h3>
                <p class="text-sm whitespace-pre-line">{&offering.description}</p>
                { detail(i18n.t("selection.free_spots"), free_spots.as_deref()) }
                { detail(i18n.t("selection.equipment"), offering.equipment.as_deref()) }
                { detail(i18n.t("selection.location"), offering.location.as_deref()) }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AppliedCardProps {
    pub offering: Option<Offering>,
}

/// The offering the user is already registered for.
#[function_component(AppliedCard)]
pub fn applied_card(props: &AppliedCardProps) -> Html {
    let (i18n, ..) = use_translation();

    let Some(offering) = &props.offering else {
        return html! {
            <div class="alert alert-info">
                <span>{i18n.t("selection.no_activity_for_day")}</span>
            </div>
        };
    };

    html! {
        <div class="card bg-base-100 border-2 border-success shadow-sm">
            <div class="card-body p-4 gap-1">
                <span class="badge badge-success">{i18n.t("selection.applied")}</span>
                <h3 class="card-title text-lg">{&offering.name}</h3>
                <p class="text-sm whitespace-pre-line">{&offering.description}</p>
                { detail(i18n.t("selection.equipment"), offering.equipment.as_deref()) }
                { detail(i18n.t("selection.location"), offering.location.as_deref()) }
            </div>
        </div>
    }
}
