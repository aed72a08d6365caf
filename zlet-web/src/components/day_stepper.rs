use yew::{Callback, Html, MouseEvent, Properties, classes, function_component, html};

#[derive(Properties, PartialEq)]
pub struct DayStepperProps {
    pub days: Vec<String>,
    pub active: Option<String>,
    /// Days that already carry an application; marked with a check.
    #[prop_or_default]
    pub applied: Vec<String>,
    pub on_select: Callback<String>,
}

#[function_component(DayStepper)]
pub fn day_stepper(props: &DayStepperProps) -> Html {
    html! {
        <ul class="steps steps-horizontal w-full mb-4">
            { for props.days.iter().map(|day| {
                let is_active = props.active.as_deref() == Some(day.as_str());
                let is_applied = props.applied.contains(day);
                let onclick = {
                    let on_select = props.on_select.clone();
                    let day = day.clone();
                    Callback::from(move |_: MouseEvent| on_select.emit(day.clone()))
                };
                html! {
                    <li
                        class={classes!("step", "cursor-pointer", is_active.then_some("step-primary"))}
                        data-content={is_applied.then_some("✓")}
                        {onclick}
                    >
                        <span class={classes!(is_active.then_some("font-bold"))}>{day}</span>
                    </li>
                }
            }) }
        </ul>
    }
}
