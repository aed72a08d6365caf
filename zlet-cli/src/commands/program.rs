//! Trail and program commands, driven through the shared selection machine.

use std::cell::RefCell;

use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use clap::{Args, Subcommand};
use shared::{
    client::RegistrationApi,
    config::ClientConfig,
    models::{Offering, OfferingId},
    program::Category,
    selection::{Phase, SelectionMachine, flow, flow::FlowError},
};

#[derive(Args, Debug, Clone, Default)]
pub struct DayArg {
    /// Program day (e.g., Pon); defaults to the first day you applied for
    #[arg(long, short)]
    pub day: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TrailAction {
    /// List trails
    List,
    /// Apply for a trail
    Apply {
        /// Trail id as shown by `list`
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum MorningAction {
    /// List activities of a day
    List(DayArg),
    /// Apply for an activity on a day
    Apply {
        /// Activity id as shown by `list`
        id: i64,
        #[command(flatten)]
        day: DayArg,
    },
    /// Show your application for a day
    Status(DayArg),
}

#[derive(Subcommand, Debug)]
pub enum AfternoonAction {
    #[command(flatten)]
    Program(MorningAction),
    /// Cancel your application for a day
    Cancel(DayArg),
}

fn explain(err: FlowError) -> anyhow::Error {
    if err.is_unauthorized() {
        anyhow!("session expired. run `zlet login` to sign in again")
    } else {
        err.into()
    }
}

/// Loads the applied days, then the offerings and application of one day.
pub async fn open<A>(
    api: &A,
    config: &ClientConfig,
    category: Category,
    day: Option<&str>,
) -> Result<RefCell<SelectionMachine>>
where
    A: RegistrationApi + ?Sized,
{
    if let Some(day) = day
        && !config.program_days.iter().any(|known| known == day)
    {
        bail!(
            "unknown day `{day}`; choose one of {}",
            config.program_days.join(", ")
        );
    }

    let machine = RefCell::new(SelectionMachine::new(
        category,
        config.program_days.clone(),
        config.cancellation_policy(),
    ));
    if category.is_day_scoped() {
        flow::refresh_applied_days(api, &machine).await.map_err(explain)?;
    }
    let ticket = {
        let mut machine = machine.borrow_mut();
        let ticket = machine.start();
        match day {
            Some(day) => machine.select_day(day).unwrap_or(ticket),
            None => ticket,
        }
    };
    flow::load(api, &machine, ticket).await.map_err(explain)?;

    if let Phase::Failed(reason) = machine.borrow().phase() {
        bail!("could not load {category}: {reason}");
    }
    Ok(machine)
}

fn day_suffix(machine: &SelectionMachine) -> String {
    machine
        .day()
        .map(|day| format!(" ({day})"))
        .unwrap_or_default()
}

fn describe(offering: &Offering) -> String {
    let mut line = format!("{:>4}  {}", offering.id.0, offering.name);
    if let Some(spots) = offering.free_spots {
        line.push_str(&format!("  [free spots: {spots}]"));
    }
    if let Some(location) = offering.location.as_deref().filter(|text| !text.is_empty()) {
        line.push_str(&format!("  @ {location}"));
    }
    line
}

fn print_days(machine: &SelectionMachine) {
    if !machine.category().is_day_scoped() {
        return;
    }
    let days: Vec<String> = machine
        .days()
        .iter()
        .map(|day| {
            if machine.is_day_applied(day) {
                format!("{day} ✓")
            } else {
                day.clone()
            }
        })
        .collect();
    println!("days: {}", days.join(" | "));
}

fn print_application(machine: &SelectionMachine) {
    match machine.applied_offering() {
        Some(offering) => {
            println!("Applied{}: {}", day_suffix(machine), offering.name);
            if !offering.description.is_empty() {
                println!("  {}", offering.description);
            }
            if let Some(equipment) = offering.equipment.as_deref() {
                println!("  equipment: {equipment}");
            }
            if let Some(location) = offering.location.as_deref() {
                println!("  location: {location}");
            }
        }
        None if machine.application().is_some() => {
            println!("Applied{}, but the offering is no longer listed.", day_suffix(machine));
        }
        None => println!("No application found{}.", day_suffix(machine)),
    }
}

fn print_list(machine: &SelectionMachine) {
    print_days(machine);
    if *machine.phase() == Phase::Applied {
        print_application(machine);
        return;
    }
    let offerings = machine.selectable_offerings();
    if offerings.is_empty() {
        println!("Nothing is open for applications{}.", day_suffix(machine));
        return;
    }
    for offering in offerings {
        println!("{}", describe(offering));
    }
    if let Some(note) = start_note(machine.category()) {
        println!("{note}");
    }
}

fn start_note(category: Category) -> Option<&'static str> {
    match category {
        Category::Trail => None,
        Category::Morning => Some("The morning program starts at 9.00."),
        Category::Afternoon => Some("Unless stated otherwise, the afternoon program starts at 14.30."),
    }
}

/// Chooses `id` and submits it.
pub async fn apply<A>(api: &A, machine: &RefCell<SelectionMachine>, id: OfferingId) -> Result<()>
where
    A: RegistrationApi + ?Sized,
{
    if *machine.borrow().phase() == Phase::Applied {
        let current = machine
            .borrow()
            .applied_offering()
            .map_or_else(|| "an offering".to_string(), |offering| offering.name.clone());
        bail!("already applied for {current}; cancel it first");
    }
    if !machine.borrow_mut().choose(id) {
        bail!("{id} is not open for applications");
    }
    flow::submit(api, machine).await.map_err(explain)?;
    if let Some(notice) = machine.borrow().notice() {
        bail!("{notice}");
    }

    let machine = machine.borrow();
    print_application(&machine);
    Ok(())
}

/// Cancels the application of the machine's day.
pub async fn cancel<A>(api: &A, machine: &RefCell<SelectionMachine>) -> Result<()>
where
    A: RegistrationApi + ?Sized,
{
    let now = Utc::now();
    if !machine.borrow().can_cancel(now) {
        let machine = machine.borrow();
        match machine.applied_offering() {
            _ if *machine.phase() != Phase::Applied => {
                bail!("no application to cancel{}", day_suffix(&machine))
            }
            Some(offering) => bail!("the application for {} can no longer be cancelled", offering.name),
            None => bail!("the application can no longer be cancelled"),
        }
    }
    flow::cancel(api, machine, now).await.map_err(explain)?;
    if let Some(notice) = machine.borrow().notice() {
        bail!("{notice}");
    }

    let machine = machine.borrow();
    println!("Cancelled{}.", day_suffix(&machine));
    print_list(&machine);
    Ok(())
}

pub async fn trails<A>(api: &A, config: &ClientConfig, action: TrailAction) -> Result<()>
where
    A: RegistrationApi + ?Sized,
{
    let machine = open(api, config, Category::Trail, None).await?;
    match action {
        TrailAction::List => {
            print_list(&machine.borrow());
            Ok(())
        }
        TrailAction::Apply { id } => apply(api, &machine, OfferingId(id)).await,
    }
}

pub async fn morning<A>(api: &A, config: &ClientConfig, action: MorningAction) -> Result<()>
where
    A: RegistrationApi + ?Sized,
{
    program(api, config, Category::Morning, action).await
}

pub async fn afternoon<A>(api: &A, config: &ClientConfig, action: AfternoonAction) -> Result<()>
where
    A: RegistrationApi + ?Sized,
{
    match action {
        AfternoonAction::Program(action) => program(api, config, Category::Afternoon, action).await,
        AfternoonAction::Cancel(DayArg { day }) => {
            let machine = open(api, config, Category::Afternoon, day.as_deref()).await?;
            cancel(api, &machine).await
        }
    }
}

async fn program<A>(
    api: &A,
    config: &ClientConfig,
    category: Category,
    action: MorningAction,
) -> Result<()>
where
    A: RegistrationApi + ?Sized,
{
    match action {
        MorningAction::List(DayArg { day }) => {
            let machine = open(api, config, category, day.as_deref()).await?;
            print_list(&machine.borrow());
            Ok(())
        }
        MorningAction::Status(DayArg { day }) => {
            let machine = open(api, config, category, day.as_deref()).await?;
            print_application(&machine.borrow());
            Ok(())
        }
        MorningAction::Apply { id, day: DayArg { day } } => {
            let machine = open(api, config, category, day.as_deref()).await?;
            apply(api, &machine, OfferingId(id)).await
        }
    }
}
