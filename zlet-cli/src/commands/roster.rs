use std::cell::RefCell;

use anyhow::{Result, anyhow, bail};
use shared::{
    client::{ApiError, RegistrationApi},
    config::ClientConfig,
    roster::{self, RosterMachine, RosterRow, RosterView},
};

fn explain(err: ApiError) -> anyhow::Error {
    if err.is_unauthorized() {
        anyhow!("session expired. run `zlet login` to sign in again")
    } else {
        err.into()
    }
}

/// Loads the roster of `day`, or of the default day when `None`.
pub async fn load<A>(
    api: &A,
    config: &ClientConfig,
    day: Option<&str>,
) -> Result<RefCell<RosterMachine>>
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
    let machine = RefCell::new(RosterMachine::new(
        config.program_days.clone(),
        config.excursion_name.clone(),
    ));
    roster::open(api, &machine, day).await.map_err(explain)?;
    Ok(machine)
}

fn table(rows: &[RosterRow]) -> String {
    let headers = ["Ime in Priimek", "Program", "Oprema", "Lokacija"];
    let cells: Vec<[&str; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.name.as_str(),
                row.program.as_str(),
                row.equipment.as_str(),
                row.location.as_str(),
            ]
        })
        .collect();
    let mut widths = headers.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let line = |cells: &[&str; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(&headers)];
    out.extend(cells.iter().map(line));
    out.join("\n")
}

pub async fn show<A>(api: &A, config: &ClientConfig, day: Option<&str>) -> Result<()>
where
    A: RegistrationApi + ?Sized,
{
    let machine = load(api, config, day).await?;
    let machine = machine.borrow();
    if let Some(day) = machine.day() {
        println!("{day}");
    }
    match machine.view() {
        RosterView::Loading => {}
        RosterView::Failed(reason) => bail!("could not load the roster: {reason}"),
        RosterView::Empty => println!("Ni prijav vaših članov skupine za ta dan."),
        RosterView::Excursion { name, description } => {
            println!("{name}");
            if !description.is_empty() {
                println!("  {description}");
            }
        }
        RosterView::Table(rows) => println!("{}", table(rows)),
    }
    Ok(())
}
