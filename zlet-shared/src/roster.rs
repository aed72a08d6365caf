//! Leader view of the group's afternoon applications.

use std::cell::RefCell;
use tracing::warn;
use uuid::Uuid;

use crate::client::{ApiError, RegistrationApi};
use crate::models::GroupMemberApplication;
use crate::program::{Category, default_day};
use crate::selection::Outcome;

const MISSING: &str = "-";

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub user_id: Uuid,
    pub name: String,
    pub program: String,
    pub equipment: String,
    pub location: String,
}

impl RosterRow {
    fn from_entry(entry: &GroupMemberApplication) -> Self {
        let or_missing = |value: Option<&String>| {
            value
                .filter(|text| !text.is_empty())
                .map_or_else(|| MISSING.to_string(), Clone::clone)
        };
        let name = entry.member_name();
        Self {
            user_id: entry.user_id,
            name: if name.is_empty() {
                MISSING.to_string()
            } else {
                name
            },
            program: or_missing(entry.name.as_ref()),
            equipment: or_missing(entry.equipment.as_ref()),
            location: or_missing(entry.location.as_ref()),
        }
    }
}

/// What the roster shows for the active day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterView {
    Loading,
    Empty,
    /// Every member is on the excursion; one summary card replaces the table.
    Excursion { name: String, description: String },
    Table(Vec<RosterRow>),
    Failed(String),
}

impl RosterView {
    /// Builds the view for one day's entries.
    #[must_use]
    pub fn from_entries(entries: &[GroupMemberApplication], excursion: &str) -> Self {
        if entries.is_empty() {
            return Self::Empty;
        }
        if entries
            .iter()
            .all(|entry| entry.name.as_deref() == Some(excursion))
        {
            let description = entries
                .iter()
                .find_map(|entry| entry.description.clone())
                .unwrap_or_default();
            return Self::Excursion {
                name: excursion.to_string(),
                description,
            };
        }
        Self::Table(entries.iter().map(RosterRow::from_entry).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterTicket {
    generation: u64,
    day: String,
}

impl RosterTicket {
    pub fn day(&self) -> &str {
        &self.day
    }
}

#[derive(Debug, Clone)]
pub struct RosterMachine {
    days: Vec<String>,
    day: Option<String>,
    applied_days: Vec<String>,
    excursion: String,
    generation: u64,
    view: RosterView,
}

impl RosterMachine {
    pub fn new(days: Vec<String>, excursion: impl Into<String>) -> Self {
        Self {
            days,
            day: None,
            applied_days: Vec::new(),
            excursion: excursion.into(),
            generation: 0,
            view: RosterView::Loading,
        }
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }

    pub fn view(&self) -> &RosterView {
        &self.view
    }

    pub fn applied_days(&self) -> &[String] {
        &self.applied_days
    }

    pub fn receive_applied_days(&mut self, days: Vec<String>) {
        self.applied_days = days;
    }

    /// Picks the default day when none is active yet.
    pub fn start(&mut self) -> Option<RosterTicket> {
        if self.day.is_none() {
            self.day = default_day(&self.days, &self.applied_days);
        }
        self.reload()
    }

    /// Switches to `day`. The active day is only loaded again after a failure.
    pub fn select_day(&mut self, day: &str) -> Option<RosterTicket> {
        if !self.days.iter().any(|known| known == day) {
            return None;
        }
        if self.day.as_deref() == Some(day) && !matches!(self.view, RosterView::Failed(_)) {
            return None;
        }
        self.day = Some(day.to_string());
        self.reload()
    }

    fn reload(&mut self) -> Option<RosterTicket> {
        let day = self.day.clone()?;
        self.generation += 1;
        self.view = RosterView::Loading;
        Some(RosterTicket {
            generation: self.generation,
            day,
        })
    }

    pub fn receive(
        &mut self,
        ticket: &RosterTicket,
        result: Result<&[GroupMemberApplication], &ApiError>,
    ) -> Outcome {
        if ticket.generation != self.generation {
            return Outcome::Stale;
        }
        self.view = match result {
            Ok(entries) => RosterView::from_entries(entries, &self.excursion),
            Err(error) => RosterView::Failed(error.to_string()),
        };
        Outcome::Accepted
    }
}

/// Loads applied days, then the roster of the default day.
///
/// # Errors
/// [`ApiError::Unauthorized`], or the failure of the roster request.
pub async fn start<A>(api: &A, machine: &RefCell<RosterMachine>) -> Result<(), ApiError>
where
    A: RegistrationApi + ?Sized,
{
    open(api, machine, None).await
}

/// Loads applied days, then the roster of `day`, or of the default day
/// when `None`. Only one roster request is sent.
///
/// # Errors
/// [`ApiError::Unauthorized`], or the failure of the roster request.
pub async fn open<A>(
    api: &A,
    machine: &RefCell<RosterMachine>,
    day: Option<&str>,
) -> Result<(), ApiError>
where
    A: RegistrationApi + ?Sized,
{
    match api.applied_days(Category::Afternoon).await {
        Ok(days) => machine.borrow_mut().receive_applied_days(days),
        Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
        Err(err) => warn!(error = %err, "could not fetch days with group applications"),
    }
    let ticket = {
        let mut machine = machine.borrow_mut();
        match day {
            Some(day) => machine.select_day(day),
            None => machine.start(),
        }
    };
    match ticket {
        Some(ticket) => load(api, machine, ticket).await,
        None => Ok(()),
    }
}

/// # Errors
/// The failing [`ApiError`], unless the request was superseded meanwhile.
pub async fn switch_day<A>(
    api: &A,
    machine: &RefCell<RosterMachine>,
    day: &str,
) -> Result<(), ApiError>
where
    A: RegistrationApi + ?Sized,
{
    let ticket = machine.borrow_mut().select_day(day);
    match ticket {
        Some(ticket) => load(api, machine, ticket).await,
        None => Ok(()),
    }
}

/// # Errors
/// The failing [`ApiError`], unless the request was superseded meanwhile.
pub async fn load<A>(
    api: &A,
    machine: &RefCell<RosterMachine>,
    ticket: RosterTicket,
) -> Result<(), ApiError>
where
    A: RegistrationApi + ?Sized,
{
    let result = api.group_applications(ticket.day()).await;
    let outcome = machine.borrow_mut().receive(&ticket, result.as_deref());
    match result {
        Err(err) if outcome == Outcome::Accepted || err.is_unauthorized() => Err(err),
        _ => Ok(()),
    }
}
