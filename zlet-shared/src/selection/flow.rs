//! Async sequences that move a [`SelectionMachine`] through its phases.
//!
//! The machine lives in a `RefCell` so several sequences can be in flight
//! at once on a single-threaded executor. Borrows never span an `.await`.

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use thiserror::Error;
use tracing::warn;

use super::{LoadStep, LoadTicket, Outcome, SelectionError, SelectionMachine};
use crate::client::{ApiError, RegistrationApi};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FlowError {
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized))
    }
}

/// Superseded failures are swallowed unless they ended the session.
fn settle(outcome: Outcome, error: ApiError) -> Result<(), FlowError> {
    if outcome == Outcome::Stale && !error.is_unauthorized() {
        Ok(())
    } else {
        Err(error.into())
    }
}

/// Refreshes the days the user already applied for.
///
/// Only a `401` is reported; any other failure leaves the known days as
/// they were.
///
/// # Errors
/// [`FlowError::Api`] with [`ApiError::Unauthorized`].
pub async fn refresh_applied_days<A>(
    api: &A,
    machine: &RefCell<SelectionMachine>,
) -> Result<(), FlowError>
where
    A: RegistrationApi + ?Sized,
{
    let category = machine.borrow().category();
    match api.applied_days(category).await {
        Ok(days) => {
            machine.borrow_mut().receive_applied_days(days);
            Ok(())
        }
        Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized.into()),
        Err(err) => {
            warn!(%category, error = %err, "could not fetch applied days");
            Ok(())
        }
    }
}

/// Opens the view: applied days first, so the default day can be picked,
/// then the regular load sequence.
///
/// # Errors
/// Whatever [`load`] reports.
pub async fn start<A>(api: &A, machine: &RefCell<SelectionMachine>) -> Result<(), FlowError>
where
    A: RegistrationApi + ?Sized,
{
    if machine.borrow().category().is_day_scoped() {
        refresh_applied_days(api, machine).await?;
    }
    let ticket = machine.borrow_mut().start();
    load(api, machine, ticket).await
}

/// Switches day and loads it. Unknown or unchanged days are a no-op.
///
/// # Errors
/// Whatever [`load`] reports.
pub async fn switch_day<A>(
    api: &A,
    machine: &RefCell<SelectionMachine>,
    day: &str,
) -> Result<(), FlowError>
where
    A: RegistrationApi + ?Sized,
{
    let ticket = machine.borrow_mut().select_day(day);
    match ticket {
        Some(ticket) => load(api, machine, ticket).await,
        None => Ok(()),
    }
}

/// Loads the active view again after a failed load. A no-op otherwise.
///
/// # Errors
/// Whatever [`load`] reports.
pub async fn retry<A>(api: &A, machine: &RefCell<SelectionMachine>) -> Result<(), FlowError>
where
    A: RegistrationApi + ?Sized,
{
    let ticket = machine.borrow_mut().retry();
    match ticket {
        Some(ticket) => load(api, machine, ticket).await,
        None => Ok(()),
    }
}

/// Existing-application check, then the offering list when needed.
///
/// # Errors
/// The failing [`ApiError`], unless the load was superseded meanwhile.
pub async fn load<A>(
    api: &A,
    machine: &RefCell<SelectionMachine>,
    ticket: LoadTicket,
) -> Result<(), FlowError>
where
    A: RegistrationApi + ?Sized,
{
    let category = machine.borrow().category();
    match api.existing_application(category, ticket.day()).await {
        Ok(existing) => {
            let step = machine.borrow_mut().receive_existing(&ticket, existing);
            match step {
                LoadStep::FetchOfferings(ticket) => load_offerings(api, machine, ticket).await,
                LoadStep::Done | LoadStep::Stale => Ok(()),
            }
        }
        Err(err) => {
            let outcome = machine.borrow_mut().receive_failure(&ticket, &err);
            settle(outcome, err)
        }
    }
}

/// Fetches the offering list for `ticket`.
///
/// # Errors
/// The failing [`ApiError`], unless the load was superseded meanwhile.
pub async fn load_offerings<A>(
    api: &A,
    machine: &RefCell<SelectionMachine>,
    ticket: LoadTicket,
) -> Result<(), FlowError>
where
    A: RegistrationApi + ?Sized,
{
    let category = machine.borrow().category();
    match api.offerings(category, ticket.day()).await {
        Ok(offerings) => {
            machine.borrow_mut().receive_offerings(&ticket, offerings);
            Ok(())
        }
        Err(err) => {
            let outcome = machine.borrow_mut().receive_failure(&ticket, &err);
            settle(outcome, err)
        }
    }
}

/// Submits the current selection.
///
/// # Errors
/// [`FlowError::Selection`] when nothing is selected (no request is sent),
/// otherwise the failing [`ApiError`].
pub async fn submit<A>(api: &A, machine: &RefCell<SelectionMachine>) -> Result<(), FlowError>
where
    A: RegistrationApi + ?Sized,
{
    let (category, ticket) = {
        let mut machine = machine.borrow_mut();
        (machine.category(), machine.begin_submit()?)
    };
    match api.apply(category, ticket.offering(), ticket.day()).await {
        Ok(()) => {
            machine.borrow_mut().submit_succeeded(&ticket);
            Ok(())
        }
        Err(err) => {
            let outcome = machine.borrow_mut().submit_failed(&ticket, &err);
            settle(outcome, err)
        }
    }
}

/// Cancels the current application and reloads the offering list.
///
/// # Errors
/// [`FlowError::Selection`] when cancelling is not allowed at `now`,
/// otherwise the failing [`ApiError`].
pub async fn cancel<A>(
    api: &A,
    machine: &RefCell<SelectionMachine>,
    now: DateTime<Utc>,
) -> Result<(), FlowError>
where
    A: RegistrationApi + ?Sized,
{
    let (category, ticket) = {
        let mut machine = machine.borrow_mut();
        (machine.category(), machine.begin_cancel(now)?)
    };
    match api.cancel(category, ticket.day()).await {
        Ok(()) => {
            let reload = machine.borrow_mut().cancel_succeeded(&ticket);
            match reload {
                Some(ticket) => load_offerings(api, machine, ticket).await,
                None => Ok(()),
            }
        }
        Err(err) => {
            let outcome = machine.borrow_mut().cancel_failed(&ticket, &err);
            settle(outcome, err)
        }
    }
}
