//! Registration state machine shared by the trail, morning and afternoon views.
//!
//! The machine itself is synchronous. Every network round trip is bracketed
//! by a ticket the machine hands out and later takes back; tickets carry the
//! generation they were issued under, and a completion whose generation no
//! longer matches is dropped. Switching day, reloading and cancelling all
//! bump the generation. [`flow`] drives the sequences against a
//! [`crate::client::RegistrationApi`].

pub mod flow;

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::client::ApiError;
use crate::models::{ExistingApplication, Offering, OfferingId};
use crate::program::{CancellationPolicy, Category, default_day};

/// Where the view currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Choosing,
    Submitting,
    Applied,
    Cancelling,
    Failed(String),
}

/// User-facing message raised by the last transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NothingSelected,
    SubmitFailed,
    CancelFailed,
    LoadFailed,
}

impl Notice {
    #[must_use]
    pub fn i18n_key(self, category: Category) -> &'static str {
        match (self, category) {
            (Self::NothingSelected, Category::Trail) => "selection.notice.no_trail",
            (Self::NothingSelected, _) => "selection.notice.no_activity",
            (Self::SubmitFailed, _) => "selection.notice.submit_failed",
            (Self::CancelFailed, _) => "selection.notice.cancel_failed",
            (Self::LoadFailed, _) => "selection.notice.load_failed",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NothingSelected => "please choose an option before applying",
            Self::SubmitFailed => "something went wrong, please refresh and try again",
            Self::CancelFailed => "something went wrong while cancelling, please try again",
            Self::LoadFailed => "could not load the program, please refresh and try again",
        })
    }
}

/// Transitions the machine refuses outright. None of them reach the network.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    #[error("nothing selected")]
    NothingSelected,
    #[error("cannot apply while {0}")]
    NotChoosing(&'static str),
    #[error("this application can no longer be cancelled")]
    CancelNotAllowed,
}

/// Whether a completion was applied or discarded as superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Stale,
}

/// What to do after the existing-application check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStep {
    Done,
    FetchOfferings(LoadTicket),
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    day: Option<String>,
}

impl LoadTicket {
    pub fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
    offering: OfferingId,
    day: Option<String>,
}

impl SubmitTicket {
    pub fn offering(&self) -> OfferingId {
        self.offering
    }

    pub fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelTicket {
    generation: u64,
    day: Option<String>,
}

impl CancelTicket {
    pub fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct SelectionMachine {
    category: Category,
    days: Vec<String>,
    day: Option<String>,
    generation: u64,
    phase: Phase,
    offerings: Vec<Offering>,
    selected: Option<OfferingId>,
    application: Option<ExistingApplication>,
    applied: Option<Offering>,
    applied_days: Vec<String>,
    notice: Option<Notice>,
    policy: CancellationPolicy,
}

impl SelectionMachine {
    /// `days` is ignored for categories that are not day scoped.
    pub fn new(category: Category, days: Vec<String>, policy: CancellationPolicy) -> Self {
        let days = if category.is_day_scoped() {
            days
        } else {
            Vec::new()
        };
        Self {
            category,
            days,
            day: None,
            generation: 0,
            phase: Phase::Loading,
            offerings: Vec::new(),
            selected: None,
            application: None,
            applied: None,
            applied_days: Vec::new(),
            notice: None,
            policy,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn offerings(&self) -> &[Offering] {
        &self.offerings
    }

    pub fn selected(&self) -> Option<OfferingId> {
        self.selected
    }

    pub fn application(&self) -> Option<&ExistingApplication> {
        self.application.as_ref()
    }

    /// Detail of the applied offering, when it could be resolved.
    pub fn applied_offering(&self) -> Option<&Offering> {
        self.applied.as_ref()
    }

    pub fn applied_days(&self) -> &[String] {
        &self.applied_days
    }

    pub fn is_day_applied(&self, day: &str) -> bool {
        self.applied_days.iter().any(|applied| applied == day)
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn policy(&self) -> &CancellationPolicy {
        &self.policy
    }

    pub fn receive_applied_days(&mut self, days: Vec<String>) {
        self.applied_days = days;
    }

    /// Opens the view. Day-scoped categories land on [`default_day`] unless
    /// a day was already chosen.
    pub fn start(&mut self) -> LoadTicket {
        if self.category.is_day_scoped() && self.day.is_none() {
            self.day = default_day(&self.days, &self.applied_days);
        }
        self.reload()
    }

    /// Switches to `day`. Returns `None` for unknown days, for categories
    /// without a day dimension, and for the active day unless its load failed.
    pub fn select_day(&mut self, day: &str) -> Option<LoadTicket> {
        if !self.days.iter().any(|known| known == day) {
            return None;
        }
        if self.day.as_deref() == Some(day) && !self.is_failed() {
            return None;
        }
        self.day = Some(day.to_string());
        Some(self.reload())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.phase, Phase::Failed(_))
    }

    /// Loads the active view again after a failure. `None` while a load
    /// completed or is still in flight.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        self.is_failed().then(|| self.reload())
    }

    /// Discards everything fetched so far and starts a new load generation.
    pub fn reload(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.offerings.clear();
        self.selected = None;
        self.application = None;
        self.applied = None;
        self.notice = None;
        LoadTicket {
            generation: self.generation,
            day: self.day.clone(),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation == self.generation {
            true
        } else {
            debug!(
                category = %self.category,
                stale = generation,
                current = self.generation,
                "discarding superseded completion"
            );
            false
        }
    }

    /// Result of the existing-application check.
    pub fn receive_existing(
        &mut self,
        ticket: &LoadTicket,
        existing: Option<ExistingApplication>,
    ) -> LoadStep {
        if !self.is_current(ticket.generation) {
            return LoadStep::Stale;
        }
        match existing {
            Some(application) => {
                self.selected = application.answers;
                self.applied = application.offering();
                self.application = Some(application);
                if self.applied.is_some() {
                    self.phase = Phase::Applied;
                    LoadStep::Done
                } else {
                    // Bare record: the list resolves the detail.
                    LoadStep::FetchOfferings(ticket.clone())
                }
            }
            None => LoadStep::FetchOfferings(ticket.clone()),
        }
    }

    pub fn receive_offerings(&mut self, ticket: &LoadTicket, offerings: Vec<Offering>) -> Outcome {
        if !self.is_current(ticket.generation) {
            return Outcome::Stale;
        }
        self.offerings = offerings;
        if let Some(application) = &self.application {
            if self.applied.is_none() {
                self.applied = application
                    .answers
                    .and_then(|id| self.offerings.iter().find(|offering| offering.id == id))
                    .cloned();
            }
            self.phase = Phase::Applied;
        } else {
            self.phase = Phase::Choosing;
        }
        Outcome::Accepted
    }

    /// A load step failed.
    pub fn receive_failure(&mut self, ticket: &LoadTicket, error: &ApiError) -> Outcome {
        if !self.is_current(ticket.generation) {
            return Outcome::Stale;
        }
        self.phase = Phase::Failed(error.to_string());
        self.notice = Some(Notice::LoadFailed);
        Outcome::Accepted
    }

    /// Marks `id` as the pending choice. Only selectable offerings can be
    /// chosen, and only while choosing.
    pub fn choose(&mut self, id: OfferingId) -> bool {
        if self.phase != Phase::Choosing
            || !self.selectable_offerings().iter().any(|offering| offering.id == id)
        {
            return false;
        }
        self.selected = Some(id);
        self.notice = None;
        true
    }

    /// # Errors
    /// [`SelectionError::NothingSelected`] when no offering is chosen, which
    /// also raises [`Notice::NothingSelected`]; [`SelectionError::NotChoosing`]
    /// outside the choosing phase.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SelectionError> {
        if self.phase != Phase::Choosing {
            return Err(SelectionError::NotChoosing(self.phase_name()));
        }
        let Some(offering) = self.selected else {
            self.notice = Some(Notice::NothingSelected);
            return Err(SelectionError::NothingSelected);
        };
        self.phase = Phase::Submitting;
        self.notice = None;
        Ok(SubmitTicket {
            generation: self.generation,
            offering,
            day: self.day.clone(),
        })
    }

    /// The server accepted the application. The day is recorded as applied
    /// even when the view has moved on.
    pub fn submit_succeeded(&mut self, ticket: &SubmitTicket) -> Outcome {
        if let Some(day) = &ticket.day
            && !self.is_day_applied(day)
        {
            self.applied_days.push(day.clone());
        }
        if !self.is_current(ticket.generation) {
            return Outcome::Stale;
        }
        let mut application = ExistingApplication::for_offering(ticket.offering);
        application.day.clone_from(&ticket.day);
        self.application = Some(application);
        self.applied = self
            .offerings
            .iter()
            .find(|offering| offering.id == ticket.offering)
            .cloned();
        self.selected = Some(ticket.offering);
        self.phase = Phase::Applied;
        Outcome::Accepted
    }

    /// The server refused or the request failed. The selection is kept.
    pub fn submit_failed(&mut self, ticket: &SubmitTicket, error: &ApiError) -> Outcome {
        if !self.is_current(ticket.generation) {
            return Outcome::Stale;
        }
        debug!(category = %self.category, %error, "application rejected");
        self.phase = Phase::Choosing;
        self.notice = Some(Notice::SubmitFailed);
        Outcome::Accepted
    }

    /// Whether a cancel action should be offered at `now`.
    pub fn can_cancel(&self, now: DateTime<Utc>) -> bool {
        if self.phase != Phase::Applied
            || self.category.endpoints().cancel.is_none()
            || self.application.is_none()
        {
            return false;
        }
        let name = self.applied.as_ref().map_or("", |offering| offering.name.as_str());
        self.policy.permits(name, now)
    }

    /// # Errors
    /// [`SelectionError::CancelNotAllowed`] when [`Self::can_cancel`] is false.
    pub fn begin_cancel(&mut self, now: DateTime<Utc>) -> Result<CancelTicket, SelectionError> {
        if !self.can_cancel(now) {
            return Err(SelectionError::CancelNotAllowed);
        }
        self.phase = Phase::Cancelling;
        self.notice = None;
        Ok(CancelTicket {
            generation: self.generation,
            day: self.day.clone(),
        })
    }

    /// The application is gone. Returns the ticket for re-fetching the
    /// offering list, or `None` when the view has moved on.
    pub fn cancel_succeeded(&mut self, ticket: &CancelTicket) -> Option<LoadTicket> {
        if let Some(day) = &ticket.day {
            self.applied_days.retain(|applied| applied != day);
        }
        if !self.is_current(ticket.generation) {
            return None;
        }
        Some(self.reload())
    }

    pub fn cancel_failed(&mut self, ticket: &CancelTicket, error: &ApiError) -> Outcome {
        if !self.is_current(ticket.generation) {
            return Outcome::Stale;
        }
        debug!(category = %self.category, %error, "cancellation rejected");
        self.phase = Phase::Applied;
        self.notice = Some(Notice::CancelFailed);
        Outcome::Accepted
    }

    /// Offerings with free capacity, plus the current application even when full.
    pub fn selectable_offerings(&self) -> Vec<&Offering> {
        let current = self.application.as_ref().and_then(|app| app.answers);
        self.offerings
            .iter()
            .filter(|offering| offering.has_capacity() || Some(offering.id) == current)
            .collect()
    }

    fn phase_name(&self) -> &'static str {
        match self.phase {
            Phase::Loading => "loading",
            Phase::Choosing => "choosing",
            Phase::Submitting => "submitting",
            Phase::Applied => "applied",
            Phase::Cancelling => "cancelling",
            Phase::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::PROGRAM_DAYS;
    use chrono::Duration;

    fn program_days() -> Vec<String> {
        PROGRAM_DAYS.iter().map(ToString::to_string).collect()
    }

    fn machine(category: Category) -> SelectionMachine {
        SelectionMachine::new(category, program_days(), CancellationPolicy::default())
    }

    fn trails() -> Vec<Offering> {
        vec![
            Offering::new(1, "Triglav", "Visokogorska").with_free_spots(3),
            Offering::new(2, "Krn", "Zgodovinska").with_free_spots(0),
            Offering::new(3, "Stol", "Grebenska").with_free_spots(1),
        ]
    }

    fn choosing(category: Category, offerings: Vec<Offering>) -> SelectionMachine {
        let mut machine = machine(category);
        let ticket = machine.start();
        let LoadStep::FetchOfferings(ticket) = machine.receive_existing(&ticket, None) else {
            panic!("expected offering fetch");
        };
        assert_eq!(machine.receive_offerings(&ticket, offerings), Outcome::Accepted);
        machine
    }

    #[test]
    fn full_offerings_are_not_selectable() {
        let machine = choosing(Category::Trail, trails());
        let ids: Vec<_> = machine.selectable_offerings().iter().map(|o| o.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn current_application_stays_visible_at_zero_capacity() {
        let mut machine = machine(Category::Trail);
        let ticket = machine.start();
        let bare = ExistingApplication::for_offering(OfferingId(2));
        let LoadStep::FetchOfferings(ticket) = machine.receive_existing(&ticket, Some(bare)) else {
            panic!("bare record should resolve through the list");
        };
        machine.receive_offerings(&ticket, trails());

        let ids: Vec<_> = machine.selectable_offerings().iter().map(|o| o.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(machine.phase(), &Phase::Applied);
        assert_eq!(machine.applied_offering().map(|o| o.name.as_str()), Some("Krn"));
    }

    #[test]
    fn submit_without_selection_is_rejected_with_notice() {
        let mut machine = choosing(Category::Trail, trails());
        assert_eq!(machine.begin_submit(), Err(SelectionError::NothingSelected));
        assert_eq!(machine.notice(), Some(Notice::NothingSelected));
        assert_eq!(machine.phase(), &Phase::Choosing);
    }

    #[test]
    fn full_offering_cannot_be_chosen() {
        let mut machine = choosing(Category::Trail, trails());
        assert!(!machine.choose(OfferingId(2)));
        assert_eq!(machine.selected(), None);
    }

    #[test]
    fn trail_scenario_shows_only_submitted_offering() {
        let mut machine = choosing(Category::Trail, trails());
        assert_eq!(machine.selectable_offerings().len(), 2);

        assert!(machine.choose(OfferingId(3)));
        let ticket = machine.begin_submit().unwrap();
        assert_eq!(machine.phase(), &Phase::Submitting);
        assert_eq!(ticket.day(), None);

        assert_eq!(machine.submit_succeeded(&ticket), Outcome::Accepted);
        assert_eq!(machine.phase(), &Phase::Applied);
        let applied = machine.applied_offering().unwrap();
        assert_eq!(applied.id, OfferingId(3));
        assert_eq!(applied.name, "Stol");
    }

    #[test]
    fn failed_submit_preserves_selection() {
        let mut machine = choosing(Category::Afternoon, trails());
        machine.choose(OfferingId(1));
        let ticket = machine.begin_submit().unwrap();
        let error = ApiError::Status {
            status: 400,
            detail: "Activity is full".into(),
        };

        assert_eq!(machine.submit_failed(&ticket, &error), Outcome::Accepted);
        assert_eq!(machine.phase(), &Phase::Choosing);
        assert_eq!(machine.selected(), Some(OfferingId(1)));
        assert_eq!(machine.notice(), Some(Notice::SubmitFailed));
        assert!(machine.begin_submit().is_ok());
    }

    #[test]
    fn stale_load_results_are_discarded() {
        let mut machine = machine(Category::Morning);
        let first = machine.start();
        assert_eq!(first.day(), Some("Ned"));
        let second = machine.select_day("Tor").unwrap();

        assert_eq!(machine.receive_existing(&first, None), LoadStep::Stale);
        assert_eq!(machine.receive_offerings(&first, trails()), Outcome::Stale);
        assert!(machine.offerings().is_empty());

        let LoadStep::FetchOfferings(ticket) = machine.receive_existing(&second, None) else {
            panic!("expected offering fetch");
        };
        machine.receive_offerings(&ticket, trails());
        assert_eq!(machine.day(), Some("Tor"));
        assert_eq!(machine.phase(), &Phase::Choosing);
    }

    #[test]
    fn stale_submit_still_marks_day_applied() {
        let mut machine = choosing(Category::Afternoon, trails());
        machine.choose(OfferingId(1));
        let ticket = machine.begin_submit().unwrap();
        machine.select_day("Pon").unwrap();

        assert_eq!(machine.submit_succeeded(&ticket), Outcome::Stale);
        assert!(machine.is_day_applied("Ned"));
        assert_eq!(machine.phase(), &Phase::Loading);
    }

    #[test]
    fn start_opens_on_first_applied_day() {
        let mut machine = machine(Category::Afternoon);
        machine.receive_applied_days(vec!["Sre".into()]);
        assert_eq!(machine.start().day(), Some("Sre"));
    }

    #[test]
    fn unknown_or_current_day_is_ignored() {
        let mut machine = machine(Category::Afternoon);
        machine.start();
        assert!(machine.select_day("Sob").is_none());
        assert!(machine.select_day("Ned").is_none());
        assert!(self::machine(Category::Trail).select_day("Pon").is_none());
    }

    fn applied_afternoon(name: &str) -> SelectionMachine {
        let mut machine = machine(Category::Afternoon);
        let ticket = machine.start();
        let application: ExistingApplication = serde_json::from_value(serde_json::json!({
            "answers": "7", "id": 7, "name": name, "description": "", "free_spots": 0
        }))
        .unwrap();
        assert_eq!(machine.receive_existing(&ticket, Some(application)), LoadStep::Done);
        machine
    }

    #[test]
    fn cancel_allowed_before_deadline_only() {
        let machine = applied_afternoon("Kajak");
        let deadline = machine.policy().deadline;

        assert!(machine.can_cancel(deadline - Duration::hours(1)));
        assert!(!machine.can_cancel(deadline));
    }

    #[test]
    fn excursion_is_never_cancellable() {
        let mut machine = applied_afternoon("Izlet na morje");
        let early = machine.policy().deadline - Duration::days(3);

        assert!(!machine.can_cancel(early));
        assert_eq!(machine.begin_cancel(early), Err(SelectionError::CancelNotAllowed));
    }

    #[test]
    fn morning_applications_are_not_cancellable() {
        let mut machine = machine(Category::Morning);
        let ticket = machine.start();
        let application: ExistingApplication = serde_json::from_value(serde_json::json!({
            "answers": "7", "id": 7, "name": "Kajak"
        }))
        .unwrap();
        machine.receive_existing(&ticket, Some(application));
        assert!(!machine.can_cancel(machine.policy().deadline - Duration::days(1)));
    }

    #[test]
    fn successful_cancel_reloads_list() {
        let mut machine = applied_afternoon("Kajak");
        machine.receive_applied_days(vec!["Ned".into()]);
        let now = machine.policy().deadline - Duration::hours(1);

        let ticket = machine.begin_cancel(now).unwrap();
        assert_eq!(machine.phase(), &Phase::Cancelling);

        let reload = machine.cancel_succeeded(&ticket).unwrap();
        assert_eq!(machine.phase(), &Phase::Loading);
        assert!(!machine.is_day_applied("Ned"));
        assert!(machine.application().is_none());

        machine.receive_offerings(&reload, trails());
        assert_eq!(machine.phase(), &Phase::Choosing);
        assert_eq!(machine.selected(), None);
    }

    #[test]
    fn failed_cancel_stays_applied() {
        let mut machine = applied_afternoon("Kajak");
        let now = machine.policy().deadline - Duration::hours(1);
        let ticket = machine.begin_cancel(now).unwrap();

        machine.cancel_failed(&ticket, &ApiError::Network("offline".into()));
        assert_eq!(machine.phase(), &Phase::Applied);
        assert_eq!(machine.notice(), Some(Notice::CancelFailed));
    }

    #[test]
    fn load_failure_moves_to_failed() {
        let mut machine = machine(Category::Trail);
        let ticket = machine.start();
        machine.receive_failure(&ticket, &ApiError::Network("offline".into()));
        assert!(machine.is_failed());
        assert_eq!(machine.notice(), Some(Notice::LoadFailed));
    }

    #[test]
    fn failed_day_can_be_selected_again() {
        let mut machine = machine(Category::Afternoon);
        let ticket = machine.start();
        machine.receive_failure(&ticket, &ApiError::Network("offline".into()));

        let again = machine.select_day("Ned").expect("failed day reloads");
        assert_eq!(again.day(), Some("Ned"));
        assert_eq!(machine.phase(), &Phase::Loading);
        assert_eq!(machine.notice(), None);

        let LoadStep::FetchOfferings(again) = machine.receive_existing(&again, None) else {
            panic!("expected offering fetch");
        };
        machine.receive_offerings(&again, trails());
        assert_eq!(machine.phase(), &Phase::Choosing);
        assert!(machine.select_day("Ned").is_none());
    }

    #[test]
    fn retry_only_after_failure() {
        let mut machine = machine(Category::Trail);
        let ticket = machine.start();
        assert!(machine.retry().is_none());

        machine.receive_failure(&ticket, &ApiError::Network("offline".into()));
        let again = machine.retry().expect("failed load can be retried");
        assert_eq!(machine.phase(), &Phase::Loading);
        assert_eq!(machine.receive_existing(&ticket, None), LoadStep::Stale);
        assert!(matches!(
            machine.receive_existing(&again, None),
            LoadStep::FetchOfferings(_)
        ));
    }
}
