//! In-memory [`RegistrationApi`] for exercising the flows without a server.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

use crate::client::{ApiError, RegistrationApi};
use crate::models::{ExistingApplication, GroupMemberApplication, Offering, OfferingId};
use crate::program::Category;

type Key = (Category, Option<String>);

#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    pub offerings: RefCell<HashMap<Key, Vec<Offering>>>,
    pub existing: RefCell<HashMap<Key, ExistingApplication>>,
    pub applied: RefCell<HashMap<Category, Vec<String>>>,
    pub roster: RefCell<HashMap<String, Vec<GroupMemberApplication>>>,
    /// Requests for a gated day block until the gate is released.
    pub gates: RefCell<HashMap<String, Arc<Notify>>>,
    pub failure: RefCell<Option<ApiError>>,
    pub roster_failures: RefCell<HashMap<String, ApiError>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn with_offerings(self, category: Category, day: Option<&str>, list: Vec<Offering>) -> Self {
        self.offerings
            .borrow_mut()
            .insert((category, day.map(str::to_string)), list);
        self
    }

    pub fn with_existing(
        self,
        category: Category,
        day: Option<&str>,
        application: ExistingApplication,
    ) -> Self {
        self.existing
            .borrow_mut()
            .insert((category, day.map(str::to_string)), application);
        self
    }

    pub fn with_applied_days(self, category: Category, days: &[&str]) -> Self {
        self.applied
            .borrow_mut()
            .insert(category, days.iter().map(ToString::to_string).collect());
        self
    }

    pub fn with_roster(self, day: &str, entries: Vec<GroupMemberApplication>) -> Self {
        self.roster.borrow_mut().insert(day.to_string(), entries);
        self
    }

    pub fn gate(&self, day: &str) -> Arc<Notify> {
        Arc::clone(
            self.gates
                .borrow_mut()
                .entry(day.to_string())
                .or_insert_with(|| Arc::new(Notify::new())),
        )
    }

    pub fn fail_with(&self, error: ApiError) {
        *self.failure.borrow_mut() = Some(error);
    }

    pub fn recover(&self) {
        self.failure.borrow_mut().take();
    }

    /// Fails only the roster request of `day`.
    pub fn fail_roster(&self, day: &str, error: ApiError) {
        self.roster_failures.borrow_mut().insert(day.to_string(), error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call);
        match self.failure.borrow().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn wait_for(&self, day: Option<&str>) {
        let gate = day.and_then(|day| self.gates.borrow().get(day).cloned());
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait(?Send)]
impl RegistrationApi for FakeApi {
    async fn offerings(
        &self,
        category: Category,
        day: Option<&str>,
    ) -> Result<Vec<Offering>, ApiError> {
        self.record(format!("offerings {category} {day:?}"))?;
        self.wait_for(day).await;
        let key = (category, day.map(str::to_string));
        Ok(self.offerings.borrow().get(&key).cloned().unwrap_or_default())
    }

    async fn existing_application(
        &self,
        category: Category,
        day: Option<&str>,
    ) -> Result<Option<ExistingApplication>, ApiError> {
        self.record(format!("existing {category} {day:?}"))?;
        self.wait_for(day).await;
        let key = (category, day.map(str::to_string));
        Ok(self.existing.borrow().get(&key).cloned())
    }

    async fn apply(
        &self,
        category: Category,
        offering: OfferingId,
        day: Option<&str>,
    ) -> Result<(), ApiError> {
        self.record(format!("apply {category} {offering} {day:?}"))
    }

    async fn cancel(&self, category: Category, day: Option<&str>) -> Result<(), ApiError> {
        self.record(format!("cancel {category} {day:?}"))?;
        let key = (category, day.map(str::to_string));
        self.existing.borrow_mut().remove(&key);
        Ok(())
    }

    async fn applied_days(&self, category: Category) -> Result<Vec<String>, ApiError> {
        self.record(format!("applied_days {category}"))?;
        Ok(self.applied.borrow().get(&category).cloned().unwrap_or_default())
    }

    async fn group_applications(
        &self,
        day: &str,
    ) -> Result<Vec<GroupMemberApplication>, ApiError> {
        self.record(format!("group_applications {day}"))?;
        if let Some(error) = self.roster_failures.borrow().get(day).cloned() {
            return Err(error);
        }
        self.wait_for(Some(day)).await;
        Ok(self.roster.borrow().get(day).cloned().unwrap_or_default())
    }
}
