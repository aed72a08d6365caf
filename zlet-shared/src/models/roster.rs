use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::offering::OfferingId;

/// One group member's afternoon application for a day, as seen by their leader.
///
/// Members without an application come back with every program field unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupMemberApplication {
    pub user_id: Uuid,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub answers: Option<OfferingId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub id: Option<OfferingId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
}

impl GroupMemberApplication {
    /// First name and surname, skipping whichever is missing.
    #[must_use]
    pub fn member_name(&self) -> String {
        [self.first_name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
