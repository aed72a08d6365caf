use serde::{Deserialize, Serialize};

use super::offering::{Offering, OfferingId};

/// A day on which the current user already holds an application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppliedDay {
    pub day: String,
}

/// The current user's application for a category (and day, where scoped).
///
/// Trail applications come back bare (`answers`, `status`, `created_at`);
/// morning and afternoon applications are enriched with the chosen
/// offering's detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExistingApplication {
    pub answers: Option<OfferingId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OfferingId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_spots: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ExistingApplication {
    /// A bare application record pointing at `offering`.
    pub fn for_offering(offering: OfferingId) -> Self {
        Self {
            answers: Some(offering),
            status: None,
            created_at: None,
            day: None,
            id: None,
            name: None,
            description: None,
            free_spots: None,
            equipment: None,
            location: None,
        }
    }

    /// The embedded offering detail, when the server sent one.
    pub fn offering(&self) -> Option<Offering> {
        let name = self.name.clone()?;
        let id = self.id.or(self.answers)?;
        Some(Offering {
            id,
            name,
            description: self.description.clone().unwrap_or_default(),
            free_spots: self.free_spots,
            max_participants: None,
            equipment: self.equipment.clone(),
            location: self.location.clone(),
            day: self.day.clone(),
            english_language: None,
            older_participants: None,
        })
    }
}
