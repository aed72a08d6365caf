use serde::{Deserialize, Deserializer, Serialize, de};
use std::{fmt, str::FromStr};

/// Identifier of a trail or activity.
///
/// The server emits ids as integers but echoes the chosen id back as a string
/// in the `answers` field, occasionally wrapped in a list. All three shapes
/// deserialize into the same value.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct OfferingId(pub i64);

impl fmt::Display for OfferingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OfferingId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse().map(Self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
    List(Vec<RawId>),
}

impl RawId {
    fn resolve<E: de::Error>(self) -> Result<OfferingId, E> {
        match self {
            Self::Number(value) => Ok(OfferingId(value)),
            Self::Text(text) => text
                .parse()
                .map_err(|_| E::custom(format!("invalid offering id `{text}`"))),
            Self::List(items) => items
                .into_iter()
                .next()
                .ok_or_else(|| E::custom("empty offering id list"))?
                .resolve(),
        }
    }
}

impl<'de> Deserialize<'de> for OfferingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawId::deserialize(deserializer)?.resolve()
    }
}

/// A trail or activity a participant can apply for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offering {
    pub id: OfferingId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Remaining capacity as computed by the server. Trails do not report it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_spots: Option<i64>,
    #[serde(
        default,
        alias = "max_applicants",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_participants: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_language: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub older_participants: Option<bool>,
}

impl Offering {
    /// Builds an offering with only the fields every endpoint reports.
    pub fn new(id: i64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: OfferingId(id),
            name: name.into(),
            description: description.into(),
            free_spots: None,
            max_participants: None,
            equipment: None,
            location: None,
            day: None,
            english_language: None,
            older_participants: None,
        }
    }

    #[must_use]
    pub fn with_free_spots(mut self, free_spots: i64) -> Self {
        self.free_spots = Some(free_spots);
        self
    }

    /// An offering without a reported capacity is treated as open.
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.free_spots.is_none_or(|spots| spots > 0)
    }
}
