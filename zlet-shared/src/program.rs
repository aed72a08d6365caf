//! Program categories and the fixed rules of the camp calendar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days on which the morning and afternoon programs run.
pub const PROGRAM_DAYS: [&str; 5] = ["Ned", "Pon", "Tor", "Sre", "Čet"];

/// The seaside excursion replaces the afternoon program and cannot be cancelled.
pub const EXCURSION_NAME: &str = "Izlet na morje";

/// 2025-06-29 18:00 CEST.
pub const CANCEL_DEADLINE_UNIX: i64 = 1_751_212_800;

/// What a selection view registers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Trail,
    Morning,
    Afternoon,
}

/// Server paths backing one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramEndpoints {
    pub list: &'static str,
    pub existing: &'static str,
    pub submit: &'static str,
    pub applied_days: Option<&'static str>,
    pub cancel: Option<&'static str>,
    pub day_scoped: bool,
}

impl Category {
    #[must_use]
    pub const fn endpoints(self) -> ProgramEndpoints {
        match self {
            Self::Trail => ProgramEndpoints {
                list: "trails",
                existing: "application",
                submit: "apply",
                applied_days: None,
                cancel: None,
                day_scoped: false,
            },
            Self::Morning => ProgramEndpoints {
                list: "morning_activities",
                existing: "morning_application",
                submit: "apply_morning",
                applied_days: Some("morning_applications"),
                cancel: None,
                day_scoped: true,
            },
            Self::Afternoon => ProgramEndpoints {
                list: "afternoon_activities",
                existing: "afternoon_application",
                submit: "apply_afternoon",
                applied_days: Some("afternoon_applications"),
                cancel: Some("afternoon_application"),
                day_scoped: true,
            },
        }
    }

    #[must_use]
    pub const fn is_day_scoped(self) -> bool {
        self.endpoints().day_scoped
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trail => "trail",
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When an applied offering may still be withdrawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationPolicy {
    pub deadline: DateTime<Utc>,
    pub non_cancellable: String,
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self {
            deadline: DateTime::from_timestamp(CANCEL_DEADLINE_UNIX, 0)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            non_cancellable: EXCURSION_NAME.to_string(),
        }
    }
}

impl CancellationPolicy {
    /// Cancelling is allowed strictly before the deadline, and never for the
    /// excursion.
    #[must_use]
    pub fn permits(&self, offering_name: &str, now: DateTime<Utc>) -> bool {
        now < self.deadline && offering_name != self.non_cancellable
    }
}

/// Day a day-scoped view opens on: the first program day the user already
/// applied for, otherwise the first program day.
#[must_use]
pub fn default_day<S: AsRef<str>>(program_days: &[S], applied_days: &[String]) -> Option<String> {
    applied_days
        .iter()
        .find(|day| program_days.iter().any(|known| known.as_ref() == day.as_str()))
        .cloned()
        .or_else(|| program_days.first().map(|day| day.as_ref().to_string()))
}
