use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile returned by `/users/me`.
///
/// Only `leader` drives client behaviour; the remaining fields are shown in
/// the shell and by the terminal client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[serde(default)]
    pub email: String,

    /// Group leaders see the trail, morning and roster views.
    #[serde(default)]
    pub leader: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl UserProfile {
    /// Full name when known, otherwise the e-mail address.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = [self.name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.email.clone()
        } else {
            full
        }
    }
}
