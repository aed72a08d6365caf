use serde::{Deserialize, Serialize};
use std::fmt;

use crate::client::ApiError;

/// Form body for `POST /auth/jwt/login`. `password` carries the membership number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Why the server refused a login attempt.
///
/// Registration opens in two waves: early applicants first, everybody else
/// two days later. The server signals a closed window with a 403 whose
/// detail names the wave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginRejection {
    EarlyWindowClosed,
    GroupWindowClosed,
    Refused(String),
    InvalidCredentials,
}

impl LoginRejection {
    /// Classifies a failed login call.
    #[must_use]
    pub fn classify(error: &ApiError) -> Self {
        match error {
            ApiError::Status { status: 403, detail } if detail.contains("early applicants") => {
                Self::EarlyWindowClosed
            }
            ApiError::Status { status: 403, detail } if detail.contains("your group") => {
                Self::GroupWindowClosed
            }
            ApiError::Status { status: 403, detail } => Self::Refused(detail.clone()),
            _ => Self::InvalidCredentials,
        }
    }

    /// Translation key used by the browser client.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Self::EarlyWindowClosed => "login.errors.early_window",
            Self::GroupWindowClosed => "login.errors.group_window",
            Self::Refused(_) => "login.errors.refused",
            Self::InvalidCredentials => "login.errors.invalid_credentials",
        }
    }
}

impl fmt::Display for LoginRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EarlyWindowClosed => {
                f.write_str("registration is not open for your group yet; it opens on 22. 6. 2025 at 18:00")
            }
            Self::GroupWindowClosed => {
                f.write_str("registration is not open for your group yet; it opens on 24. 6. 2025 at 18:00")
            }
            Self::Refused(detail) => f.write_str(detail),
            Self::InvalidCredentials => {
                f.write_str("login failed, please check your e-mail and membership number")
            }
        }
    }
}
