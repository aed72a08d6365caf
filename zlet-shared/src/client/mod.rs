//! HTTP gateway to the registration server.
//!
//! Every request carries the session's bearer token. A `401` from any
//! endpoint expires the session before the error is returned; nothing is
//! retried.

mod error;

pub use error::ApiError;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::models::{
    AppliedDay, ErrorBody, ExistingApplication, GroupMemberApplication, LoginForm, Offering,
    OfferingId, TokenResponse, UserProfile,
};
use crate::program::Category;
use crate::session::Session;

/// Operations the selection and roster flows drive.
///
/// `CampClient` talks to the real server; tests supply in-memory fakes.
#[async_trait(?Send)]
pub trait RegistrationApi {
    async fn offerings(&self, category: Category, day: Option<&str>)
    -> Result<Vec<Offering>, ApiError>;

    /// The user's application, or `None` when there is none yet.
    async fn existing_application(
        &self,
        category: Category,
        day: Option<&str>,
    ) -> Result<Option<ExistingApplication>, ApiError>;

    async fn apply(
        &self,
        category: Category,
        offering: OfferingId,
        day: Option<&str>,
    ) -> Result<(), ApiError>;

    async fn cancel(&self, category: Category, day: Option<&str>) -> Result<(), ApiError>;

    /// Days on which the user holds an application in `category`.
    async fn applied_days(&self, category: Category) -> Result<Vec<String>, ApiError>;

    async fn group_applications(&self, day: &str)
    -> Result<Vec<GroupMemberApplication>, ApiError>;
}

fn for_day(request: RequestBuilder, day: Option<&str>) -> RequestBuilder {
    match day {
        Some(day) => request.query(&[("day", day)]),
        None => request,
    }
}

/// REST client bound to one server and one session.
#[derive(Clone, Debug)]
pub struct CampClient {
    base_url: String,
    http: Client,
    session: Session,
}

impl CampClient {
    pub fn new(base_url: &str, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET` on `path`, scoped to `day` when given.
    fn get(&self, path: &str, day: Option<&str>) -> RequestBuilder {
        for_day(self.http.get(self.api_url(path)), day)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.session.expire();
            return Err(ApiError::Unauthorized);
        }
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|parsed| parsed.message())
            .unwrap_or(body);
        warn!(status = status.as_u16(), %detail, "request failed");

        if status == StatusCode::NOT_FOUND {
            Err(ApiError::NotFound(detail))
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.dispatch(request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_form(&self, path: &str, pairs: &[(&str, &str)]) -> Result<Response, ApiError> {
        let request = self.http.post(self.api_url(path)).form(pairs);
        self.dispatch(request).await
    }

    /// Exchanges credentials for a token and starts the session.
    ///
    /// # Errors
    /// Returns the server's refusal as [`ApiError::Status`]; classify it with
    /// [`crate::models::LoginRejection::classify`].
    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn login(&self, form: &LoginForm) -> Result<TokenResponse, ApiError> {
        let response = self
            .post_form(
                "auth/jwt/login",
                &[
                    ("username", form.username.as_str()),
                    ("password", form.password.as_str()),
                ],
            )
            .await?;
        let token: TokenResponse = serde_json::from_str(&response.text().await?)?;
        self.session.begin(&token.access_token)?;
        Ok(token)
    }

    /// Clears the local session. The server keeps no logout state for bearer tokens.
    pub fn logout(&self) {
        self.session.end();
    }

    /// Profile of the logged in user.
    ///
    /// # Errors
    /// Any [`ApiError`] from the request.
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.get_json(self.get("users/me", None)).await
    }
}

#[async_trait(?Send)]
impl RegistrationApi for CampClient {
    async fn offerings(
        &self,
        category: Category,
        day: Option<&str>,
    ) -> Result<Vec<Offering>, ApiError> {
        let endpoints = category.endpoints();
        self.get_json(self.get(endpoints.list, day)).await
    }

    async fn existing_application(
        &self,
        category: Category,
        day: Option<&str>,
    ) -> Result<Option<ExistingApplication>, ApiError> {
        let endpoints = category.endpoints();
        let request = self.get(endpoints.existing, day);
        match self.get_json::<Option<ExistingApplication>>(request).await {
            Ok(Some(application)) if application.answers.is_some() => Ok(Some(application)),
            Ok(_) => Ok(None),
            Err(err) if err.is_not_found() => {
                debug!(%category, ?day, "no existing application");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn apply(
        &self,
        category: Category,
        offering: OfferingId,
        day: Option<&str>,
    ) -> Result<(), ApiError> {
        let endpoints = category.endpoints();
        let answers = offering.to_string();
        let mut pairs = vec![("answers", answers.as_str())];
        if let Some(day) = day {
            pairs.push(("day", day));
        }
        self.post_form(endpoints.submit, &pairs)
            .await
            .map(|_| ())
    }

    async fn cancel(&self, category: Category, day: Option<&str>) -> Result<(), ApiError> {
        let path = category
            .endpoints()
            .cancel
            .ok_or(ApiError::Unsupported("cancellation"))?;
        let request = for_day(self.http.delete(self.api_url(path)), day);
        self.dispatch(request).await.map(|_| ())
    }

    async fn applied_days(&self, category: Category) -> Result<Vec<String>, ApiError> {
        let Some(path) = category.endpoints().applied_days else {
            return Ok(Vec::new());
        };
        let days: Vec<AppliedDay> = self.get_json(self.get(path, None)).await?;
        Ok(days.into_iter().map(|entry| entry.day).collect())
    }

    async fn group_applications(
        &self,
        day: &str,
    ) -> Result<Vec<GroupMemberApplication>, ApiError> {
        self.get_json(self.get("group_applications", Some(day))).await
    }
}
