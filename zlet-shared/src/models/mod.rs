pub mod application;
pub mod auth;
pub mod errors;
pub mod offering;
pub mod roster;
pub mod user;

pub use application::{AppliedDay, ExistingApplication};
pub use auth::{LoginForm, LoginRejection, TokenResponse};
pub use errors::ErrorBody;
pub use offering::{Offering, OfferingId};
pub use roster::GroupMemberApplication;
pub use user::UserProfile;
