use shared::models::UserProfile;
use yewdux::Store;

/// Profile of the signed-in user; `None` until `users/me` answered.
#[derive(Default, Clone, PartialEq, Store)]
pub struct AppState {
    pub profile: Option<UserProfile>,
}
