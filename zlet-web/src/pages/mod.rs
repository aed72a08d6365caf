mod apply;
mod error;
pub mod login;
mod roster;

pub use apply::ApplyPage;
pub use error::ErrorPage;
pub use login::LoginPage;
pub use roster::RosterPage;
