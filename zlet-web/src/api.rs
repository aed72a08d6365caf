use gloo_storage::{LocalStorage, Storage};
use once_cell::unsync::OnceCell;
use shared::client::CampClient;
use shared::navigation::ENTRY_PATH;
use shared::session::{Session, SessionError, TokenStore};
use std::sync::Arc;

use crate::config::FrontendConfig;

const TOKEN_KEY: &str = "token";

thread_local! {
    static SHARED_CLIENT: OnceCell<CampClient> = const { OnceCell::new() };
}

/// Bearer token kept in the browser's local storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTokenStore;

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<String> {
        LocalStorage::get(TOKEN_KEY).ok()
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        LocalStorage::set(TOKEN_KEY, token).map_err(|err| SessionError::Persist(err.to_string()))
    }

    fn clear(&self) {
        LocalStorage::delete(TOKEN_KEY);
    }
}

/// Full page load of the entry view, so no component state survives a
/// rejected token.
fn redirect_to_entry() {
    if let Some(window) = web_sys::window()
        && let Err(err) = window.location().set_href(ENTRY_PATH)
    {
        tracing::error!(?err, "failed to redirect to the entry view");
    }
}

/// The client every page shares.
pub fn shared_client() -> CampClient {
    SHARED_CLIENT.with(|cell| {
        cell.get_or_init(|| {
            let config = FrontendConfig::default();
            let session =
                Session::new(Arc::new(BrowserTokenStore)).with_expiry_hook(redirect_to_entry);
            CampClient::new(&config.api_base_url, session)
        })
        .clone()
    })
}
