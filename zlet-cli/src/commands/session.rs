use std::{
    env, fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use directories::BaseDirs;
use rpassword::prompt_password;
use shared::{
    client::CampClient,
    config::ClientConfig,
    models::{LoginForm, LoginRejection, UserProfile},
    navigation::pages_for,
    session::{Session, SessionError, TokenStore},
};

/// Bearer token persisted between invocations, readable only by its owner.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        ensure_parent(&self.path).map_err(|err| SessionError::Persist(err.to_string()))?;
        fs::write(&self.path, token).map_err(|err| {
            SessionError::Persist(format!(
                "failed to write session token at {}: {err}",
                self.path.display()
            ))
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|err| {
                SessionError::Persist(format!("failed to set session token permissions: {err}"))
            })?;
        }
        Ok(())
    }

    fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path)
            && err.kind() != io::ErrorKind::NotFound
        {
            tracing::warn!(path = %self.path.display(), error = %err, "could not remove session token");
        }
    }
}

/// Location of the stored token; `ZLET_SESSION_PATH` wins over the config dir.
pub fn session_path() -> PathBuf {
    if let Ok(path) = env::var("ZLET_SESSION_PATH")
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }
    BaseDirs::new().map_or_else(
        || PathBuf::from("./session.token"),
        |dirs| dirs.config_dir().join("zlet").join("session.token"),
    )
}

/// API client over the persisted session.
pub fn client(config: &ClientConfig) -> CampClient {
    let session = Session::new(Arc::new(FileTokenStore::new(session_path())));
    CampClient::new(&config.api_base_url, session)
}

pub async fn login(client: &CampClient, username: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => prompt("Username: ")?,
    };
    let password = prompt_password("Password: ")?;
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }

    if let Err(err) = client.login(&LoginForm { username, password }).await {
        tracing::debug!(error = %err, "login rejected");
        bail!("{}", LoginRejection::classify(&err));
    }

    let profile = client
        .me()
        .await
        .context("signed in, but the profile could not be loaded")?;
    print_profile(&profile);
    println!("session stored at {}", session_path().display());
    Ok(())
}

pub async fn me(client: &CampClient) -> Result<()> {
    if !client.session().is_active() {
        bail!("no active session found; run `zlet login` first");
    }
    let profile = client.me().await.map_err(|err| {
        if err.is_unauthorized() {
            anyhow::anyhow!("session expired. run `zlet login` to sign in again")
        } else {
            err.into()
        }
    })?;
    print_profile(&profile);
    Ok(())
}

pub fn logout(client: &CampClient) -> Result<()> {
    let path = session_path();
    if client.session().is_active() {
        client.logout();
        println!("Removed session token at {}", path.display());
    } else {
        println!("No session token found at {}", path.display());
    }
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create session directory {}", parent.display()))?;
    }
    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!("Logged in as {}", profile.display_name());
    println!("email: {}", profile.email);
    if let Some(group) = profile.group.as_deref().filter(|group| !group.is_empty()) {
        println!("group: {group}");
    }
    println!("role: {}", if profile.leader { "leader" } else { "member" });
    println!(
        "pages: {}",
        pages_for(profile.leader)
            .iter()
            .map(|page| page.label())
            .collect::<Vec<_>>()
            .join(", ")
    );
}
