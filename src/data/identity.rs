use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;

use crate::data::types::User;

/// Turns a public key and a display-name hint into a [`User`].
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn build(&self, public_key: &str, name_hint: &str) -> Result<User>;
}

/// Uses the hint as the display name without any lookup.
pub struct LocalIdentities;

#[async_trait]
impl IdentityResolver for LocalIdentities {
    async fn build(&self, public_key: &str, name_hint: &str) -> Result<User> {
        Ok(User::new(public_key, name_hint))
    }
}

const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    name: Option<String>,
}

/// Treats the hint as a GitHub login and uses the profile name when one is set.
pub struct GithubIdentities {
    client: reqwest::Client,
    base_url: String,
}

impl GithubIdentities {
    pub fn new() -> Self {
        Self::with_base_url(GITHUB_API)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("choreography-tui/", env!("CARGO_PKG_VERSION")))
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn profile_url(&self, login: &str) -> String {
        format!("{}/users/{login}", self.base_url)
    }
}

impl Default for GithubIdentities {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityResolver for GithubIdentities {
    async fn build(&self, public_key: &str, name_hint: &str) -> Result<User> {
        let url = self.profile_url(name_hint);
        tracing::debug!(%url, "resolving identity");
        let profile: GithubUser = self
            .client
            .get(&url)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to look up {name_hint}"))?
            .error_for_status()
            .wrap_err_with(|| format!("No profile for {name_hint}"))?
            .json()
            .await
            .wrap_err_with(|| format!("Malformed profile for {name_hint}"))?;
        Ok(User::new(public_key, display_name(profile)))
    }
}

fn display_name(profile: GithubUser) -> String {
    match profile.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => profile.login,
    }
}
