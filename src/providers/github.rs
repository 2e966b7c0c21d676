//! GitHub identity provider for Authgate
//!
//! GitHub has no nested groups; organization membership plays that role.
//! The organization `login` is matched against the allowlist the same way a
//! GitLab group path is.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::parse_api_url;
use crate::error::GateResult;
use crate::http::endpoint;
use crate::identity::{ExternalIdentity, GroupMembership};
use crate::pagination::collect_pages;
use crate::providers::{fetch_group_page, fetch_profile, IdentityProvider};

/// GitHub REST API provider
#[derive(Debug, Clone)]
pub struct GithubProvider {
    api_url: Url,
    max_pages: usize,
}

/// Response from GitHub's /user endpoint
///
/// `email` is null when the user keeps it private.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GithubUser {
    id: Option<i64>,
    login: Option<String>,
    email: Option<String>,
}

/// Organization record from GitHub's /user/orgs endpoint
#[derive(Debug, Deserialize)]
struct GithubOrganization {
    #[serde(default)]
    login: String,
}

impl GithubProvider {
    /// Create a new GitHub provider
    ///
    /// `api_url` is `https://api.github.com` for github.com or
    /// `https://<host>/api/v3` for GitHub Enterprise Server.
    pub fn new(api_url: &str, max_pages: usize) -> GateResult<Self> {
        let api_url = parse_api_url(api_url)?;
        tracing::debug!("Initialized GitHub provider: api_url={}", api_url);
        Ok(Self { api_url, max_pages })
    }
}

#[async_trait]
impl IdentityProvider for GithubProvider {
    fn name(&self) -> &str {
        "github"
    }

    async fn resolve_profile(&self, client: &Client) -> GateResult<ExternalIdentity> {
        let url = endpoint(&self.api_url, "user")?;
        let user: GithubUser = fetch_profile(client, url).await?;
        tracing::debug!(
            user_id = user.id.unwrap_or_default(),
            "Resolved GitHub profile"
        );

        Ok(ExternalIdentity::new(
            user.login.unwrap_or_default(),
            user.email.unwrap_or_default(),
        ))
    }

    async fn fetch_groups(&self, client: &Client) -> GateResult<Vec<GroupMembership>> {
        let start = endpoint(&self.api_url, "user/orgs")?;
        collect_pages(start, self.max_pages, |page, url| {
            fetch_group_page(client, page, url, |org: GithubOrganization| {
                GroupMembership::new(org.login)
            })
        })
        .await
    }
}
