//! Identity provider module for Authgate
//!
//! This module contains the provider abstraction and implementations for
//! GitLab and GitHub. Each provider resolves the external user's profile and
//! lists the groups the user belongs to; the membership decision itself is
//! shared by every provider through [`IdentityProvider::authorize`].

pub mod github;
pub mod gitlab;

pub use github::GithubProvider;
pub use gitlab::GitlabProvider;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{GateError, GateResult, Result};
use crate::http;
use crate::identity::{AllowedGroups, Decision, ExternalIdentity, GroupMembership};
use crate::pagination::{Cursor, Page};

/// Contract implemented by every external identity provider
///
/// The `client` passed to each method must already attach the user's bearer
/// token to every request.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use authgate::error::GateResult;
/// use authgate::identity::{ExternalIdentity, GroupMembership};
/// use authgate::providers::IdentityProvider;
///
/// struct StaticProvider;
///
/// #[async_trait]
/// impl IdentityProvider for StaticProvider {
///     fn name(&self) -> &str {
///         "static"
///     }
///
///     async fn resolve_profile(&self, _client: &reqwest::Client) -> GateResult<ExternalIdentity> {
///         Ok(ExternalIdentity::new("alice", "a@x.com"))
///     }
///
///     async fn fetch_groups(&self, _client: &reqwest::Client) -> GateResult<Vec<GroupMembership>> {
///         Ok(vec![GroupMembership::new("core-team")])
///     }
/// }
/// ```
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Fetches the current user's profile with exactly one request.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::IdentityFetchFailed`] on transport or status
    /// failures and [`GateError::ProfileDecodeFailed`] when the body is not a
    /// JSON object.
    async fn resolve_profile(&self, client: &Client) -> GateResult<ExternalIdentity>;

    /// Lists every group the current user belongs to, across all pages.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::GroupFetchFailed`] if any page fails. No partial
    /// list is ever returned.
    async fn fetch_groups(&self, client: &Client) -> GateResult<Vec<GroupMembership>>;

    /// Checks the current user against `allowed`.
    ///
    /// An empty allowlist authorizes immediately without any request.
    /// Otherwise every page of groups is fetched before deciding.
    async fn authorize(&self, client: &Client, allowed: &AllowedGroups) -> GateResult<Decision> {
        if allowed.is_empty() {
            tracing::debug!(
                provider = self.name(),
                "No allowlist configured, skipping group check"
            );
            return Ok(Decision::Authorized);
        }

        let groups = self.fetch_groups(client).await?;
        let decision = allowed.decide(&groups);
        tracing::debug!(
            provider = self.name(),
            groups = groups.len(),
            ?decision,
            "Group membership checked"
        );
        Ok(decision)
    }
}

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Full configuration; the active provider is
///   `config.provider.provider_type`
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if the provider type is unknown or its API URL is invalid
pub fn create_provider(config: &Config) -> Result<Box<dyn IdentityProvider>> {
    let max_pages = config.pagination.max_pages;
    match config.provider.provider_type.as_str() {
        "gitlab" => Ok(Box::new(GitlabProvider::new(
            &config.provider.gitlab.api_url,
            max_pages,
        )?)),
        "github" => Ok(Box::new(GithubProvider::new(
            &config.provider.github.api_url,
            max_pages,
        )?)),
        other => Err(GateError::Config(format!("Unknown provider type: {}", other)).into()),
    }
}

/// Fetches a profile document and decodes it leniently.
///
/// The body must be a JSON object; fields missing from it take their
/// defaults and unknown fields are ignored.
pub(crate) async fn fetch_profile<R>(client: &Client, url: Url) -> GateResult<R>
where
    R: DeserializeOwned,
{
    let (_, body) = http::get(client, url.clone()).await.map_err(|source| {
        tracing::warn!("Profile request to {} failed: {}", url, source);
        GateError::IdentityFetchFailed {
            url: url.to_string(),
            source,
        }
    })?;

    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| GateError::ProfileDecodeFailed(e.to_string()))?;
    if !value.is_object() {
        return Err(GateError::ProfileDecodeFailed(
            "expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| GateError::ProfileDecodeFailed(e.to_string()))
}

/// Fetches one page of a group listing and converts its records.
pub(crate) async fn fetch_group_page<R, F>(
    client: &Client,
    page: usize,
    url: Url,
    to_membership: F,
) -> GateResult<Page<GroupMembership>>
where
    R: DeserializeOwned,
    F: Fn(R) -> GroupMembership,
{
    let (headers, body) = http::get(client, url.clone()).await.map_err(|e| {
        tracing::warn!(page, "Group page request to {} failed: {}", url, e);
        GateError::GroupFetchFailed {
            page,
            reason: e.to_string(),
        }
    })?;

    let records: Vec<R> =
        serde_json::from_slice(&body).map_err(|e| GateError::GroupFetchFailed {
            page,
            reason: format!("failed to decode group listing: {e}"),
        })?;

    let next = Cursor::from_headers(&headers, &url).map_err(|e| {
        tracing::warn!(page, "Unusable pagination header from {}: {}", url, e);
        GateError::GroupFetchFailed {
            page,
            reason: e.to_string(),
        }
    })?;

    tracing::debug!(page, records = records.len(), "Fetched group page");
    Ok(Page {
        items: records.into_iter().map(to_membership).collect(),
        next,
    })
}
