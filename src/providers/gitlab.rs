//! GitLab identity provider for Authgate
//!
//! Resolves the user through `GET <api>/user` and lists memberships through
//! `GET <api>/groups`, following the `Link: rel="next"` header GitLab sends
//! on every paginated response.

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

/// GitLab REST API provider
///
/// # Examples
///
/// ```no_run
/// use authgate::identity::AllowedGroups;
/// use authgate::providers::{GitlabProvider, IdentityProvider};
///
/// # async fn example(client: reqwest::Client) -> authgate::error::GateResult<()> {
/// let provider = GitlabProvider::new("https://gitlab.example.com/api/v4", 100)?;
/// let identity = provider.resolve_profile(&client).await?;
/// let decision = provider
///     .authorize(&client, &AllowedGroups::new(["core-team"]))
///     .await?;
/// println!("{} -> {:?}", identity.display_name, decision);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GitlabProvider {
    api_url: Url,
    max_pages: usize,
}

/// Response from GitLab's /user endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GitlabUser {
    id: Option<i64>,
    email: Option<String>,
    username: Option<String>,
    avatar_url: Option<String>,
}

/// Group record from GitLab's /groups endpoint
#[derive(Debug, Deserialize)]
struct GitlabGroup {
    #[serde(default)]
    path: String,
}

impl GitlabProvider {
    /// Create a new GitLab provider
    ///
    /// # Arguments
    ///
    /// * `api_url` - API base including the version path, e.g.
    ///   `https://gitlab.com/api/v4`
    /// * `max_pages` - Maximum number of group pages to follow
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`](crate::error::GateError::Config) if
    /// `api_url` is not an http(s) URL, or carries a query or fragment
    pub fn new(api_url: &str, max_pages: usize) -> GateResult<Self> {
        let api_url = parse_api_url(api_url)?;
        tracing::debug!("Initialized GitLab provider: api_url={}", api_url);
        Ok(Self { api_url, max_pages })
    }
}

#[async_trait]
impl IdentityProvider for GitlabProvider {
    fn name(&self) -> &str {
        "gitlab"
    }

    async fn resolve_profile(&self, client: &Client) -> GateResult<ExternalIdentity> {
        let url = endpoint(&self.api_url, "user")?;
        let user: GitlabUser = fetch_profile(client, url).await?;
        tracing::debug!(
            user_id = user.id.unwrap_or_default(),
            has_avatar = user.avatar_url.is_some(),
            "Resolved GitLab profile"
        );

        Ok(ExternalIdentity::new(
            user.username.unwrap_or_default(),
            user.email.unwrap_or_default(),
        ))
    }

    async fn fetch_groups(&self, client: &Client) -> GateResult<Vec<GroupMembership>> {
        let start = endpoint(&self.api_url, "groups")?;
        collect_pages(start, self.max_pages, |page, url| {
            fetch_group_page(client, page, url, |group: GitlabGroup| {
                GroupMembership::new(group.path)
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(GitlabProvider::new("gitlab.example.com", 10).is_err());
    }

    #[test]
    fn test_new_keeps_api_path() {
        let provider = GitlabProvider::new("https://gitlab.example.com/api/v4", 10).unwrap();
        assert_eq!(provider.api_url.path(), "/api/v4");
    }

    #[test]
    fn test_user_decodes_full_profile() {
        let json = r#"{"id":1,"email":"a@x.com","username":"alice","avatar_url":""}"#;
        let user: GitlabUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, Some(1));
        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.email.as_deref(), Some("a@x.com"));
    }

    #[test]
    fn test_user_decodes_missing_and_extra_fields() {
        let json = r#"{"username":"bob","state":"active","bot":false}"#;
        let user: GitlabUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.username.as_deref(), Some("bob"));
        assert!(user.email.is_none());
        assert!(user.id.is_none());
    }

    #[test]
    fn test_group_decodes_path_ignoring_other_fields() {
        let json = r#"[{"id":7,"path":"core-team","full_path":"acme/core-team"}]"#;
        let groups: Vec<GitlabGroup> = serde_json::from_str(json).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].path, "core-team");
    }
}
