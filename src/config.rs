//! Configuration management for Authgate
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{GateError, GateResult, Result};
use crate::identity::AllowedGroups;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Provider types understood by [`create_provider`](crate::providers::create_provider)
pub const VALID_PROVIDERS: [&str; 2] = ["gitlab", "github"];

/// Upper bound accepted for `pagination.max_pages`
pub const MAX_PAGES_LIMIT: usize = 10_000;

/// Main configuration structure for Authgate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (GitLab, GitHub)
    pub provider: ProviderConfig,
    /// Settings for the HTTP client built around the access token
    #[serde(default)]
    pub http: HttpConfig,
    /// Group listing pagination limits
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Provider configuration
///
/// Specifies which identity provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// GitLab configuration
    #[serde(default)]
    pub gitlab: GitlabConfig,

    /// GitHub configuration
    #[serde(default)]
    pub github: GithubConfig,
}

/// GitLab provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitlabConfig {
    /// REST API base, including the version path
    #[serde(default = "default_gitlab_api_url")]
    pub api_url: String,

    /// Group `path` values (the last path segment, not `full_path`) whose
    /// members may log in; empty allows everyone
    #[serde(default)]
    pub allowed_groups: Vec<String>,
}

fn default_gitlab_api_url() -> String {
    "https://gitlab.com/api/v4".to_string()
}

impl Default for GitlabConfig {
    fn default() -> Self {
        Self {
            api_url: default_gitlab_api_url(),
            allowed_groups: Vec::new(),
        }
    }
}

/// GitHub provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// REST API base
    #[serde(default = "default_github_api_url")]
    pub api_url: String,

    /// Organization logins whose members may log in; empty allows everyone
    #[serde(default)]
    pub allowed_organizations: Vec<String>,
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            allowed_organizations: Vec::new(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// `User-Agent` sent with every provider request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("authgate/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Maximum number of group pages followed before failing closed
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

fn default_max_pages() -> usize {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars()?;
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "gitlab".to_string(),
                gitlab: GitlabConfig::default(),
                github: GithubConfig::default(),
            },
            http: HttpConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GateError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| GateError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) -> Result<()> {
        if let Ok(provider_type) = std::env::var("AUTHGATE_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(api_url) = std::env::var("AUTHGATE_GITLAB_API_URL") {
            self.provider.gitlab.api_url = api_url;
        }

        if let Ok(groups) = std::env::var("AUTHGATE_GITLAB_ALLOWED_GROUPS") {
            self.provider.gitlab.allowed_groups = split_list(&groups);
        }

        if let Ok(api_url) = std::env::var("AUTHGATE_GITHUB_API_URL") {
            self.provider.github.api_url = api_url;
        }

        if let Ok(orgs) = std::env::var("AUTHGATE_GITHUB_ALLOWED_ORGANIZATIONS") {
            self.provider.github.allowed_organizations = split_list(&orgs);
        }

        if let Ok(timeout) = std::env::var("AUTHGATE_HTTP_TIMEOUT_SECONDS") {
            self.http.timeout_seconds = timeout.parse().map_err(|e| {
                GateError::Config(format!("AUTHGATE_HTTP_TIMEOUT_SECONDS: {}", e))
            })?;
        }

        if let Ok(max_pages) = std::env::var("AUTHGATE_MAX_PAGES") {
            self.pagination.max_pages = max_pages
                .parse()
                .map_err(|e| GateError::Config(format!("AUTHGATE_MAX_PAGES: {}", e)))?;
        }

        Ok(())
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(provider) = cli.command.provider_override() {
            tracing::debug!("Using provider override: {}", provider);
            self.provider.provider_type = provider.to_string();
        }
    }

    /// Validate the configuration
    ///
    /// Ensures the provider type is known, its API URL is usable, and that
    /// allowlists and limits are well-formed.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(GateError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !VALID_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(GateError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                VALID_PROVIDERS.join(", ")
            ))
            .into());
        }

        parse_api_url(self.api_url())?;

        if self.allowed_group_paths().iter().any(|g| g.trim().is_empty()) {
            return Err(GateError::Config(format!(
                "{} allowlist contains an empty entry",
                self.provider.provider_type
            ))
            .into());
        }

        if self.http.timeout_seconds == 0 {
            return Err(
                GateError::Config("http.timeout_seconds must be greater than 0".to_string()).into(),
            );
        }

        if self.pagination.max_pages == 0 || self.pagination.max_pages > MAX_PAGES_LIMIT {
            return Err(GateError::Config(format!(
                "pagination.max_pages must be between 1 and {}",
                MAX_PAGES_LIMIT
            ))
            .into());
        }

        Ok(())
    }

    /// API base URL of the active provider
    pub fn api_url(&self) -> &str {
        match self.provider.provider_type.as_str() {
            "github" => &self.provider.github.api_url,
            _ => &self.provider.gitlab.api_url,
        }
    }

    fn allowed_group_paths(&self) -> &[String] {
        match self.provider.provider_type.as_str() {
            "github" => &self.provider.github.allowed_organizations,
            _ => &self.provider.gitlab.allowed_groups,
        }
    }

    /// Allowlist of the active provider
    pub fn allowed_groups(&self) -> AllowedGroups {
        AllowedGroups::new(self.allowed_group_paths().iter().cloned())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Parses and checks a provider API base URL.
pub(crate) fn parse_api_url(api_url: &str) -> GateResult<Url> {
    let url = Url::parse(api_url)
        .map_err(|e| GateError::Config(format!("Invalid api_url '{}': {}", api_url, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(GateError::Config(format!(
            "api_url must use http or https: {}",
            api_url
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(GateError::Config(format!(
            "api_url must not carry a query or fragment: {}",
            api_url
        )));
    }
    Ok(url)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
