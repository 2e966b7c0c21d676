//! Authgate - external identity verification and authorization gate
//!
//! Given an OAuth access token obtained by a regular authorization-code
//! flow, this library resolves the external user's profile through the
//! provider's REST API and enforces an optional group-membership allowlist,
//! paging through the provider's group listing by following `Link` headers.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `gate`: Authenticate-then-authorize composition
//! - `providers`: Provider abstraction and implementations (GitLab, GitHub)
//! - `pagination`: `Link` header parsing, cursors, and page folding
//! - `identity`: External identity, group membership, and decision types
//! - `http`: Authenticated HTTP client construction
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use authgate::{authenticate, AuthOutcome, Config};
//! use authgate::http::authenticated_client;
//! use authgate::providers::create_provider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/authgate.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let provider = create_provider(&config)?;
//!     let client = authenticated_client("glpat-example", &config.http)?;
//!     match authenticate(provider.as_ref(), &client, &config.allowed_groups()).await? {
//!         AuthOutcome::Authenticated(identity) => println!("hello {}", identity.display_name),
//!         AuthOutcome::Forbidden => println!("access denied"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gate;
pub mod http;
pub mod identity;
pub mod logging;
pub mod pagination;
pub mod providers;

// Re-export commonly used types
pub use config::Config;
pub use error::{GateError, GateResult, Result};
pub use gate::authenticate;
pub use identity::{AllowedGroups, AuthOutcome, Decision, ExternalIdentity, GroupMembership};
pub use pagination::{next_page, Cursor, LinkError};
pub use providers::{GithubProvider, GitlabProvider, IdentityProvider};
