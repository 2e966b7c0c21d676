/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `verify`: resolve a token owner and apply the group allowlist
- `check_config`: validate and print the effective configuration

These handlers are intentionally small and use the library components:
config, providers, and the gate.
*/

use crate::config::Config;
use crate::error::Result;

// Token verification handler
pub mod verify {
    //! Builds the bearer-carrying client from a raw access token and runs
    //! the authenticate-then-authorize gate once.

    use super::*;
    use crate::gate::authenticate;
    use crate::http::authenticated_client;
    use crate::identity::AuthOutcome;
    use crate::providers::create_provider;

    /// Verify an access token against the configured provider
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `token` - OAuth access token of the user being verified
    ///
    /// # Returns
    ///
    /// Returns the gate outcome; a denied user is `Ok(AuthOutcome::Forbidden)`
    ///
    /// # Errors
    ///
    /// Returns error if the provider or client cannot be built, or if the
    /// profile or group lookup fails
    pub async fn run_verify(config: &Config, token: &str) -> Result<AuthOutcome> {
        let provider = create_provider(config)?;
        let client = authenticated_client(token, &config.http)?;
        let allowed = config.allowed_groups();

        tracing::info!(
            provider = provider.name(),
            allowed_groups = allowed.len(),
            "Verifying access token"
        );

        let outcome = authenticate(provider.as_ref(), &client, &allowed).await?;
        Ok(outcome)
    }
}

// Configuration check handler
pub mod check_config {
    use super::*;

    /// Render the effective configuration as YAML
    pub fn render_config(config: &Config) -> Result<String> {
        Ok(serde_yaml::to_string(config)?)
    }
}
