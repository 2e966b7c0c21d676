//! Command-line interface definition for Authgate
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for verifying an access token and checking
//! configuration.

use clap::{Parser, Subcommand};

/// Authgate - external identity and group allowlist gate
///
/// Resolves the owner of an OAuth access token through the provider API and
/// checks their group membership against the configured allowlist.
#[derive(Parser, Debug, Clone)]
#[command(name = "authgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/authgate.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Authgate
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve the token owner and check the group allowlist
    Verify {
        /// OAuth access token of the user
        #[arg(short, long, env = "AUTHGATE_TOKEN", hide_env_values = true)]
        token: String,

        /// Override the provider from config (gitlab, github)
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Load and validate configuration, then print it
    CheckConfig,
}

impl Commands {
    /// Provider override supplied on the command line, if any
    pub fn provider_override(&self) -> Option<&str> {
        match self {
            Commands::Verify { provider, .. } => provider.as_deref(),
            Commands::CheckConfig => None,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/authgate.yaml".to_string()),
            verbose: false,
            json_logs: false,
            command: Commands::CheckConfig,
        }
    }
}
