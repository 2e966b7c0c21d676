//! Authgate - external identity and group allowlist gate
//!
#![doc = "Main entry point for the Authgate command-line tool."]

use anyhow::Result;

use authgate::cli::{Cli, Commands};
use authgate::commands;
use authgate::config::Config;
use authgate::identity::AuthOutcome;
use authgate::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_logging(cli.verbose, cli.json_logs)?;

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/authgate.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Verify { token, .. } => {
            tracing::info!("Starting token verification");
            match commands::verify::run_verify(&config, &token).await? {
                AuthOutcome::Authenticated(identity) => {
                    println!("{}", serde_json::to_string_pretty(&identity)?);
                    Ok(())
                }
                AuthOutcome::Forbidden => {
                    anyhow::bail!("access denied: user is not a member of any allowed group")
                }
            }
        }
        Commands::CheckConfig => {
            tracing::info!("Configuration is valid");
            print!("{}", commands::check_config::render_config(&config)?);
            Ok(())
        }
    }
}
