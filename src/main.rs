use anyhow::Result;
use clap::Parser;
use log::{ debug, LevelFilter };
use veritas::{ VerificationEngine, VeritasConfig };

mod cli;
use cli::{ Commands, VeritasCli };

#[tokio::main]
async fn main() -> Result<()> {
    let cli = VeritasCli::parse();

    setup_logging(&cli.log_level);

    if dotenv::dotenv().is_ok() {
        debug!("Loaded environment variables from .env file");
    }

    let config = match VeritasConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            cli::ui::print_error(&format!("Invalid configuration: {}", e));
            return Err(e.into());
        }
    };

    match &cli.command {
        Commands::Verify { model, properties, method, max_depth, timeout, parallel } => {
            let mut config = config;
            if let Some(depth) = max_depth {
                config.default_max_depth = *depth;
            }
            if let Some(secs) = timeout {
                config.default_timeout_secs = *secs;
            }
            let mut engine = VerificationEngine::new(config);

            cli::commands::verify::execute(
                &mut engine,
                model,
                properties,
                method,
                *parallel,
                &cli.output_format
            ).await?;
        }

        Commands::Inspect { model } => {
            cli::commands::inspect::execute(model, &cli.output_format)?;
        }
    }

    Ok(())
}

/// Install env_logger at `log_level`; unknown levels fall back to info
fn setup_logging(log_level: &str) {
    let level = log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .init();
    debug!("Log level set to {}", level);
}
