//! # Swatch CLI
//!
//! Runs the groups API server and the frontend dev server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "swatch")]
#[command(version)]
#[command(about = "Groups API and frontend dev server", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Database connection URL
        #[arg(long)]
        database_url: Option<String>,

        /// Token signing secret
        #[arg(long, env = "SWATCH_JWT_SECRET", hide_env_values = true)]
        jwt_secret: Option<String>,
    },

    /// Start the frontend dev server
    Dev {
        /// Dev server config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the dev server port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Display version and build info
    Version,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let telemetry_config = swatch_telemetry::TelemetryConfig::new("swatch")
        .with_log_level(&cli.log_level);

    let telemetry_config = if cli.json_logs {
        telemetry_config.with_json_logs()
    } else {
        telemetry_config
    };

    swatch_telemetry::init_logging(&telemetry_config);

    let mut cfg = config::Config::load();

    match cli.command {
        Commands::Serve {
            host,
            port,
            database_url,
            jwt_secret,
        } => {
            let host = host.unwrap_or_else(|| cfg.server_host.clone());
            let port = port.unwrap_or(cfg.server_port);
            if let Some(url) = database_url {
                cfg.database_url = url;
            }
            if jwt_secret.is_some() {
                cfg.jwt_secret = jwt_secret;
            }
            commands::serve(host, port, &cfg).await?;
        },

        Commands::Dev { config, port } => {
            commands::dev(config.or(cfg.dev_config), port).await?;
        },

        Commands::Version => {
            commands::version();
        },

        Commands::Config { action } => match action {
            ConfigAction::Show => config::show_config(),
            ConfigAction::Init => commands::init_config()?,
            ConfigAction::Path => println!("{}", config::Config::config_path().display()),
        },
    }

    Ok(())
}
