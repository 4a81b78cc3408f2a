use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use fleetctl::config::{self, Config};
use fleetctl::error::{ConfigError, FleetctlError};
use fleetctl::exit_codes::{codes, exit_code_for_error};
use fleetctl::{instance, notify, reclaim};

#[derive(Parser)]
#[command(name = "fleetctl")]
#[command(
    about = "AWS account housekeeping CLI",
    long_about = "fleetctl performs routine AWS account housekeeping.\n\nCommands:\n  - instance: launch, start, stop, reboot, terminate, and list EC2 instances\n  - reclaim: deregister unused AMIs, delete old snapshots and unattached volumes\n  - notify: send a notification email via SES\n\nReclaim commands are destructive and run without confirmation so they\ncan be scheduled unattended. Review the per-command help before use."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage EC2 instances
    Instance {
        #[command(subcommand)]
        subcommand: instance::InstanceCommands,
    },
    /// Reclaim unused resources (AMIs, snapshots, volumes)
    Reclaim {
        #[command(subcommand)]
        subcommand: reclaim::ReclaimCommands,
    },
    /// Send the configured notification email via SES
    Notify,
    /// Initialize a config file with defaults
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".fleetctl.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Suppress INFO by default; --verbose turns on debug logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(codes::CONFIG_ERROR);
        }
    };

    let result = run(cli.command, &config).await;

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(exit_code_for_error(&e));
    }
}

async fn run(command: Commands, config: &Config) -> fleetctl::Result<()> {
    match command {
        Commands::Instance { subcommand } => instance::handle_command(subcommand, config).await,
        Commands::Reclaim { subcommand } => reclaim::handle_command(subcommand, config).await,
        Commands::Notify => notify::send_notification(config).await,
        Commands::Init { output } => config::init_config(&output)
            .map_err(|e| FleetctlError::Config(ConfigError::ParseError(format!("{:#}", e)))),
    }
}
