//! Stratus CLI binary entrypoint.
//!
//! This is the main entry point for the `stratus` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stratus_cli::cli::{ApiCommands, Cli, Commands};
use stratus_cli::commands::{
    ApiCommand, ContainerCommand, ImageCommand, NetworkCommand, ObjectCommand, ProjectCommand,
    ServerCommand, VolumeCommand,
};
use stratus_cli::output::OutputFormat;
use stratus_client::ClientRegistry;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), stratus_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    // The support table needs no credentials; everything else does.
    if let Commands::Api {
        command: ApiCommands::List { supported: true },
    } = &cli.command
    {
        format.write(&mut stdout, &stratus_cli::commands::api::supported_versions())?;
        return Ok(());
    }
    let mut registry = ClientRegistry::new(cli.cloud_options())?;

    match &cli.command {
        Commands::Api { command } => {
            let mut cmd = ApiCommand::new(&mut registry);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Server { command } => {
            let mut cmd = ServerCommand::new(&mut registry);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Project { command } => {
            let mut cmd = ProjectCommand::new(&mut registry);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Image { command } => {
            let mut cmd = ImageCommand::new(&mut registry);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Network { command } => {
            let mut cmd = NetworkCommand::new(&mut registry);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Volume { command } => {
            let mut cmd = VolumeCommand::new(&mut registry);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Container { command } => {
            let mut cmd = ContainerCommand::new(&mut registry);
            cmd.execute(&mut stdout, &format, command).await?;
        }
        Commands::Object { command } => {
            let mut cmd = ObjectCommand::new(&mut registry);
            cmd.execute(&mut stdout, &format, command).await?;
        }
    }
    Ok(())
}
