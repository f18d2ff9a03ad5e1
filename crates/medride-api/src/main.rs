//! MedRide CLI entry point.
//!
//! Binary name: `medride`
//!
//! Parses CLI arguments, initializes tracing and the seeded service registry,
//! then dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use medride_observe::tracing_setup::{default_directive, init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(default_directive(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "medride", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init(cli.strict).await?;

    match cli.command {
        Commands::List {
            status,
            voucher,
            limit,
        } => {
            cli::service::list_services(&state, status, voucher, limit, cli.json).await?;
        }

        Commands::Show { number } => {
            cli::service::show_service(&state, &number, cli.json).await?;
        }

        Commands::Authorizations => {
            cli::authorization::list_authorizations(&state, cli.json).await?;
        }

        Commands::Scenario => {
            cli::scenario::run_scenario(&state, cli.json).await?;
        }

        Commands::Session { role } => {
            cli::session::run_session(&state, role).await?;
        }

        // Handled before state init
        Commands::Completions { .. } => {}
    }

    Ok(())
}
