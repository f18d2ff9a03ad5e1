//! CLI command definitions for the `medride` binary.
//!
//! Uses clap derive macros for argument parsing. Every invocation starts from
//! the seeded mock data set; nothing is written back.

pub mod authorization;
pub mod render;
pub mod scenario;
pub mod service;
pub mod session;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Medical-transport scheduling: request trips, dispatch them, settle cancellations.
#[derive(Parser)]
#[command(name = "medride", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reject status changes that are not lifecycle edges.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List services, most recent first.
    #[command(alias = "ls")]
    List {
        /// Filter by status (pending, open, scheduled, cancellation_requested, ...).
        #[arg(long)]
        status: Option<String>,

        /// Filter by voucher reference.
        #[arg(long)]
        voucher: Option<String>,

        /// Maximum number of rows.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show one service by its number (e.g. SRV-000003).
    Show {
        number: String,
    },

    /// List the authorizations trips can be requested against.
    #[command(alias = "auths")]
    Authorizations,

    /// Run the request / approve / re-request cancellation walkthrough.
    Scenario,

    /// Start an interactive session in the user or coordinator role.
    Session {
        #[arg(long, value_enum, default_value = "user")]
        role: Role,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Which view an interactive session presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    /// Patient: requests trips and asks for cancellations.
    User,
    /// Dispatch: assigns crews and resolves cancellation requests.
    Coordinator,
}
