#![deny(missing_docs)]

//! # OAS Guide CLI
//!
//! Command Line Interface for the OpenAPI normalization engine.
//!
//! Supported Commands:
//! - `summary`: Document metadata, statistics and tags.
//! - `endpoints`: Endpoint search.
//! - `guide`: Execution guide (steps and code samples) for one endpoint.
//! - `workflow`: Automation workflow export.
//! - `model`: The full normalized model as JSON or YAML.
//! - `pagination`: Pagination pattern analysis.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod endpoints;
mod error;
mod guide;
mod input;
mod model;
mod output;
mod pagination;
mod summary;
mod workflow;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI -> LLM- and automation-ready API guides")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). Logs go to stderr.
    #[clap(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize the API: metadata, endpoint counts, auth types and tags.
    Summary(summary::SummaryArgs),
    /// List or search endpoints.
    Endpoints(endpoints::EndpointsArgs),
    /// Build the execution guide for one endpoint.
    Guide(guide::GuideArgs),
    /// Export an automation workflow calling endpoints in order.
    Workflow(workflow::WorkflowArgs),
    /// Dump the normalized model.
    Model(model::ModelArgs),
    /// Detect pagination patterns.
    Pagination(pagination::PaginationArgs),
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: &Commands, out: &mut impl Write) -> CliResult<()> {
    match command {
        Commands::Summary(args) => summary::execute(args, out),
        Commands::Endpoints(args) => endpoints::execute(args, out),
        Commands::Guide(args) => guide::execute(args, out),
        Commands::Workflow(args) => workflow::execute(args, out),
        Commands::Model(args) => model::execute(args, out),
        Commands::Pagination(args) => pagination::execute(args, out),
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cli.command, &mut out)?;
    out.flush()?;
    Ok(())
}
