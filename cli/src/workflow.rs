#![deny(missing_docs)]

//! # Workflow Command
//!
//! Exports a workflow config calling the selected endpoints in order.

use crate::error::{CliError, CliResult};
use crate::input::InputArgs;
use crate::output::{write_structured, Format};
use oas_guide_core::build_workflow;
use std::io::Write;

/// Arguments for the workflow command.
#[derive(clap::Args, Debug, Clone)]
pub struct WorkflowArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Endpoint identifiers to chain, in order (every endpoint when omitted).
    #[clap(long, short = 'e')]
    pub endpoint: Vec<String>,

    /// Workflow name (defaults to the API title).
    #[clap(long)]
    pub name: Option<String>,

    /// Output format (`json` or `yaml`).
    #[clap(long, value_enum, default_value = "json")]
    pub format: Format,
}

/// Executes the workflow command.
pub fn execute(args: &WorkflowArgs, out: &mut impl Write) -> CliResult<()> {
    if args.format == Format::Text {
        return Err(CliError::General(
            "workflows have no text rendering; use --format json or yaml".to_string(),
        ));
    }
    let model = args.input.load_model()?;
    let name = args.name.clone().unwrap_or_else(|| model.title.clone());
    let ids: Vec<&str> = args.endpoint.iter().map(String::as_str).collect();
    let workflow = build_workflow(&model, &name, &ids)?;
    write_structured(out, &workflow, args.format)
}
