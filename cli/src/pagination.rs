#![deny(missing_docs)]

//! # Pagination Command
//!
//! Reports pagination conventions found in query parameters.

use crate::error::CliResult;
use crate::input::InputArgs;
use crate::output::{write_structured, Format};
use oas_guide_core::detect_pagination;
use std::io::Write;

/// Arguments for the pagination command.
#[derive(clap::Args, Debug, Clone)]
pub struct PaginationArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Analyze one endpoint (e.g. `"GET /users"`) instead of every GET endpoint.
    #[clap(long)]
    pub endpoint: Option<String>,

    /// Output format.
    #[clap(long, value_enum, default_value = "text")]
    pub format: Format,
}

/// Executes the pagination command.
pub fn execute(args: &PaginationArgs, out: &mut impl Write) -> CliResult<()> {
    let model = args.input.load_model()?;
    let report = detect_pagination(&model, args.endpoint.as_deref())?;

    if args.format != Format::Text {
        return write_structured(out, &report, args.format);
    }
    for pattern in &report.detected {
        let names: Vec<&str> = pattern.parameters.iter().map(|p| p.name.as_str()).collect();
        writeln!(
            out,
            "{}: {} ({})",
            pattern.endpoint,
            pattern.style,
            names.join(", ")
        )?;
    }
    for recommendation in &report.recommendations {
        writeln!(out, "{}", recommendation)?;
    }
    Ok(())
}
