#![deny(missing_docs)]

//! # Guide Command
//!
//! Prints the execution guide for one endpoint.

use crate::error::CliResult;
use crate::input::InputArgs;
use crate::output::{write_structured, Format};
use oas_guide_core::guide::EndpointExecutionGuide;
use std::io::Write;

/// Which snippet to print in text mode.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// curl command.
    Curl,
    /// Raw HTTP/1.1 request.
    Http,
    /// JavaScript `fetch`.
    Javascript,
    /// Python `requests`.
    Python,
}

/// Arguments for the guide command.
#[derive(clap::Args, Debug, Clone)]
pub struct GuideArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Endpoint identifier, e.g. `"GET /users/{id}"`.
    #[clap(long, short = 'e')]
    pub endpoint: String,

    /// Snippets to include in text mode (all when omitted).
    #[clap(long, value_enum)]
    pub sample: Vec<Sample>,

    /// Output format.
    #[clap(long, value_enum, default_value = "text")]
    pub format: Format,
}

/// Executes the guide command.
pub fn execute(args: &GuideArgs, out: &mut impl Write) -> CliResult<()> {
    let model = args.input.load_model()?;
    let guide = model.build_guide(&args.endpoint)?;
    match args.format {
        Format::Text => write_text(&guide, &args.sample, out),
        format => write_structured(out, &guide, format),
    }
}

fn write_text(guide: &EndpointExecutionGuide, samples: &[Sample], out: &mut impl Write) -> CliResult<()> {
    match &guide.summary {
        Some(summary) => writeln!(out, "# {} - {}", guide.endpoint_id, summary)?,
        None => writeln!(out, "# {}", guide.endpoint_id)?,
    }
    writeln!(out)?;
    for (i, step) in guide.steps.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, step.instruction)?;
    }

    let wanted = |sample: Sample| samples.is_empty() || samples.contains(&sample);
    let code = &guide.code_samples;
    for (sample, title, text) in [
        (Sample::Curl, "curl", &code.curl),
        (Sample::Http, "HTTP", &code.http),
        (Sample::Javascript, "JavaScript", &code.javascript),
        (Sample::Python, "Python", &code.python),
    ] {
        if wanted(sample) {
            writeln!(out)?;
            writeln!(out, "## {}", title)?;
            writeln!(out, "{}", text)?;
        }
    }

    if let Some(example) = &guide.response_example {
        writeln!(out)?;
        match &guide.response_status {
            Some(status) => writeln!(out, "## Response example ({})", status)?,
            None => writeln!(out, "## Response example")?,
        }
        writeln!(out, "{}", serde_json::to_string_pretty(example)?)?;
    }
    Ok(())
}
