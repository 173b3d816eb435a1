#![deny(missing_docs)]

//! # Summary Command
//!
//! Prints document metadata, corpus statistics and the tag index.

use crate::error::CliResult;
use crate::input::InputArgs;
use crate::output::{write_structured, Format};
use oas_guide_core::oas::models::{Summary, TagGroup};
use oas_guide_core::ApiSpecModel;
use serde::Serialize;
use std::io::Write;

/// Arguments for the summary command.
#[derive(clap::Args, Debug, Clone)]
pub struct SummaryArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Output format.
    #[clap(long, value_enum, default_value = "text")]
    pub format: Format,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryView<'m> {
    title: &'m str,
    version: &'m str,
    base_url: String,
    summary: &'m Summary,
    tags: &'m [TagGroup],
    diagnostics: usize,
}

/// Executes the summary command.
pub fn execute(args: &SummaryArgs, out: &mut impl Write) -> CliResult<()> {
    let model = args.input.load_model()?;
    match args.format {
        Format::Text => write_text(&model, out),
        format => write_structured(
            out,
            &SummaryView {
                title: &model.title,
                version: &model.version,
                base_url: model.base_url(),
                summary: &model.summary,
                tags: &model.tags,
                diagnostics: model.diagnostics.len(),
            },
            format,
        ),
    }
}

fn write_text(model: &ApiSpecModel, out: &mut impl Write) -> CliResult<()> {
    writeln!(out, "{} {}", model.title, model.version)?;
    if let Some(description) = &model.description {
        writeln!(out, "{}", description)?;
    }
    writeln!(out, "Base URL: {}", model.base_url())?;
    writeln!(out)?;

    let summary = &model.summary;
    writeln!(out, "Endpoints: {}", summary.total_endpoints)?;
    for (method, count) in &summary.endpoints_by_method {
        writeln!(out, "  {:<7} {}", method.as_str(), count)?;
    }
    let auth: Vec<String> = summary
        .authentication_types
        .iter()
        .map(ToString::to_string)
        .collect();
    writeln!(out, "Authentication: {}", auth.join(", "))?;
    writeln!(out, "Content types: {}", summary.common_content_types.join(", "))?;

    if !model.tags.is_empty() {
        writeln!(out)?;
        writeln!(out, "Tags:")?;
        for tag in &model.tags {
            match &tag.description {
                Some(description) => writeln!(
                    out,
                    "  {} ({}) - {}",
                    tag.name,
                    tag.endpoints.len(),
                    description
                )?,
                None => writeln!(out, "  {} ({})", tag.name, tag.endpoints.len())?,
            }
        }
    }

    if !model.diagnostics.is_empty() {
        writeln!(out)?;
        writeln!(out, "Diagnostics: {}", model.diagnostics.len())?;
        for diagnostic in &model.diagnostics {
            writeln!(out, "  {}", diagnostic)?;
        }
    }
    Ok(())
}
