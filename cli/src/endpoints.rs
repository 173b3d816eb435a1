#![deny(missing_docs)]

//! # Endpoints Command
//!
//! Lists endpoints, optionally filtered by text, method and tag.

use crate::error::{CliError, CliResult};
use crate::input::InputArgs;
use crate::output::{write_structured, Format};
use oas_guide_core::{EndpointQuery, HttpMethod};
use std::io::Write;

/// Arguments for the endpoints command.
#[derive(clap::Args, Debug, Clone)]
pub struct EndpointsArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Case-insensitive text matched against path, summary, description, tags and operationId.
    #[clap(long, short = 'q')]
    pub query: Option<String>,

    /// Only this HTTP method.
    #[clap(long, value_parser = parse_method)]
    pub method: Option<HttpMethod>,

    /// Only endpoints carrying this tag.
    #[clap(long)]
    pub tag: Option<String>,

    /// Output format.
    #[clap(long, value_enum, default_value = "text")]
    pub format: Format,
}

fn parse_method(s: &str) -> Result<HttpMethod, String> {
    HttpMethod::from_key(s).ok_or_else(|| format!("unknown HTTP method `{}`", s))
}

/// Executes the endpoints command.
pub fn execute(args: &EndpointsArgs, out: &mut impl Write) -> CliResult<()> {
    let model = args.input.load_model()?;
    let query = EndpointQuery {
        text: args.query.clone(),
        method: args.method,
        tag: args.tag.clone(),
    };
    let found = model.search(&query);

    if args.format != Format::Text {
        return write_structured(out, &found, args.format);
    }
    if found.is_empty() {
        return Err(CliError::General("no endpoint matches the filters".to_string()));
    }
    for endpoint in found {
        let auth = if endpoint.requires_auth() { " [auth]" } else { "" };
        let deprecated = if endpoint.deprecated { " (deprecated)" } else { "" };
        match &endpoint.summary {
            Some(summary) => writeln!(out, "{}{}{} - {}", endpoint.id, auth, deprecated, summary)?,
            None => writeln!(out, "{}{}{}", endpoint.id, auth, deprecated)?,
        }
    }
    Ok(())
}
