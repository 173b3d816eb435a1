#![deny(missing_docs)]

//! # Model Command
//!
//! Dumps the complete normalized model.

use crate::error::{CliError, CliResult};
use crate::input::InputArgs;
use crate::output::{write_structured, Format};
use std::io::Write;

/// Arguments for the model command.
#[derive(clap::Args, Debug, Clone)]
pub struct ModelArgs {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Output format (`json` or `yaml`).
    #[clap(long, value_enum, default_value = "json")]
    pub format: Format,
}

/// Executes the model command.
pub fn execute(args: &ModelArgs, out: &mut impl Write) -> CliResult<()> {
    if args.format == Format::Text {
        return Err(CliError::General(
            "the model has no text rendering; use --format json or yaml".to_string(),
        ));
    }
    let model = args.input.load_model()?;
    write_structured(out, &model, args.format)
}
