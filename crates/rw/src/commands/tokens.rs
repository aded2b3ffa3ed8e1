//! `rw tokens` command implementation.

use std::io::Write;

use clap::Args;
use rw_blocks::Token;

use crate::error::CliError;
use crate::pipeline::{ParserArgs, build_markdown};

/// Arguments for the tokens command.
#[derive(Args)]
pub(crate) struct TokensArgs {
    #[command(flatten)]
    pub parser: ParserArgs,

    /// Print compact single-line JSON.
    #[arg(long)]
    compact: bool,
}

impl TokensArgs {
    /// Execute the tokens command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input or serialization fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.parser.load_config()?;
        let md = build_markdown(&config, false)?;
        let tokens = md.parse(&self.parser.read_source()?);

        let json = to_json(&tokens, self.compact)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}")?;
        Ok(())
    }
}

fn to_json(tokens: &[Token], compact: bool) -> Result<String, CliError> {
    let json = if compact {
        serde_json::to_string(tokens)?
    } else {
        serde_json::to_string_pretty(tokens)?
    };
    Ok(json)
}
