//! Shared parser setup for CLI commands.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use rw_blocks::directive::{Admonition, Directive, DirectivePlugin, FencedDirective, RstDirective};
use rw_blocks::{Markdown, TablePlugin, Token};
use rw_config::{CliSettings, Config, DirectiveSyntaxKind};

use crate::error::CliError;

/// Input and parser options shared by all commands.
#[derive(Args)]
pub(crate) struct ParserArgs {
    /// Markdown file to read (`-` for stdin).
    pub file: PathBuf,

    /// Path to configuration file (default: auto-discover rw.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum directive nesting level (overrides config).
    #[arg(long)]
    pub max_nested_level: Option<usize>,

    /// Disable the table plugin.
    #[arg(long)]
    pub no_tables: bool,

    /// Enable verbose output (debug logs for parsing decisions).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ParserArgs {
    /// Load config with CLI overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            max_nested_level: self.max_nested_level,
            tables: self.no_tables.then_some(false),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Read the input document.
    pub(crate) fn read_source(&self) -> Result<String, CliError> {
        read_source(&self.file)
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Build a parser with the plugins selected by `config`.
///
/// With `html` the HTML renderer is attached, otherwise the parser has no
/// renderer.
pub(crate) fn build_markdown(config: &Config, html: bool) -> Result<Markdown, CliError> {
    let md = if html { Markdown::html() } else { Markdown::new() };
    let mut md = md.with_max_nested_level(config.parser.max_nested_level);

    if config.plugins.tables {
        md.use_plugin(&TablePlugin)?;
    }

    for kind in &config.plugins.directives {
        let mut plugins: Vec<Box<dyn DirectivePlugin>> = Vec::new();
        if config.plugins.admonitions {
            plugins.push(Box::new(Admonition));
        }
        let directive = match kind {
            DirectiveSyntaxKind::Fenced => Directive::new(FencedDirective, plugins),
            DirectiveSyntaxKind::Rst => Directive::new(RstDirective, plugins),
        };
        md.use_plugin(&directive)?;
    }

    tracing::debug!(
        rules = ?md.block.rule_names().collect::<Vec<_>>(),
        max_nested_level = md.block.max_nested_level(),
        "Parser configured"
    );
    Ok(md)
}

/// Count `block_error` tokens anywhere in the tree.
pub(crate) fn count_block_errors(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .map(|token| {
            usize::from(token.kind == "block_error") + count_block_errors(token.children())
        })
        .sum()
}
