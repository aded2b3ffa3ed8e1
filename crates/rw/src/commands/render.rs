//! `rw render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::output::Output;
use crate::pipeline::{ParserArgs, build_markdown, count_block_errors};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    pub parser: ParserArgs,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input, rendering or output fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.parser.load_config()?;
        let md = build_markdown(&config, true)?;

        let source = self.parser.read_source()?;
        let tokens = md.parse(&source);
        let html = md.render_tokens(&tokens)?;

        let errors = count_block_errors(&tokens);
        if errors > 0 {
            output.warning(&format!("{errors} unsupported directive(s) rendered as errors"));
        }

        if let Some(path) = &self.output {
            std::fs::write(path, &html)?;
            output.success(&format!("Wrote {} bytes to {}", html.len(), path.display()));
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.md");
        let out = dir.path().join("doc.html");
        let config = dir.path().join("rw.toml");
        std::fs::write(&input, "| a |\n|--:|\n| 1 |\n").unwrap();
        std::fs::write(&config, "[plugins]\ndirectives = []\n").unwrap();

        let args = RenderArgs {
            parser: ParserArgs {
                file: input,
                config: Some(config),
                max_nested_level: None,
                no_tables: false,
                verbose: false,
            },
            output: Some(out.clone()),
        };
        args.execute().unwrap();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "<table>\n<thead>\n<tr>\n  <th style=\"text-align:right\">a</th>\n</tr>\n</thead>\n\
             <tbody>\n<tr>\n  <td style=\"text-align:right\">1</td>\n</tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn test_render_without_tables() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.md");
        let out = dir.path().join("doc.html");
        let config = dir.path().join("rw.toml");
        std::fs::write(&input, "| a |\n|---|\n").unwrap();
        std::fs::write(&config, "").unwrap();

        let args = RenderArgs {
            parser: ParserArgs {
                file: input,
                config: Some(config),
                max_nested_level: None,
                no_tables: true,
                verbose: false,
            },
            output: Some(out.clone()),
        };
        args.execute().unwrap();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "<p>| a |\n|---|</p>\n"
        );
    }
}
