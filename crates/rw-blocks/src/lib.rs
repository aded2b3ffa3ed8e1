//! Extensible block-level grammar engine for markdown.
//!
//! Block rules are named `(pattern, handler)` pairs held in an ordered
//! [`BlockParser`]. Plugins insert their rules relative to existing ones,
//! produce [`Token`] trees, and may parse nested content recursively under a
//! bounded nesting depth. A [`Renderer`] then maps token types to output
//! functions registered per backend.
//!
//! Included plugins:
//! - [`TablePlugin`]: pipe tables and no-pipe tables with column alignment
//! - [`directive::Directive`]: fenced (`:::{name}`) and reStructuredText
//!   (`.. name::`) directives, with [`directive::Admonition`] handlers
//!
//! # Example
//!
//! ```
//! use rw_blocks::{Markdown, TablePlugin};
//! use rw_blocks::directive::{Admonition, Directive, FencedDirective};
//!
//! let md = Markdown::html()
//!     .with_plugin(&TablePlugin)
//!     .unwrap()
//!     .with_plugin(&Directive::new(FencedDirective, vec![Box::new(Admonition)]))
//!     .unwrap();
//!
//! let html = md.render("| a |\n|---|\n| 1 |\n").unwrap();
//! assert!(html.starts_with("<table>\n<thead>\n"));
//! ```

pub mod directive;
mod error;
mod fence;
mod markdown;
mod render;
mod rules;
mod scanner;
mod state;
mod table;
mod token;
mod util;

pub use error::{RegistryError, RenderError};
pub use markdown::{Markdown, Plugin};
pub use render::{HtmlBackend, RenderBackend, RenderFn, Renderer, escape_html};
pub use rules::{BLANK_LINE, FENCED_CODE, HEADING, PARAGRAPH};
pub use scanner::{BlockParser, DEFAULT_MAX_NESTED_LEVEL, Position, RuleHandler, RuleMatch};
pub use state::BlockState;
pub use table::{Align, NPTABLE, TABLE, TablePlugin};
pub use token::{AttrValue, Attrs, Token};
