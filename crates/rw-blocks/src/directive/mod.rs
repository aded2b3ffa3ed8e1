//! Named block directives with titles, options and nested content.
//!
//! A directive is recognized by a [`DirectiveSyntax`] (fenced `:::{name}` or
//! reStructuredText `.. name::`), turned into a [`DirectiveRecord`] and
//! dispatched by name to a handler registered on a [`DirectiveEngine`].
//! Handlers may parse their content recursively through
//! [`DirectiveScope::parse_tokens`], which enforces the parser's nesting
//! limit. Unknown names produce a `block_error` token instead of failing.
//!
//! # Example
//!
//! ```
//! use rw_blocks::{Markdown, Token};
//! use rw_blocks::directive::{
//!     Directive, DirectiveEngine, DirectivePlugin, RstDirective,
//! };
//! use rw_blocks::RegistryError;
//!
//! struct Figure;
//!
//! impl DirectivePlugin for Figure {
//!     fn apply(
//!         &self,
//!         engine: &mut DirectiveEngine,
//!         _md: &mut Markdown,
//!     ) -> Result<(), RegistryError> {
//!         engine.register("figure", |_, record, _| {
//!             Token::text("figure", record.title)
//!                 .with_attr("width", record.option("width"))
//!                 .into()
//!         });
//!         Ok(())
//!     }
//! }
//!
//! let md = Markdown::new()
//!     .with_plugin(&Directive::new(RstDirective, vec![Box::new(Figure)]))
//!     .unwrap();
//!
//! let tokens = md.parse(".. figure:: diagram.png\n   :width: 80%\n");
//! assert_eq!(tokens[0].kind, "figure");
//! assert_eq!(tokens[0].attr_str("width"), Some("80%"));
//! ```

mod admonition;
mod engine;
mod options;
mod output;
mod syntax;

pub use admonition::{ADMONITION_NAMES, Admonition};
pub use engine::{Directive, DirectiveEngine, DirectiveHandler, DirectivePlugin, DirectiveScope};
pub use options::parse_options;
pub use output::DirectiveOutput;
pub use syntax::{DirectiveRecord, DirectiveSyntax, FencedDirective, RstDirective};
