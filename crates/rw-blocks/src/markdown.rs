//! Parser and renderer facade.

use std::borrow::Cow;

use crate::error::{RegistryError, RenderError};
use crate::render::{HtmlBackend, Renderer};
use crate::scanner::BlockParser;
use crate::token::Token;

/// Extension applied to a [`Markdown`] instance at construction time.
///
/// Plugins register block rules on [`Markdown::block`] and, when the
/// renderer is a backend they support, render functions on
/// [`Markdown::renderer`].
pub trait Plugin {
    /// # Errors
    ///
    /// Returns an error if a block rule cannot be registered.
    fn apply(&self, md: &mut Markdown) -> Result<(), RegistryError>;
}

/// A block parser paired with an optional renderer.
///
/// Configure with plugins once, then share for any number of parses.
///
/// # Example
///
/// ```
/// use rw_blocks::{Markdown, TablePlugin};
///
/// let md = Markdown::html().with_plugin(&TablePlugin).unwrap();
/// let html = md.render("# Title\n\nText.\n").unwrap();
/// assert_eq!(html, "<h1>Title</h1>\n<p>Text.</p>\n");
/// ```
pub struct Markdown {
    pub block: BlockParser,
    pub renderer: Option<Renderer>,
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Markdown {
    /// Parser with the baseline rules and no renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            block: BlockParser::new(),
            renderer: None,
        }
    }

    /// Parser with the baseline rules and the HTML renderer.
    #[must_use]
    pub fn html() -> Self {
        Self {
            block: BlockParser::new(),
            renderer: Some(Renderer::new::<HtmlBackend>()),
        }
    }

    /// Set the directive nesting limit.
    #[must_use]
    pub fn with_max_nested_level(mut self, level: usize) -> Self {
        self.block.set_max_nested_level(level);
        self
    }

    /// Apply a plugin, consuming and returning `self`.
    ///
    /// # Errors
    ///
    /// Returns the plugin's registration error.
    pub fn with_plugin<P: Plugin + ?Sized>(mut self, plugin: &P) -> Result<Self, RegistryError> {
        self.use_plugin(plugin)?;
        Ok(self)
    }

    /// Apply a plugin in place.
    ///
    /// # Errors
    ///
    /// Returns the plugin's registration error.
    pub fn use_plugin<P: Plugin + ?Sized>(&mut self, plugin: &P) -> Result<(), RegistryError> {
        plugin.apply(self)
    }

    /// Parse `src` into a token tree.
    ///
    /// `\r\n` and lone `\r` line endings are normalized to `\n` first.
    #[must_use]
    pub fn parse(&self, src: &str) -> Vec<Token> {
        let src = normalize_newlines(src);
        tracing::debug!(len = src.len(), "Parsing document");
        self.block.parse_document(&src)
    }

    /// Render an already parsed token tree.
    ///
    /// # Errors
    ///
    /// Fails if there is no renderer or a token type has no render function.
    pub fn render_tokens(&self, tokens: &[Token]) -> Result<String, RenderError> {
        self.renderer
            .as_ref()
            .ok_or(RenderError::NoRenderer)?
            .render_tokens(tokens)
    }

    /// Parse and render `src`.
    ///
    /// # Errors
    ///
    /// Fails if there is no renderer or a token type has no render function.
    pub fn render(&self, src: &str) -> Result<String, RenderError> {
        self.render_tokens(&self.parse(src))
    }
}

fn normalize_newlines(src: &str) -> Cow<'_, str> {
    if src.contains('\r') {
        Cow::Owned(src.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(src)
    }
}
