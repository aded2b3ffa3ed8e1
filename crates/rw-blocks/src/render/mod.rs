//! Token-type to output-function dispatch.
//!
//! A [`Renderer`] maps token type names to render functions for one output
//! backend. Rendering walks the token tree bottom-up: a container's function
//! receives the concatenated output of its children, a leaf's function
//! receives the leaf's own text.

mod html;

use std::collections::HashMap;

pub use html::{HtmlBackend, escape_html};

use crate::error::RenderError;
use crate::token::{Attrs, Token};

/// Output function for one token type.
///
/// Called with the renderer (for nested dispatch), the token's rendered
/// children or leaf text, and the token's attributes.
pub type RenderFn = Box<dyn Fn(&Renderer, &str, &Attrs) -> String + Send + Sync>;

/// An output format.
///
/// Plugins compare [`Renderer::name`] against a backend's `NAME` to decide
/// whether their render functions apply.
pub trait RenderBackend {
    /// Backend identifier (e.g. `"html"`).
    const NAME: &'static str;

    /// Register the backend's default render functions.
    fn install(renderer: &mut Renderer);
}

/// Registry of render functions for a single backend.
pub struct Renderer {
    name: String,
    functions: HashMap<String, RenderFn>,
}

impl Renderer {
    /// Create a renderer with `B`'s default functions installed.
    #[must_use]
    pub fn new<B: RenderBackend>() -> Self {
        let mut renderer = Self::named(B::NAME);
        B::install(&mut renderer);
        renderer
    }

    /// Create an empty renderer identified by `name`.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register the function rendering `token_type`, replacing any previous one.
    pub fn register<F>(&mut self, token_type: &str, function: F)
    where
        F: Fn(&Renderer, &str, &Attrs) -> String + Send + Sync + 'static,
    {
        self.functions
            .insert(token_type.to_owned(), Box::new(function));
    }

    #[must_use]
    pub fn contains(&self, token_type: &str) -> bool {
        self.functions.contains_key(token_type)
    }

    /// Render tokens in order and concatenate the output.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingRenderFn`] if any token in the tree has
    /// no registered function.
    pub fn render_tokens(&self, tokens: &[Token]) -> Result<String, RenderError> {
        tokens.iter().try_fold(String::new(), |mut out, token| {
            out.push_str(&self.render_token(token)?);
            Ok(out)
        })
    }

    /// Render a single token and its children.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingRenderFn`] if the token or a descendant
    /// has no registered function.
    pub fn render_token(&self, token: &Token) -> Result<String, RenderError> {
        let function =
            self.functions
                .get(&token.kind)
                .ok_or_else(|| RenderError::MissingRenderFn {
                    backend: self.name.clone(),
                    token_type: token.kind.clone(),
                })?;

        if token.is_container() {
            let children = self.render_tokens(token.children())?;
            Ok(function(self, &children, &token.attrs))
        } else {
            Ok(function(self, token.content(), &token.attrs))
        }
    }
}
