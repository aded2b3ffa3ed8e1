//! Error types for rule registration and rendering.
//!
//! Parsing itself is infallible: malformed markup degrades to plain
//! paragraphs or `block_error` tokens.

/// Error registering a block rule.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A rule with this name is already registered.
    #[error("block rule `{0}` is already registered")]
    DuplicateRule(String),
    /// An ordering hint names a rule that does not exist.
    #[error("unknown block rule `{0}` in ordering hint")]
    UnknownRule(String),
    /// The rule pattern failed to compile.
    #[error("invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Error rendering a token tree.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The parser was built without a renderer.
    #[error("no renderer configured")]
    NoRenderer,
    /// No output function is registered for a token type.
    #[error("no render function registered for token type `{token_type}` in `{backend}` backend")]
    MissingRenderFn {
        /// Name of the active backend.
        backend: String,
        /// Token type that could not be rendered.
        token_type: String,
    },
}
