//! Directive handler output.

use crate::token::Token;

/// Tokens produced by a directive handler.
///
/// Handlers return either a single token or an ordered list; the engine
/// appends them to the enclosing state in order.
///
/// # Example
///
/// ```
/// use rw_blocks::Token;
/// use rw_blocks::directive::DirectiveOutput;
///
/// let output = DirectiveOutput::from(vec![Token::new("a"), Token::new("b")]);
/// let kinds: Vec<_> = output.into_tokens().into_iter().map(|t| t.kind).collect();
/// assert_eq!(kinds, ["a", "b"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveOutput {
    Token(Token),
    Tokens(Vec<Token>),
}

impl DirectiveOutput {
    /// Flatten into tokens in append order.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        match self {
            Self::Token(token) => vec![token],
            Self::Tokens(tokens) => tokens,
        }
    }
}

impl From<Token> for DirectiveOutput {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

impl From<Vec<Token>> for DirectiveOutput {
    fn from(tokens: Vec<Token>) -> Self {
        Self::Tokens(tokens)
    }
}
