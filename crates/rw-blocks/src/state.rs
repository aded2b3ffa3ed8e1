//! Per-scope parse state.

use crate::rules::PARAGRAPH;
use crate::token::Token;

/// Token accumulator for one parsing pass over a document or nested fragment.
///
/// A state owns the text of its scope, the scan cursor into that text, the
/// tokens produced so far and its nesting depth. Nested content is parsed in a
/// fresh [`child_state`](Self::child_state) whose tokens are returned by value,
/// so a child can never touch tokens its parent has already appended.
#[derive(Debug)]
pub struct BlockState<'src> {
    src: &'src str,
    cursor: usize,
    tokens: Vec<Token>,
    depth: usize,
}

impl<'src> BlockState<'src> {
    /// Create a top-level state (depth 0) over `src`.
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            cursor: 0,
            tokens: Vec::new(),
            depth: 0,
        }
    }

    /// Create a state for nested content one level deeper than `self`.
    #[must_use]
    pub fn child_state<'t>(&self, text: &'t str) -> BlockState<'t> {
        BlockState {
            src: text,
            cursor: 0,
            tokens: Vec::new(),
            depth: self.depth + 1,
        }
    }

    /// Full text of this scope.
    #[must_use]
    pub fn src(&self) -> &'src str {
        self.src
    }

    /// Byte offset where scanning resumes.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        debug_assert!(cursor <= self.src.len());
        self.cursor = cursor;
    }

    /// Text not yet consumed by any rule.
    #[must_use]
    pub fn remaining(&self) -> &'src str {
        &self.src[self.cursor..]
    }

    /// Nesting depth: 0 for a document, parent depth + 1 for nested content.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn append_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Append a line of paragraph text, extending the last token when it is
    /// already a paragraph.
    pub fn add_paragraph(&mut self, line: &str) {
        if let Some(last) = self.tokens.last_mut()
            && last.kind == PARAGRAPH
            && let Some(text) = last.text.as_mut()
        {
            text.push('\n');
            text.push_str(line);
        } else {
            self.tokens.push(Token::text(PARAGRAPH, line));
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Consume the state, yielding its tokens in append order.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}
