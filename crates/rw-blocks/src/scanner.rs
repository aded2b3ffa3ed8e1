//! Ordered block rule registry and the scan loop that drives it.
//!
//! A [`BlockParser`] holds named rules, each a compiled pattern plus a
//! handler. Parsing tries the active rules in registry order at the current
//! position; the first handler that accepts its match appends tokens to the
//! [`BlockState`] and reports where scanning resumes.

use regex::{Captures, Regex};

use crate::error::RegistryError;
use crate::rules;
use crate::state::BlockState;
use crate::token::Token;

/// Default bound on recursive directive nesting.
pub const DEFAULT_MAX_NESTED_LEVEL: usize = 6;

/// Handler invoked when a rule's pattern matches.
///
/// Returns the absolute offset (in [`BlockState::src`]) immediately after the
/// consumed text, or `None` to reject the match and let later rules try.
/// A rejecting handler must not append tokens.
pub type RuleHandler =
    Box<dyn Fn(&BlockParser, &RuleMatch<'_>, &mut BlockState<'_>) -> Option<usize> + Send + Sync>;

/// Where to insert a newly registered rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position<'a> {
    /// Append after every existing rule.
    Last,
    /// Insert immediately before the named rule.
    Before(&'a str),
    /// Insert immediately after the named rule.
    After(&'a str),
}

/// A successful pattern match at the current scan position.
///
/// Offsets are absolute within the scanned state's source text.
#[derive(Debug)]
pub struct RuleMatch<'s> {
    captures: Captures<'s>,
    start: usize,
    len: usize,
}

impl<'s> RuleMatch<'s> {
    fn new(captures: Captures<'s>, start: usize) -> Self {
        let len = captures.get(0).map_or(0, |m| m.len());
        Self {
            captures,
            start,
            len,
        }
    }

    /// Text of a named capture group, if it participated in the match.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&'s str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    /// Absolute end offset of a named capture group.
    #[must_use]
    pub fn group_end(&self, name: &str) -> Option<usize> {
        self.captures.name(name).map(|m| self.start + m.end())
    }

    /// Entire matched text.
    #[must_use]
    pub fn as_str(&self) -> &'s str {
        self.captures.get(0).map_or("", |m| m.as_str())
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

struct BlockRule {
    name: String,
    pattern: Regex,
    handler: RuleHandler,
}

/// Ordered set of named block rules.
///
/// Rules are registered once at construction and the parser is then shared
/// immutably; all parse entry points take `&self`.
///
/// # Example
///
/// ```
/// use rw_blocks::{BlockParser, BlockState, Position, Token};
///
/// let mut parser = BlockParser::new();
/// parser
///     .register(
///         "hr",
///         r"^ {0,3}-{3,}[ \t]*(?:\n|$)",
///         |_, m, state| {
///             state.append_token(Token::new("thematic_break"));
///             Some(m.end())
///         },
///         Position::Before("paragraph"),
///     )
///     .unwrap();
///
/// let tokens = parser.parse_document("---\n");
/// assert_eq!(tokens[0].kind, "thematic_break");
/// ```
pub struct BlockParser {
    rules: Vec<BlockRule>,
    nesting_rules: Vec<String>,
    max_nested_level: usize,
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser {
    /// Create a parser with the baseline rules: `blank_line`, `fenced_code`,
    /// `heading` and `paragraph`.
    #[must_use]
    pub fn new() -> Self {
        let mut parser = Self::empty();
        rules::install(&mut parser);
        parser
    }

    /// Create a parser without any rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            nesting_rules: Vec::new(),
            max_nested_level: DEFAULT_MAX_NESTED_LEVEL,
        }
    }

    /// Set the maximum directive nesting level.
    #[must_use]
    pub fn with_max_nested_level(mut self, level: usize) -> Self {
        self.max_nested_level = level;
        self
    }

    pub fn set_max_nested_level(&mut self, level: usize) {
        self.max_nested_level = level;
    }

    #[must_use]
    pub fn max_nested_level(&self) -> usize {
        self.max_nested_level
    }

    /// Register a named rule.
    ///
    /// `pattern` is matched against the text remaining at the scan position,
    /// so it should be anchored with `^`.
    ///
    /// # Errors
    ///
    /// Fails if `name` is taken, if `position` names an unknown rule, or if
    /// `pattern` does not compile.
    pub fn register<F>(
        &mut self,
        name: &str,
        pattern: &str,
        handler: F,
        position: Position<'_>,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&BlockParser, &RuleMatch<'_>, &mut BlockState<'_>) -> Option<usize>
            + Send
            + Sync
            + 'static,
    {
        self.register_regex(name, Regex::new(pattern)?, Box::new(handler), position)
    }

    /// Register a rule with an already compiled pattern.
    ///
    /// # Errors
    ///
    /// Fails if `name` is taken or if `position` names an unknown rule.
    pub fn register_regex(
        &mut self,
        name: &str,
        pattern: Regex,
        handler: RuleHandler,
        position: Position<'_>,
    ) -> Result<(), RegistryError> {
        if self.contains(name) {
            return Err(RegistryError::DuplicateRule(name.to_owned()));
        }

        let index = match position {
            Position::Last => self.rules.len(),
            Position::Before(anchor) => self.index_of(anchor)?,
            Position::After(anchor) => self.index_of(anchor)? + 1,
        };

        self.rules.insert(
            index,
            BlockRule {
                name: name.to_owned(),
                pattern,
                handler,
            },
        );
        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<usize, RegistryError> {
        self.rules
            .iter()
            .position(|rule| rule.name == name)
            .ok_or_else(|| RegistryError::UnknownRule(name.to_owned()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.name == name)
    }

    /// Mark a registered rule as one that parses nested block content.
    ///
    /// Every marked rule is switched off together once nested parsing reaches
    /// `max_nested_level`.
    ///
    /// # Errors
    ///
    /// Fails if no rule is registered under `name`.
    pub fn mark_nesting_rule(&mut self, name: &str) -> Result<(), RegistryError> {
        self.index_of(name)?;
        if !self.is_nesting_rule(name) {
            self.nesting_rules.push(name.to_owned());
        }
        Ok(())
    }

    #[must_use]
    pub fn is_nesting_rule(&self, name: &str) -> bool {
        self.nesting_rules.iter().any(|rule| rule == name)
    }

    /// Rule names in matching order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    /// Parse a whole document with every rule active.
    #[must_use]
    pub fn parse_document(&self, src: &str) -> Vec<Token> {
        let mut state = BlockState::new(src);
        self.parse_all(&mut state);
        state.into_tokens()
    }

    /// Parse the rest of `state` with every rule active.
    pub fn parse_all(&self, state: &mut BlockState<'_>) {
        let names: Vec<&str> = self.rule_names().collect();
        self.parse(state, &names);
    }

    /// Parse the rest of `state` using only the rules named in `active`.
    ///
    /// Active rules are tried in registry order. When none claims the current
    /// position, the current line is emitted as a paragraph so scanning always
    /// makes progress.
    pub fn parse(&self, state: &mut BlockState<'_>, active: &[&str]) {
        let src = state.src();

        while state.cursor() < src.len() {
            let cursor = state.cursor();
            let rest = &src[cursor..];

            let next = self
                .rules
                .iter()
                .filter(|rule| active.iter().any(|name| *name == rule.name))
                .find_map(|rule| {
                    let captures = rule.pattern.captures(rest)?;
                    let m = RuleMatch::new(captures, cursor);
                    let end = (rule.handler)(self, &m, state)?;
                    if end <= cursor {
                        tracing::debug!(
                            rule = %rule.name,
                            cursor,
                            "Rule consumed no input, ignoring"
                        );
                        return None;
                    }
                    tracing::trace!(rule = %rule.name, start = cursor, end, "Block rule matched");
                    Some(end)
                });

            let end = next.unwrap_or_else(|| fallback_line(state, rest, cursor));
            state.set_cursor(end.min(src.len()));
        }
    }
}

/// Consume one line nobody claimed, keeping its text as a paragraph.
fn fallback_line(state: &mut BlockState<'_>, rest: &str, cursor: usize) -> usize {
    let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
    let line = rest[..line_len].trim();
    if !line.is_empty() {
        tracing::debug!(cursor, "No block rule matched, treating line as paragraph");
        state.append_token(Token::text(rules::PARAGRAPH, line));
    }
    cursor + line_len
}
