//! Directive outer syntaxes.
//!
//! A syntax owns the block rule pattern that recognizes a directive and turns
//! each match into a [`DirectiveRecord`]. The engine that dispatches records
//! is syntax-agnostic.

use std::sync::LazyLock;

use regex::Regex;

use super::options::parse_options;
use crate::fence::close_exact_fence;
use crate::scanner::RuleMatch;
use crate::util::{dedent, is_blank, lines};

static OPTION_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}:[a-zA-Z0-9_-]+:").unwrap());

/// Name, title, options and content of one matched directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveRecord<'s> {
    pub name: &'s str,
    /// Trimmed title text (may be empty).
    pub title: &'s str,
    /// Option pairs in source order; keys may repeat.
    pub options: Vec<(String, String)>,
    /// Body content, ready for recursive parsing.
    pub content: String,
    /// Absolute offset just past the directive.
    pub end: usize,
}

impl DirectiveRecord<'_> {
    /// Value of the last option named `key`.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Outer grammar of a directive kind.
///
/// Implementations are stateless and shared between parser threads.
pub trait DirectiveSyntax: Send + Sync {
    /// Block rule name the directive is registered under.
    fn rule_name(&self) -> &'static str;

    /// Anchored pattern recognizing the start of a directive.
    fn pattern(&self) -> &'static str;

    /// Extract the directive from a pattern match over `src`.
    ///
    /// Returns `None` to reject the match.
    fn extract<'s>(&self, m: &RuleMatch<'s>, src: &'s str) -> Option<DirectiveRecord<'s>>;
}

/// Fenced directives:
///
/// ```text
/// :::{note} Optional title
/// :class: wide
///
/// Body content.
/// :::
/// ```
///
/// Backtick fences (```` ```{note} ````) are accepted too. The block closes at
/// the first line repeating the opening fence exactly, so a longer outer
/// fence can wrap shorter inner ones.
#[derive(Clone, Copy, Debug, Default)]
pub struct FencedDirective;

impl FencedDirective {
    pub const RULE: &'static str = "fenced_directive";
}

impl DirectiveSyntax for FencedDirective {
    fn rule_name(&self) -> &'static str {
        Self::RULE
    }

    fn pattern(&self) -> &'static str {
        r"^ {0,3}(?P<fence>:{3,}|`{3,})[ \t]*\{(?P<name>[a-zA-Z0-9_-]+)\}[ \t]*(?P<title>[^\n]*)(?:\n|$)"
    }

    fn extract<'s>(&self, m: &RuleMatch<'s>, src: &'s str) -> Option<DirectiveRecord<'s>> {
        let fence = m.group("fence")?;
        let body_start = m.end();
        let region = close_exact_fence(src, fence, body_start);
        let body = &src[body_start..region.body_end];

        let mut options_end = 0;
        let mut content_start = body.len();
        for (offset, line) in lines(body) {
            if OPTION_LINE_RE.is_match(line) {
                options_end = offset + line.len();
            } else if !is_blank(line) {
                content_start = offset;
                break;
            }
        }

        Some(DirectiveRecord {
            name: m.group("name")?,
            title: m.group("title").unwrap_or_default().trim(),
            options: parse_options(&body[..options_end]),
            content: body[content_start..].to_owned(),
            end: region.end,
        })
    }
}

/// reStructuredText-style directives:
///
/// ```text
/// .. note:: Optional title
///    :class: wide
///
///    Body content, indented.
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RstDirective;

impl RstDirective {
    pub const RULE: &'static str = "rst_directive";
}

impl DirectiveSyntax for RstDirective {
    fn rule_name(&self) -> &'static str {
        Self::RULE
    }

    fn pattern(&self) -> &'static str {
        concat!(
            r"^\.\. +(?P<name>[a-zA-Z0-9_-]+)::[ \t]*(?P<title>[^\n]*)(?:\n|$)",
            r"(?P<options>(?: {2,}:[a-zA-Z0-9_-]+:[^\n]*\n+)*)",
            r"\n*(?P<content>(?: {2,}[^\n]*(?:\n+|$))*)",
        )
    }

    fn extract<'s>(&self, m: &RuleMatch<'s>, _src: &'s str) -> Option<DirectiveRecord<'s>> {
        Some(DirectiveRecord {
            name: m.group("name")?,
            title: m.group("title").unwrap_or_default().trim(),
            options: parse_options(m.group("options").unwrap_or_default()),
            content: dedent(m.group("content").unwrap_or_default()),
            end: m.end(),
        })
    }
}
