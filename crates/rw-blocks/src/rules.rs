//! Baseline block rules.
//!
//! A deliberately small grammar (blank lines, fenced code, ATX headings and
//! paragraphs) that plugin rules are ordered against.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::close_code_fence;
use crate::scanner::{BlockParser, Position, RuleHandler, RuleMatch};
use crate::state::BlockState;
use crate::token::Token;

pub const BLANK_LINE: &str = "blank_line";
pub const FENCED_CODE: &str = "fenced_code";
pub const HEADING: &str = "heading";
pub const PARAGRAPH: &str = "paragraph";

static BLANK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[ \t]*\n)*[ \t]*(?:\n|$)").unwrap());

static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?P<fence>`{3,}|~{3,})[ \t]*(?P<info>[^\n]*)(?:\n|$)").unwrap()
});

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(?P<level>#{1,6})(?:[ \t]+(?P<text>[^\n]*))?(?:\n|$)").unwrap()
});

static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\n]*\S[^\n]*(?:\n|$)").unwrap());

pub(crate) fn install(parser: &mut BlockParser) {
    add(parser, BLANK_LINE, &BLANK_LINE_RE, Box::new(parse_blank_line));
    add(parser, FENCED_CODE, &FENCED_CODE_RE, Box::new(parse_fenced_code));
    add(parser, HEADING, &HEADING_RE, Box::new(parse_heading));
    add(parser, PARAGRAPH, &PARAGRAPH_RE, Box::new(parse_paragraph));
}

fn add(parser: &mut BlockParser, name: &str, pattern: &Regex, handler: RuleHandler) {
    let registered = parser.register_regex(name, pattern.clone(), handler, Position::Last);
    debug_assert!(registered.is_ok(), "baseline rule {name} registered twice");
}

fn parse_blank_line(
    _: &BlockParser,
    m: &RuleMatch<'_>,
    state: &mut BlockState<'_>,
) -> Option<usize> {
    state.append_token(Token::new(BLANK_LINE));
    Some(m.end())
}

fn parse_fenced_code(
    _: &BlockParser,
    m: &RuleMatch<'_>,
    state: &mut BlockState<'_>,
) -> Option<usize> {
    let fence = m.group("fence")?;
    let info = m.group("info").unwrap_or_default().trim();
    let src = state.src();
    let region = close_code_fence(src, fence, m.end());

    let mut token = Token::raw("block_code", &src[m.end()..region.body_end]);
    if !info.is_empty() {
        token = token.with_attr("info", info);
    }
    state.append_token(token);
    Some(region.end)
}

fn parse_heading(_: &BlockParser, m: &RuleMatch<'_>, state: &mut BlockState<'_>) -> Option<usize> {
    let level = m.group("level")?.len();
    let text = strip_closing_hashes(m.group("text").unwrap_or_default());
    state.append_token(Token::text(HEADING, text).with_attr("level", i64::try_from(level).ok()));
    Some(m.end())
}

/// Strip an optional closing `#` sequence, which must be preceded by a space.
fn strip_closing_hashes(text: &str) -> &str {
    let text = text.trim();
    let without = text.trim_end_matches('#');
    if without.is_empty() {
        ""
    } else if without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        text
    }
}

fn parse_paragraph(
    _: &BlockParser,
    m: &RuleMatch<'_>,
    state: &mut BlockState<'_>,
) -> Option<usize> {
    // One line at a time, so any rule ahead of `paragraph` can interrupt it.
    state.add_paragraph(m.as_str().trim());
    Some(m.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Vec<Token> {
        BlockParser::new().parse_document(src)
    }

    fn kinds(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.kind.as_str()).collect()
    }

    #[test]
    fn test_paragraphs_split_by_blank_lines() {
        let tokens = parse("one\n  two\n\n\nthree");
        assert_eq!(kinds(&tokens), vec!["paragraph", "blank_line", "paragraph"]);
        assert_eq!(tokens[0].text.as_deref(), Some("one\ntwo"));
        assert_eq!(tokens[2].text.as_deref(), Some("three"));
    }

    #[test]
    fn test_whitespace_only_document() {
        let tokens = parse("  \n\t\n  ");
        assert_eq!(kinds(&tokens), vec!["blank_line"]);
    }

    #[test]
    fn test_heading_levels() {
        let tokens = parse("# One\n### Three ###\n####### seven\n");
        assert_eq!(tokens[0].text.as_deref(), Some("One"));
        assert_eq!(tokens[0].attr("level").and_then(|v| v.as_int()), Some(1));
        assert_eq!(tokens[1].text.as_deref(), Some("Three"));
        assert_eq!(tokens[1].attr("level").and_then(|v| v.as_int()), Some(3));
        assert_eq!(tokens[2].kind, "paragraph");
    }

    #[test]
    fn test_heading_requires_space() {
        let tokens = parse("#hashtag\n");
        assert_eq!(kinds(&tokens), vec!["paragraph"]);
    }

    #[test]
    fn test_strip_closing_hashes() {
        assert_eq!(strip_closing_hashes("Title ##"), "Title");
        assert_eq!(strip_closing_hashes("C#"), "C#");
        assert_eq!(strip_closing_hashes("###"), "");
    }

    #[test]
    fn test_fenced_code() {
        let tokens = parse("```rust\nfn main() {}\n```\nafter\n");
        assert_eq!(kinds(&tokens), vec!["block_code", "paragraph"]);
        assert_eq!(tokens[0].raw.as_deref(), Some("fn main() {}\n"));
        assert_eq!(tokens[0].attr_str("info"), Some("rust"));
    }

    #[test]
    fn test_fenced_code_keeps_blank_lines_and_markup() {
        let tokens = parse("~~~\n| a |\n\n# not a heading\n~~~\n");
        assert_eq!(kinds(&tokens), vec!["block_code"]);
        assert_eq!(tokens[0].raw.as_deref(), Some("| a |\n\n# not a heading\n"));
        assert_eq!(tokens[0].attr("info"), None);
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let tokens = parse("```\ncode\nmore");
        assert_eq!(kinds(&tokens), vec!["block_code"]);
        assert_eq!(tokens[0].raw.as_deref(), Some("code\nmore"));
    }
}
