//! Pipe tables.
//!
//! Two grammars share one pipeline: strict tables, where every row is
//! wrapped in `|`, and no-pipe tables, where rows only need interior
//! separators:
//!
//! ```text
//! | a | b |        a | b
//! |:--|--:|        --|:-:
//! | 1 | 2 |        1 | 2
//! ```
//!
//! Header, alignment row and every body row must have the same number of
//! cells; otherwise the match is rejected and the text falls through to
//! later rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RegistryError;
use crate::markdown::{Markdown, Plugin};
use crate::render::{HtmlBackend, RenderBackend, Renderer, escape_html};
use crate::rules;
use crate::scanner::{BlockParser, Position, RuleMatch};
use crate::state::BlockState;
use crate::token::{Attrs, Token};

pub const TABLE: &str = "table";
pub const NPTABLE: &str = "nptable";

static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^ {0,3}\|(?P<head>.+)\|[ \t]*\n",
        r" {0,3}\|(?P<align> *[-:]+[-| :]*)\|[ \t]*\n",
        r"(?P<body>(?: {0,3}\|.*\|[ \t]*(?:\n|$))*)\n*",
    ))
    .unwrap()
});

static NPTABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^ {0,3}(?P<head>\S.*\|.*)\n",
        r" {0,3}(?P<align>[-:]+ *\|[-| :]*)\n",
        r"(?P<body>(?:.*\|.*(?:\n|$))*)\n*",
    ))
    .unwrap()
});

static TABLE_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}\|(.+)\|[ \t]*$").unwrap());

/// Column alignment from the delimiter row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
    None,
}

impl Align {
    /// Classify a delimiter cell: `:-:` center, `:-` left, `-:` right,
    /// anything else none.
    #[must_use]
    pub fn classify(cell: &str) -> Self {
        let cell = cell.trim_matches(' ');
        let (left, rest) = match cell.strip_prefix(':') {
            Some(rest) => (true, rest),
            None => (false, cell),
        };
        let (right, dashes) = match rest.strip_suffix(':') {
            Some(dashes) => (true, dashes),
            None => (false, rest),
        };
        if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
            return Self::None;
        }
        match (left, right) {
            (true, true) => Self::Center,
            (true, false) => Self::Left,
            (false, true) => Self::Right,
            (false, false) => Self::None,
        }
    }

    /// CSS `text-align` value, or `None` for unaligned columns.
    #[must_use]
    pub fn as_css(self) -> Option<&'static str> {
        match self {
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
            Self::None => None,
        }
    }
}

/// Split a row on unescaped `|`.
///
/// A pipe preceded by an odd number of backslashes is cell content; its
/// escaping backslash is dropped.
fn split_cells(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut backslashes = 0;

    for c in row.chars() {
        match c {
            '|' if backslashes % 2 == 1 => {
                cell.pop();
                cell.push('|');
            }
            '|' => cells.push(std::mem::take(&mut cell)),
            _ => cell.push(c),
        }
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
    }
    cells.push(cell);
    cells
}

fn cell_tokens(cells: &[String], aligns: &[Align], head: bool) -> Vec<Token> {
    cells
        .iter()
        .zip(aligns)
        .map(|(text, align)| {
            Token::text("table_cell", text.trim())
                .with_attr("align", align.as_css())
                .with_attr("head", head)
        })
        .collect()
}

/// Build the `table` token, or `None` if the column counts disagree.
fn build_table<'a>(
    head: &str,
    align: &str,
    rows: impl Iterator<Item = &'a str>,
) -> Option<Token> {
    let headers = split_cells(head);
    let aligns: Vec<Align> = split_cells(align)
        .iter()
        .map(|cell| Align::classify(cell))
        .collect();
    if headers.len() != aligns.len() {
        tracing::debug!(
            header = headers.len(),
            align = aligns.len(),
            "Rejecting table: header and delimiter row differ in column count"
        );
        return None;
    }

    let mut body = Vec::new();
    for (index, row) in rows.enumerate() {
        let cells = split_cells(row);
        if cells.len() != aligns.len() {
            tracing::debug!(
                row = index,
                cells = cells.len(),
                columns = aligns.len(),
                "Rejecting table: body row differs in column count"
            );
            return None;
        }
        body.push(Token::container("table_row", cell_tokens(&cells, &aligns, false)));
    }

    Some(Token::container(
        TABLE,
        vec![
            Token::container("table_head", cell_tokens(&headers, &aligns, true)),
            Token::container("table_body", body),
        ],
    ))
}

fn parse_table(_: &BlockParser, m: &RuleMatch<'_>, state: &mut BlockState<'_>) -> Option<usize> {
    let body = m.group("body").unwrap_or_default();
    let mut rows = Vec::new();
    for line in body.lines() {
        let Some(captures) = TABLE_ROW_RE.captures(line) else {
            tracing::debug!(line, "Rejecting table: malformed body row");
            return None;
        };
        rows.push(captures.get(1)?.as_str());
    }

    let table = build_table(m.group("head")?, m.group("align")?, rows.into_iter())?;
    state.append_token(table);
    Some(m.end())
}

fn parse_nptable(
    _: &BlockParser,
    m: &RuleMatch<'_>,
    state: &mut BlockState<'_>,
) -> Option<usize> {
    let head = m.group("head")?;
    if head.starts_with('|') {
        tracing::debug!("Rejecting no-pipe table: header row starts with a pipe");
        return None;
    }

    let body = m.group("body").unwrap_or_default();
    let table = build_table(head, m.group("align")?, body.lines())?;
    state.append_token(table);
    Some(m.end())
}

fn render_table(_: &Renderer, text: &str, _: &Attrs) -> String {
    format!("<table>\n{text}</table>\n")
}

fn render_table_head(_: &Renderer, text: &str, _: &Attrs) -> String {
    format!("<thead>\n<tr>\n{text}</tr>\n</thead>\n")
}

fn render_table_body(_: &Renderer, text: &str, _: &Attrs) -> String {
    format!("<tbody>\n{text}</tbody>\n")
}

fn render_table_row(_: &Renderer, text: &str, _: &Attrs) -> String {
    format!("<tr>\n{text}</tr>\n")
}

fn render_table_cell(_: &Renderer, text: &str, attrs: &Attrs) -> String {
    let head = attrs.get("head").and_then(|v| v.as_bool()).unwrap_or(false);
    let tag = if head { "th" } else { "td" };
    let style = attrs
        .get("align")
        .and_then(|v| v.as_str())
        .map(|align| format!(" style=\"text-align:{align}\""))
        .unwrap_or_default();
    format!("  <{tag}{style}>{}</{tag}>\n", escape_html(text))
}

/// Registers the `table` and `nptable` rules before `paragraph`, plus HTML
/// output when the renderer is the HTML backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct TablePlugin;

impl Plugin for TablePlugin {
    fn apply(&self, md: &mut Markdown) -> Result<(), RegistryError> {
        md.block.register_regex(
            TABLE,
            TABLE_RE.clone(),
            Box::new(parse_table),
            Position::Before(rules::PARAGRAPH),
        )?;
        md.block.register_regex(
            NPTABLE,
            NPTABLE_RE.clone(),
            Box::new(parse_nptable),
            Position::Before(rules::PARAGRAPH),
        )?;

        if let Some(renderer) = md.renderer.as_mut()
            && renderer.name() == HtmlBackend::NAME
        {
            renderer.register("table", render_table);
            renderer.register("table_head", render_table_head);
            renderer.register("table_body", render_table_body);
            renderer.register("table_row", render_table_row);
            renderer.register("table_cell", render_table_cell);
        }
        Ok(())
    }
}
