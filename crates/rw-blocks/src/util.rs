//! Shared text helpers for block rules.

/// Iterate lines of `text` with their byte offsets.
///
/// Each yielded line keeps its trailing `\n` (the last line may lack one),
/// so `offset + line.len()` is the offset where the next line starts.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

/// Whether a line contains only whitespace.
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Remove the indentation common to all non-blank lines.
///
/// Blank lines are emitted empty. Indentation is counted in spaces and tabs.
pub(crate) fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !is_blank(line))
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let mut out = String::with_capacity(text.len());
    for (_, line) in lines(text) {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };
        if !is_blank(body) {
            out.push_str(&body[indent..]);
        }
        out.push_str(newline);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_offsets() {
        let collected: Vec<_> = lines("ab\ncd\n\nef").collect();
        assert_eq!(collected, vec![(0, "ab\n"), (3, "cd\n"), (6, "\n"), (7, "ef")]);
    }

    #[test]
    fn test_lines_empty() {
        assert_eq!(lines("").count(), 0);
    }

    #[test]
    fn test_dedent_common_indent() {
        assert_eq!(dedent("   a\n     b\n\n   c\n"), "a\n  b\n\nc\n");
    }

    #[test]
    fn test_dedent_blank_lines_ignored_for_indent() {
        assert_eq!(dedent("  a\n \n  b"), "a\n\nb");
    }

    #[test]
    fn test_dedent_no_indent() {
        assert_eq!(dedent("a\n  b\n"), "a\n  b\n");
    }
}
