//! Fence tracking for fenced code blocks and fenced directives.

use crate::util::lines;

/// Tracks code fence state during line-by-line processing.
///
/// Code fences in `CommonMark` can use backticks or tildes (three or more).
/// The closing fence must use the same character and be at least as long
/// as the opening fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    /// Character used for the current fence (backtick or tilde).
    fence_char: Option<char>,
    /// Length of the opening fence (minimum length for closing).
    fence_len: usize,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Update fence state based on a line.
    ///
    /// Returns `true` if the line is a fence marker (opening or closing).
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        if let Some(fence_char) = self.fence_char {
            if is_fence_line(trimmed, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                return true;
            }
            false
        } else if let Some((ch, len)) = detect_fence(trimmed) {
            self.fence_char = Some(ch);
            self.fence_len = len;
            true
        } else {
            false
        }
    }
}

/// Body and overall extent of a fenced region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FencedRegion {
    /// Offset one past the last body byte.
    pub(crate) body_end: usize,
    /// Offset one past the closing fence line (or end of text if unterminated).
    pub(crate) end: usize,
}

/// Find the closing line of a code fence opened by `opening`.
///
/// Scanning starts at `body_start` in `src`. An unterminated fence runs to
/// the end of `src`.
pub(crate) fn close_code_fence(src: &str, opening: &str, body_start: usize) -> FencedRegion {
    let mut tracker = FenceTracker::new();
    tracker.update(opening);

    for (offset, line) in lines(&src[body_start..]) {
        if tracker.update(line.trim_end()) && !tracker.in_fence() {
            return FencedRegion {
                body_end: body_start + offset,
                end: body_start + offset + line.len(),
            };
        }
    }
    FencedRegion {
        body_end: src.len(),
        end: src.len(),
    }
}

/// Find the line that repeats `marker` exactly (up to 3 spaces of indent).
///
/// Used by fenced directives, where nesting is expressed by longer outer
/// fences, so only an identical marker closes the block.
pub(crate) fn close_exact_fence(src: &str, marker: &str, body_start: usize) -> FencedRegion {
    for (offset, line) in lines(&src[body_start..]) {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent <= 3 && line.trim() == marker {
            return FencedRegion {
                body_end: body_start + offset,
                end: body_start + offset + line.len(),
            };
        }
    }
    FencedRegion {
        body_end: src.len(),
        end: src.len(),
    }
}

/// Detect if a line starts a code fence.
///
/// Returns the fence character and length if found.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count >= 3 {
        Some((first, count))
    } else {
        None
    }
}

/// Check if a line is a valid closing fence.
///
/// The closing fence must:
/// - Use the same character as opening
/// - Be at least as long as opening
/// - Contain only fence characters (optionally followed by whitespace)
fn is_fence_line(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    let first = match trimmed.chars().next() {
        Some(c) if c == expected_char => c,
        _ => return false,
    };

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < min_len {
        return false;
    }

    trimmed[count..].chars().all(char::is_whitespace)
}
