//! HTML render backend.

use super::{RenderBackend, Renderer};
use crate::token::Attrs;

/// HTML output for the baseline block tokens.
///
/// Plugins add functions for their own token types when the active
/// renderer is this backend.
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    const NAME: &'static str = "html";

    fn install(renderer: &mut Renderer) {
        renderer.register("paragraph", paragraph);
        renderer.register("heading", heading);
        renderer.register("block_code", block_code);
        renderer.register("blank_line", |_: &Renderer, _: &str, _: &Attrs| String::new());
        renderer.register("block_error", block_error);
    }
}

fn paragraph(_: &Renderer, text: &str, _: &Attrs) -> String {
    format!("<p>{}</p>\n", escape_html(text))
}

fn heading(_: &Renderer, text: &str, attrs: &Attrs) -> String {
    let level = attrs
        .get("level")
        .and_then(|v| v.as_int())
        .unwrap_or(1)
        .clamp(1, 6);
    format!("<h{level}>{}</h{level}>\n", escape_html(text))
}

fn block_code(_: &Renderer, code: &str, attrs: &Attrs) -> String {
    let lang = attrs
        .get("info")
        .and_then(|v| v.as_str())
        .and_then(|info| info.split_whitespace().next());
    match lang {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(lang),
            escape_html(code)
        ),
        None => format!("<pre><code>{}</code></pre>\n", escape_html(code)),
    }
}

fn block_error(_: &Renderer, text: &str, _: &Attrs) -> String {
    format!("<div class=\"error\"><pre>{}</pre></div>\n", escape_html(text))
}

/// Escape text for HTML element content and double-quoted attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn render(token: &Token) -> String {
        Renderer::new::<HtmlBackend>().render_token(token).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
        assert_eq!(escape_html("it's"), "it's");
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(render(&Token::text("paragraph", "a < b")), "<p>a &lt; b</p>\n");
    }

    #[test]
    fn test_heading_level() {
        let token = Token::text("heading", "Title").with_attr("level", 3_i64);
        assert_eq!(render(&token), "<h3>Title</h3>\n");
        assert_eq!(render(&Token::text("heading", "x")), "<h1>x</h1>\n");
    }

    #[test]
    fn test_block_code() {
        let token = Token::raw("block_code", "if a < b {}\n").with_attr("info", "rust ignore");
        assert_eq!(
            render(&token),
            "<pre><code class=\"language-rust\">if a &lt; b {}\n</code></pre>\n"
        );
        assert_eq!(
            render(&Token::raw("block_code", "x")),
            "<pre><code>x</code></pre>\n"
        );
    }

    #[test]
    fn test_blank_line_renders_nothing() {
        assert_eq!(render(&Token::new("blank_line")), "");
    }

    #[test]
    fn test_block_error() {
        assert_eq!(
            render(&Token::block_error("Unsupported directive: x")),
            "<div class=\"error\"><pre>Unsupported directive: x</pre></div>\n"
        );
    }
}
