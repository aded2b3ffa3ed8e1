//! Admonition directives (`note`, `warning`, `tip`, ...).

use super::engine::{DirectiveEngine, DirectivePlugin, DirectiveScope};
use super::output::DirectiveOutput;
use super::syntax::DirectiveRecord;
use crate::error::RegistryError;
use crate::markdown::Markdown;
use crate::render::{HtmlBackend, RenderBackend, Renderer, escape_html};
use crate::state::BlockState;
use crate::token::{Attrs, Token};

/// Directive names handled as admonitions.
pub const ADMONITION_NAMES: [&str; 9] = [
    "attention",
    "caution",
    "danger",
    "error",
    "hint",
    "important",
    "note",
    "tip",
    "warning",
];

/// Callout boxes with a title and nested block content.
///
/// Produces an `admonition` token (`attrs.name`, optional `attrs.class`)
/// holding an `admonition_title` and an `admonition_content` container.
#[derive(Clone, Copy, Debug, Default)]
pub struct Admonition;

impl DirectivePlugin for Admonition {
    fn apply(&self, engine: &mut DirectiveEngine, md: &mut Markdown) -> Result<(), RegistryError> {
        for name in ADMONITION_NAMES {
            engine.register(name, parse_admonition);
        }

        if let Some(renderer) = md.renderer.as_mut()
            && renderer.name() == HtmlBackend::NAME
        {
            renderer.register("admonition", render_admonition);
            renderer.register("admonition_title", render_admonition_title);
            renderer.register("admonition_content", |_: &Renderer, text: &str, _: &Attrs| {
                text.to_owned()
            });
        }
        Ok(())
    }
}

fn parse_admonition(
    scope: &DirectiveScope<'_>,
    record: &DirectiveRecord<'_>,
    state: &BlockState<'_>,
) -> DirectiveOutput {
    let title = if record.title.is_empty() {
        capitalize(record.name)
    } else {
        record.title.to_owned()
    };

    let mut token = Token::container(
        "admonition",
        vec![
            Token::text("admonition_title", title),
            Token::container(
                "admonition_content",
                scope.parse_tokens(&record.content, state),
            ),
        ],
    )
    .with_attr("name", record.name);
    if let Some(class) = record.option("class") {
        token = token.with_attr("class", class);
    }
    token.into()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn render_admonition(_: &Renderer, text: &str, attrs: &Attrs) -> String {
    let name = attrs.get("name").and_then(|v| v.as_str()).unwrap_or_default();
    let mut class = format!("admonition {name}");
    if let Some(extra) = attrs.get("class").and_then(|v| v.as_str()) {
        class.push(' ');
        class.push_str(extra);
    }
    format!("<section class=\"{}\">\n{text}</section>\n", escape_html(&class))
}

fn render_admonition_title(_: &Renderer, text: &str, _: &Attrs) -> String {
    format!("<p class=\"admonition-title\">{}</p>\n", escape_html(text))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::directive::{Directive, FencedDirective, RstDirective};

    fn markdown() -> Markdown {
        Markdown::html()
            .with_plugin(&Directive::new(FencedDirective, vec![Box::new(Admonition)]))
            .unwrap()
            .with_plugin(&Directive::new(RstDirective, vec![Box::new(Admonition)]))
            .unwrap()
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("note"), "Note");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_admonition_tokens() {
        let tokens = markdown().parse(":::{warning}\n:class: big\n\nMind the gap.\n:::\n");
        assert_eq!(tokens.len(), 1);

        let admonition = &tokens[0];
        assert_eq!(admonition.kind, "admonition");
        assert_eq!(admonition.attr_str("name"), Some("warning"));
        assert_eq!(admonition.attr_str("class"), Some("big"));

        let [title, content] = admonition.children() else {
            panic!("expected title and content");
        };
        assert_eq!(title.text.as_deref(), Some("Warning"));
        assert_eq!(content.children()[0].text.as_deref(), Some("Mind the gap."));
    }

    #[test]
    fn test_render_fenced_admonition() {
        let html = markdown()
            .render(":::{note} Read <this>\nBody & more.\n:::\n")
            .unwrap();
        assert_eq!(
            html,
            "<section class=\"admonition note\">\n\
             <p class=\"admonition-title\">Read &lt;this&gt;</p>\n\
             <p>Body &amp; more.</p>\n\
             </section>\n"
        );
    }

    #[test]
    fn test_render_rst_admonition_with_class() {
        let html = markdown()
            .render(".. tip:: Shortcut\n   :class: compact\n\n   Use the CLI.\n")
            .unwrap();
        assert_eq!(
            html,
            "<section class=\"admonition tip compact\">\n\
             <p class=\"admonition-title\">Shortcut</p>\n\
             <p>Use the CLI.</p>\n\
             </section>\n"
        );
    }

    #[test]
    fn test_nested_admonitions() {
        let html = markdown()
            .render("::::{note}\n:::{tip}\nInner.\n:::\n::::\n")
            .unwrap();
        assert_eq!(
            html,
            "<section class=\"admonition note\">\n\
             <p class=\"admonition-title\">Note</p>\n\
             <section class=\"admonition tip\">\n\
             <p class=\"admonition-title\">Tip</p>\n\
             <p>Inner.</p>\n\
             </section>\n\
             </section>\n"
        );
    }

    #[test]
    fn test_non_html_renderer_gets_no_functions() {
        let mut md = Markdown::new();
        md.use_plugin(&Directive::new(FencedDirective, vec![Box::new(Admonition)]))
            .unwrap();
        let tokens = md.parse(":::{hint}\nx\n:::\n");
        assert_eq!(tokens[0].kind, "admonition");
        assert!(md.renderer.is_none());
    }
}
