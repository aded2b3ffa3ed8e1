//! Directive dispatch and recursive content parsing.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use super::output::DirectiveOutput;
use super::syntax::{DirectiveRecord, DirectiveSyntax};
use crate::error::RegistryError;
use crate::markdown::{Markdown, Plugin};
use crate::rules;
use crate::scanner::{BlockParser, Position, RuleMatch};
use crate::state::BlockState;
use crate::token::Token;

/// Handler producing tokens for one directive name.
pub type DirectiveHandler = Box<
    dyn Fn(&DirectiveScope<'_>, &DirectiveRecord<'_>, &BlockState<'_>) -> DirectiveOutput
        + Send
        + Sync,
>;

/// Registers directive handlers (and usually render functions) for a set of
/// directive names.
pub trait DirectivePlugin: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if a block rule the plugin needs cannot be registered.
    fn apply(&self, engine: &mut DirectiveEngine, md: &mut Markdown) -> Result<(), RegistryError>;
}

/// Name-to-handler registry for one directive syntax.
///
/// Several directive plugins may share an engine as long as their handler
/// names are disjoint.
pub struct DirectiveEngine {
    syntax: Arc<dyn DirectiveSyntax>,
    handlers: HashMap<String, DirectiveHandler>,
}

impl DirectiveEngine {
    #[must_use]
    pub fn new(syntax: Arc<dyn DirectiveSyntax>) -> Self {
        Self {
            syntax,
            handlers: HashMap::new(),
        }
    }

    /// Block rule name of the underlying syntax.
    #[must_use]
    pub fn rule_name(&self) -> &'static str {
        self.syntax.rule_name()
    }

    /// Register the handler for directive `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&DirectiveScope<'_>, &DirectiveRecord<'_>, &BlockState<'_>) -> DirectiveOutput
            + Send
            + Sync
            + 'static,
    {
        if self
            .handlers
            .insert(name.to_owned(), Box::new(handler))
            .is_some()
        {
            tracing::debug!(directive = name, "Replacing directive handler");
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Block rule handler: extract, dispatch, append.
    fn parse_directive(
        &self,
        parser: &BlockParser,
        m: &RuleMatch<'_>,
        state: &mut BlockState<'_>,
    ) -> Option<usize> {
        let record = self.syntax.extract(m, state.src())?;
        let scope = DirectiveScope {
            parser,
            rule: self.syntax.rule_name(),
        };

        let output = if let Some(handler) = self.handlers.get(record.name) {
            handler(&scope, &record, state)
        } else {
            tracing::debug!(directive = record.name, "Unsupported directive");
            Token::block_error(format!("Unsupported directive: {}", record.name)).into()
        };

        for token in output.into_tokens() {
            state.append_token(token);
        }
        Some(record.end)
    }
}

/// Context handed to directive handlers for recursive parsing.
pub struct DirectiveScope<'p> {
    parser: &'p BlockParser,
    rule: &'static str,
}

impl<'p> DirectiveScope<'p> {
    #[must_use]
    pub fn parser(&self) -> &'p BlockParser {
        self.parser
    }

    /// Parse `text` as block content nested inside `state`.
    ///
    /// Runs every registered rule in a child state one level deeper. Once
    /// `state` sits at `max_nested_level - 1` or deeper, every directive rule
    /// is left out, whatever its syntax, so further directives degrade to
    /// plain blocks instead of recursing.
    #[must_use]
    pub fn parse_tokens(&self, text: &str, state: &BlockState<'_>) -> Vec<Token> {
        let limit = self.parser.max_nested_level().saturating_sub(1);
        let rules: Vec<&str> = if state.depth() >= limit {
            tracing::debug!(
                rule = self.rule,
                depth = state.depth(),
                "Directive nesting limit reached, disabling directive rules"
            );
            self.parser
                .rule_names()
                .filter(|name| !self.parser.is_nesting_rule(name))
                .collect()
        } else {
            self.parser.rule_names().collect()
        };

        let mut child = state.child_state(text);
        self.parser.parse(&mut child, &rules);
        child.into_tokens()
    }
}

/// Block plugin adding one directive syntax and its directive plugins.
///
/// # Example
///
/// ```
/// use rw_blocks::Markdown;
/// use rw_blocks::directive::{Admonition, Directive, FencedDirective};
///
/// let md = Markdown::html()
///     .with_plugin(&Directive::new(FencedDirective, vec![Box::new(Admonition)]))
///     .unwrap();
///
/// let html = md.render(":::{tip}\nKeep going.\n:::\n").unwrap();
/// assert!(html.starts_with(r#"<section class="admonition tip">"#));
/// ```
pub struct Directive {
    syntax: Arc<dyn DirectiveSyntax>,
    plugins: Vec<Box<dyn DirectivePlugin>>,
}

impl Directive {
    #[must_use]
    pub fn new(
        syntax: impl DirectiveSyntax + 'static,
        plugins: Vec<Box<dyn DirectivePlugin>>,
    ) -> Self {
        Self {
            syntax: Arc::new(syntax),
            plugins,
        }
    }
}

impl Plugin for Directive {
    fn apply(&self, md: &mut Markdown) -> Result<(), RegistryError> {
        let pattern = Regex::new(self.syntax.pattern())?;
        let mut engine = DirectiveEngine::new(Arc::clone(&self.syntax));
        for plugin in &self.plugins {
            plugin.apply(&mut engine, md)?;
        }

        let rule = engine.rule_name();
        let engine = Arc::new(engine);
        md.block.register_regex(
            rule,
            pattern,
            Box::new(
                move |parser: &BlockParser, m: &RuleMatch<'_>, state: &mut BlockState<'_>| {
                    engine.parse_directive(parser, m, state)
                },
            ),
            Position::Before(rules::FENCED_CODE),
        )?;
        md.block.mark_nesting_rule(rule)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::directive::{FencedDirective, RstDirective};

    /// Wraps each directive's content in a `box` container.
    struct BoxPlugin;

    impl DirectivePlugin for BoxPlugin {
        fn apply(
            &self,
            engine: &mut DirectiveEngine,
            _md: &mut Markdown,
        ) -> Result<(), RegistryError> {
            engine.register("box", |scope, record, state| {
                Token::container("box", scope.parse_tokens(&record.content, state))
                    .with_attr("depth", i64::try_from(state.depth()).ok())
                    .into()
            });
            engine.register("pair", |_, record, _| {
                vec![
                    Token::text("first", record.title),
                    Token::text("second", record.option("x").unwrap_or_default()),
                ]
                .into()
            });
            Ok(())
        }
    }

    fn markdown(level: usize) -> Markdown {
        let mut md = Markdown::html();
        md.block.set_max_nested_level(level);
        md.use_plugin(&Directive::new(FencedDirective, vec![Box::new(BoxPlugin)]))
            .unwrap();
        md
    }

    fn kinds(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.kind.as_str()).collect()
    }

    #[test]
    fn test_rule_registered_before_fenced_code() {
        let md = markdown(6);
        let names: Vec<_> = md.block.rule_names().collect();
        assert_eq!(
            names,
            vec!["blank_line", "fenced_directive", "fenced_code", "heading", "paragraph"]
        );
    }

    #[test]
    fn test_backtick_directive_is_not_code() {
        let tokens = markdown(6).parse("```{box}\ntext\n```\n");
        assert_eq!(kinds(&tokens), vec!["box"]);
        assert_eq!(kinds(tokens[0].children()), vec!["paragraph"]);
    }

    #[test]
    fn test_unknown_directive_is_block_error() {
        let tokens = markdown(6).parse("before\n\n:::{mystery} x\nbody\n:::\n\nafter\n");
        assert_eq!(
            kinds(&tokens),
            vec!["paragraph", "blank_line", "block_error", "blank_line", "paragraph"]
        );
        let errors: Vec<_> = tokens.iter().filter(|t| t.kind == "block_error").collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].raw.as_deref(), Some("Unsupported directive: mystery"));
        assert_eq!(tokens[4].text.as_deref(), Some("after"));
    }

    #[test]
    fn test_handler_list_output_appended_in_order() {
        let tokens = markdown(6).parse(":::{pair} one\n:x: two\n:::\n");
        assert_eq!(kinds(&tokens), vec!["first", "second"]);
        assert_eq!(tokens[0].text.as_deref(), Some("one"));
        assert_eq!(tokens[1].text.as_deref(), Some("two"));
    }

    #[test]
    fn test_nested_directives_within_limit() {
        let src = ":::::{box}\n::::{box}\n:::{box}\ninner\n:::\n::::\n:::::\n";
        let tokens = markdown(6).parse(src);

        let outer = &tokens[0];
        let middle = &outer.children()[0];
        let inner = &middle.children()[0];
        assert_eq!(kinds(&[outer.clone(), middle.clone(), inner.clone()]), vec!["box"; 3]);
        assert_eq!(inner.children()[0].text.as_deref(), Some("inner"));
        assert_eq!(middle.attr("depth").and_then(|v| v.as_int()), Some(1));
    }

    #[test]
    fn test_depth_guard_flattens_at_limit() {
        let src = ":::::{box}\n::::{box}\n:::{box}\ninner\n:::\n::::\n:::::\n";
        let tokens = markdown(2).parse(src);

        let middle = &tokens[0].children()[0];
        assert_eq!(middle.kind, "box");
        assert_eq!(kinds(middle.children()), vec!["paragraph"]);
        assert_eq!(
            middle.children()[0].text.as_deref(),
            Some(":::{box}\ninner\n:::")
        );
    }

    #[test]
    fn test_self_nesting_bounded_at_level_one() {
        let tokens = markdown(1).parse("::::{box}\n:::{box}\nx\n:::\n::::\n");
        assert_eq!(kinds(&tokens), vec!["box"]);
        assert_eq!(kinds(tokens[0].children()), vec!["paragraph"]);
    }

    fn both_syntaxes(level: usize) -> Markdown {
        let mut md = markdown(level);
        md.use_plugin(&Directive::new(RstDirective, vec![Box::new(BoxPlugin)]))
            .unwrap();
        md
    }

    fn box_depth(tokens: &[Token]) -> usize {
        tokens
            .iter()
            .filter(|t| t.kind == "box")
            .map(|t| 1 + box_depth(t.children()))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_guard_disables_every_directive_syntax() {
        let md = both_syntaxes(1);
        assert!(md.block.is_nesting_rule("fenced_directive"));
        assert!(md.block.is_nesting_rule("rst_directive"));

        let tokens = md.parse(":::{box}\n.. box::\n\n   rst body\n:::\n");
        assert_eq!(kinds(&tokens), vec!["box"]);
        assert!(tokens[0].children().iter().all(|t| t.kind != "box"));
        assert_eq!(tokens[0].children()[0].text.as_deref(), Some(".. box::"));
    }

    #[test]
    fn test_alternating_syntaxes_respect_limit() {
        // Eight levels alternating fenced and RST directives.
        let mut src = String::from("x\n");
        for level in (0..8).rev() {
            src = if level % 2 == 0 {
                let fence = ":".repeat(3 + level);
                format!("{fence}{{box}}\n{src}{fence}\n")
            } else {
                let body: String = src.lines().map(|line| format!("   {line}\n")).collect();
                format!(".. box::\n\n{body}")
            };
        }

        assert_eq!(box_depth(&both_syntaxes(2).parse(&src)), 2);
        assert_eq!(box_depth(&both_syntaxes(3).parse(&src)), 3);
        assert_eq!(box_depth(&both_syntaxes(6).parse(&src)), 6);
    }

    #[test]
    fn test_duplicate_syntax_registration_fails() {
        let mut md = markdown(6);
        let err = md
            .use_plugin(&Directive::new(FencedDirective, Vec::new()))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRule(name) if name == "fenced_directive"));
    }
}
