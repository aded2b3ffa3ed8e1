//! Token tree produced by block parsing and consumed by render backends.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Token attributes keyed by name.
pub type Attrs = BTreeMap<String, AttrValue>;

/// Value of a single token attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttrValue {
    /// Explicitly absent value (e.g. a column without alignment).
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl AttrValue {
    /// String payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A node in the parsed block tree.
///
/// A token is either a container (`children` set) or a leaf carrying
/// `raw` and/or `text`. Children are owned by exactly one parent.
///
/// # Example
///
/// ```
/// use rw_blocks::Token;
///
/// let cell = Token::text("table_cell", "a").with_attr("head", true);
/// let head = Token::container("table_head", vec![cell]);
/// assert_eq!(head.children().len(), 1);
/// assert_eq!(head.children()[0].attr_bool("head"), Some(true));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Token {
    /// Token type name used for render dispatch.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub raw: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub text: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub children: Option<Vec<Token>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "BTreeMap::is_empty"))]
    pub attrs: Attrs,
}

impl Token {
    /// Create a token with no payload.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            raw: None,
            text: None,
            children: None,
            attrs: Attrs::new(),
        }
    }

    /// Create a leaf token carrying `text`.
    #[must_use]
    pub fn text(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(kind)
        }
    }

    /// Create a leaf token carrying unprocessed `raw` content.
    #[must_use]
    pub fn raw(kind: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::new(kind)
        }
    }

    /// Create a container token owning `children`.
    #[must_use]
    pub fn container(kind: impl Into<String>, children: Vec<Token>) -> Self {
        Self {
            children: Some(children),
            ..Self::new(kind)
        }
    }

    /// Create a `block_error` token shown in place of unparseable markup.
    #[must_use]
    pub fn block_error(message: impl Into<String>) -> Self {
        Self::raw("block_error", message)
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Whether this token is a container.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Child tokens (empty for leaf tokens).
    #[must_use]
    pub fn children(&self) -> &[Token] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Leaf content: `text` if present, otherwise `raw`.
    #[must_use]
    pub fn content(&self) -> &str {
        self.text
            .as_deref()
            .or(self.raw.as_deref())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    #[must_use]
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(AttrValue::as_str)
    }

    #[must_use]
    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attr(key).and_then(AttrValue::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_content_prefers_text() {
        let mut token = Token::raw("paragraph", "raw body");
        assert_eq!(token.content(), "raw body");

        token.text = Some("text body".to_owned());
        assert_eq!(token.content(), "text body");
    }

    #[test]
    fn test_container_children() {
        let token = Token::container("table_body", vec![Token::new("table_row")]);
        assert!(token.is_container());
        assert_eq!(token.children()[0].kind, "table_row");
        assert!(Token::new("blank_line").children().is_empty());
    }

    #[test]
    fn test_option_attr_maps_none_to_null() {
        let token = Token::new("table_cell").with_attr("align", None::<&str>);
        assert_eq!(token.attr("align"), Some(&AttrValue::Null));
        assert_eq!(token.attr_str("align"), None);

        let token = Token::new("table_cell").with_attr("align", Some("left"));
        assert_eq!(token.attr_str("align"), Some("left"));
    }

    #[test]
    fn test_block_error() {
        let token = Token::block_error("Unsupported directive: foo");
        assert_eq!(token.kind, "block_error");
        assert_eq!(token.raw.as_deref(), Some("Unsupported directive: foo"));
        assert!(!token.is_container());
    }
}
