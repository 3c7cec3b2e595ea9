//! Stylesheet tree types.

use serde::Serialize;

use super::span::Span;

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stylesheet {
    pub rules: Vec<Node>,
}

/// One entry of a rule list.
///
/// `Rule` is the only leaf that carries selectors; `Group` is the only
/// container whose children are themselves rule lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Rule(Rule),
    Group(GroupRule),
    AtRule(AtRule),
    Comment(Comment),
}

impl Node {
    /// The comment text if this node is a comment.
    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            Node::Comment(c) => Some(c),
            _ => None,
        }
    }

    pub fn position(&self) -> Span {
        match self {
            Node::Rule(r) => r.position,
            Node::Group(g) => g.position,
            Node::AtRule(a) => a.position,
            Node::Comment(c) => c.position,
        }
    }
}

/// A style rule: `selectors { declarations }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub selectors: Vec<String>,
    pub declarations: Vec<DeclarationItem>,
    pub position: Span,
}

impl Rule {
    /// Create a rule that has no source position.
    pub fn new(selectors: Vec<String>, declarations: Vec<Declaration>) -> Self {
        Self {
            selectors,
            declarations: declarations
                .into_iter()
                .map(DeclarationItem::Declaration)
                .collect(),
            position: Span::default(),
        }
    }

    /// Iterate over declarations, skipping comments.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter_map(|item| match item {
            DeclarationItem::Declaration(d) => Some(d),
            DeclarationItem::Comment(_) => None,
        })
    }

    /// Value of the last declaration of `property`, if any.
    pub fn value_of(&self, property: &str) -> Option<&str> {
        self.declarations()
            .filter(|d| d.property == property)
            .last()
            .map(|d| d.value.as_str())
    }
}

/// A conditional or grouping at-rule holding nested rules (`@media`, `@supports`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRule {
    pub name: String,
    pub prelude: String,
    pub rules: Vec<Node>,
    pub position: Span,
}

/// Any other at-rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtRule {
    pub name: String,
    pub prelude: String,
    pub body: AtRuleBody,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "kebab-case")]
pub enum AtRuleBody {
    /// `@import url(x.css);`
    Statement,
    /// `@font-face { ... }`, `@page { ... }`
    Declarations(Vec<DeclarationItem>),
    /// `@keyframes name { from { ... } to { ... } }`
    Keyframes(Vec<Keyframe>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Keyframe {
    Frame {
        values: Vec<String>,
        declarations: Vec<DeclarationItem>,
        position: Span,
    },
    Comment(Comment),
}

/// An entry of a declaration block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DeclarationItem {
    Declaration(Declaration),
    Comment(Comment),
}

impl DeclarationItem {
    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            DeclarationItem::Comment(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub position: Span,
}

impl Declaration {
    /// Create a declaration that has no source position.
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            position: Span::default(),
        }
    }
}

/// A `/* ... */` comment; `text` excludes the delimiters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub text: String,
    pub position: Span,
}
