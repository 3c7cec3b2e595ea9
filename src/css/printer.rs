//! Stylesheet printer.
//!
//! Two output styles: expanded (two-space indentation, comments kept) and
//! compressed (no insignificant whitespace, comments dropped). Rules that end
//! up with no declarations are omitted in both.

use super::ast::{AtRule, AtRuleBody, DeclarationItem, GroupRule, Keyframe, Node, Rule, Stylesheet};

const INDENT: &str = "  ";

/// Printer options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintOptions {
    pub compress: bool,
}

/// Render a stylesheet back to text.
pub fn stringify(sheet: &Stylesheet, options: PrintOptions) -> String {
    if options.compress {
        nodes_compressed(&sheet.rules)
    } else {
        nodes_expanded(&sheet.rules, 0)
    }
}

// --- expanded ---

fn nodes_expanded(nodes: &[Node], depth: usize) -> String {
    nodes
        .iter()
        .map(|node| node_expanded(node, depth))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn node_expanded(node: &Node, depth: usize) -> String {
    let indent = INDENT.repeat(depth);
    match node {
        Node::Comment(c) => format!("{}/*{}*/", indent, c.text),
        Node::Rule(rule) => rule_expanded(rule, depth),
        Node::Group(group) => group_expanded(group, depth),
        Node::AtRule(at) => at_rule_expanded(at, depth),
    }
}

fn rule_expanded(rule: &Rule, depth: usize) -> String {
    if rule.declarations().next().is_none() {
        return String::new();
    }
    let indent = INDENT.repeat(depth);
    let selectors = rule
        .selectors
        .iter()
        .map(|s| format!("{}{}", indent, s))
        .collect::<Vec<_>>()
        .join(",\n");
    format!(
        "{} {{\n{}\n{}}}",
        selectors,
        declarations_expanded(&rule.declarations, depth + 1),
        indent
    )
}

fn group_expanded(group: &GroupRule, depth: usize) -> String {
    let indent = INDENT.repeat(depth);
    let header = at_header(&group.name, &group.prelude);
    let body = nodes_expanded(&group.rules, depth + 1);
    if body.is_empty() {
        return format!("{}{} {{}}", indent, header);
    }
    format!("{}{} {{\n{}\n{}}}", indent, header, body, indent)
}

fn at_rule_expanded(at: &AtRule, depth: usize) -> String {
    let indent = INDENT.repeat(depth);
    let header = at_header(&at.name, &at.prelude);

    match &at.body {
        AtRuleBody::Statement => format!("{}{};", indent, header),
        AtRuleBody::Declarations(items) if items.is_empty() => {
            format!("{}{} {{}}", indent, header)
        }
        AtRuleBody::Declarations(items) => format!(
            "{}{} {{\n{}\n{}}}",
            indent,
            header,
            declarations_expanded(items, depth + 1),
            indent
        ),
        AtRuleBody::Keyframes(frames) => {
            let inner = INDENT.repeat(depth + 1);
            let body = frames
                .iter()
                .map(|frame| match frame {
                    Keyframe::Comment(c) => format!("{}/*{}*/", inner, c.text),
                    Keyframe::Frame {
                        values,
                        declarations,
                        ..
                    } => format!(
                        "{}{} {{\n{}\n{}}}",
                        inner,
                        values.join(", "),
                        declarations_expanded(declarations, depth + 2),
                        inner
                    ),
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}{} {{\n{}\n{}}}", indent, header, body, indent)
        }
    }
}

fn declarations_expanded(items: &[DeclarationItem], depth: usize) -> String {
    let indent = INDENT.repeat(depth);
    items
        .iter()
        .map(|item| match item {
            DeclarationItem::Declaration(d) => format!("{}{}: {};", indent, d.property, d.value),
            DeclarationItem::Comment(c) => format!("{}/*{}*/", indent, c.text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// --- compressed ---

fn nodes_compressed(nodes: &[Node]) -> String {
    nodes.iter().map(node_compressed).collect()
}

fn node_compressed(node: &Node) -> String {
    match node {
        Node::Comment(_) => String::new(),
        Node::Rule(rule) => {
            if rule.declarations().next().is_none() {
                return String::new();
            }
            format!(
                "{}{{{}}}",
                rule.selectors.join(","),
                declarations_compressed(&rule.declarations)
            )
        }
        Node::Group(group) => format!(
            "{}{{{}}}",
            at_header(&group.name, &group.prelude),
            nodes_compressed(&group.rules)
        ),
        Node::AtRule(at) => {
            let header = at_header(&at.name, &at.prelude);
            match &at.body {
                AtRuleBody::Statement => format!("{};", header),
                AtRuleBody::Declarations(items) => {
                    format!("{}{{{}}}", header, declarations_compressed(items))
                }
                AtRuleBody::Keyframes(frames) => {
                    let body: String = frames
                        .iter()
                        .filter_map(|frame| match frame {
                            Keyframe::Comment(_) => None,
                            Keyframe::Frame {
                                values,
                                declarations,
                                ..
                            } => Some(format!(
                                "{}{{{}}}",
                                values.join(","),
                                declarations_compressed(declarations)
                            )),
                        })
                        .collect();
                    format!("{}{{{}}}", header, body)
                }
            }
        }
    }
}

fn declarations_compressed(items: &[DeclarationItem]) -> String {
    items
        .iter()
        .filter_map(|item| match item {
            DeclarationItem::Declaration(d) => Some(format!("{}:{};", d.property, d.value)),
            DeclarationItem::Comment(_) => None,
        })
        .collect()
}

fn at_header(name: &str, prelude: &str) -> String {
    if prelude.is_empty() {
        format!("@{}", name)
    } else {
        format!("@{} {}", name, prelude)
    }
}
