//! Document-order traversal of the rule tree.

use crate::css::Node;

use super::declaration::rewrite_rule;
use super::{is_ignore_directive, RewriteContext};

/// Rewrite every style rule in `rules`, descending into grouping at-rules.
///
/// `path` holds the child indices leading from the stylesheet root to
/// `rules`; it is restored before returning.
pub(super) fn walk(ctx: &mut RewriteContext<'_>, rules: &mut [Node], path: &mut Vec<usize>) {
    for i in 0..rules.len() {
        let ignored = i > 0
            && rules[i - 1]
                .as_comment()
                .is_some_and(|c| is_ignore_directive(&c.text));

        if ignored {
            let label = match &rules[i] {
                Node::Rule(rule) => rule.selectors.clone(),
                Node::Group(group) => vec![format!("@{} {}", group.name, group.prelude)],
                Node::AtRule(at) => vec![format!("@{} {}", at.name, at.prelude)],
                Node::Comment(_) => Vec::new(),
            };
            ctx.ignored(&label, rules[i].position().start);
            continue;
        }

        match &mut rules[i] {
            Node::Group(group) => {
                path.push(i);
                walk(ctx, &mut group.rules, path);
                path.pop();
            }
            Node::Rule(rule) if !rule.declarations.is_empty() => {
                rewrite_rule(ctx, rule, path, i);
            }
            Node::Rule(_) | Node::AtRule(_) | Node::Comment(_) => {}
        }
    }
}
