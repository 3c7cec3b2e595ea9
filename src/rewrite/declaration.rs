//! Rewriting the image declarations of a single style rule.

use crate::css::{Declaration, DeclarationItem, Rule};
use crate::sprite::ImageRef;

use super::property::{self, ImageProperty};
use super::url::ImageUrl;
use super::{is_ignore_directive, RewriteContext};

/// Rewrite `rule`, which sits at `index` in the rule list reached by `path`.
///
/// Returns `true` when at least one image resolved to a sprite.
pub(super) fn rewrite_rule(
    ctx: &mut RewriteContext<'_>,
    rule: &mut Rule,
    path: &[usize],
    index: usize,
) -> bool {
    let sprites = ctx.sprites;
    let options = ctx.options;

    // Last index of each recognized property
    let mut slots: [Option<usize>; ImageProperty::ALL.len()] = [None; ImageProperty::ALL.len()];
    let mut hit: Option<ImageRef<'_>> = None;

    for i in 0..rule.declarations.len() {
        let DeclarationItem::Declaration(declaration) = &rule.declarations[i] else {
            continue;
        };
        let Some(prop) = ImageProperty::from_name(&declaration.property) else {
            continue;
        };
        slots[prop.index()] = Some(i);

        if !prop.is_url_bearing() {
            continue;
        }
        let Some(url) = ImageUrl::parse(&declaration.value) else {
            continue;
        };
        let at = declaration.position.start;

        let ignored = i > 0
            && rule.declarations[i - 1]
                .as_comment()
                .is_some_and(|c| is_ignore_directive(&c.text));
        if ignored {
            ctx.ignored(&rule.selectors, at);
            continue;
        }

        let Some(image) = sprites.resolve(&url.path) else {
            ctx.missing(&url.full(), at, &rule.selectors);
            continue;
        };

        let sprite_url = image.sprite.info.url();
        let source = if !options.inline {
            sprite_url.as_str()
        } else if options.optimize {
            image.sprite.inline.as_str()
        } else {
            image.coordinate.inline.as_str()
        };
        let value = format!("url('{}')", source);

        if options.optimize {
            let sheet = image.sprite.geometry().retina(image.sprite.info.retina());
            ctx.groups.record(
                &sprite_url,
                &rule.selectors,
                value.clone(),
                property::size(sheet),
                path,
                index,
            );
        }

        if let DeclarationItem::Declaration(declaration) = &mut rule.declarations[i] {
            declaration.value = value;
        }
        hit = Some(image);
    }

    let Some(image) = hit else {
        return false;
    };

    let retina = image.sprite.info.retina();
    let sheet = image.sprite.geometry().retina(retina);
    let geometry = image.coordinate.geometry().retina(retina);

    let mut removals = Vec::new();
    for prop in ImageProperty::ALL {
        let slot = slots[prop.index()];

        if options.optimize && prop.is_optimizable() {
            removals.extend(slot);
            continue;
        }

        if let Some(value) = prop.compute(sheet, geometry, options) {
            set_declaration(rule, prop.name(), slot, value);
        }
    }

    if options.optimize {
        removals.sort_unstable_by(|a, b| b.cmp(a));
        removals.dedup();
        for i in removals {
            rule.declarations.remove(i);
        }
    }

    true
}

/// Overwrite the declaration at `slot`, or append a new one.
fn set_declaration(rule: &mut Rule, property: &str, slot: Option<usize>, value: String) {
    if let Some(DeclarationItem::Declaration(declaration)) =
        slot.and_then(|i| rule.declarations.get_mut(i))
    {
        declaration.value = value;
        return;
    }

    rule.declarations
        .push(DeclarationItem::Declaration(Declaration::new(property, value)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::css::{parse, Node};
    use crate::rewrite::CssOptions;
    use crate::sprite::tests::sprite_with;
    use crate::sprite::SpriteSet;

    fn first_rule(css: &str) -> Rule {
        let sheet = parse(css).unwrap();
        match sheet.rules.into_iter().next() {
            Some(Node::Rule(rule)) => rule,
            other => panic!("expected a rule, got {:?}", other),
        }
    }

    fn pairs(rule: &Rule) -> Vec<(String, String)> {
        rule.declarations()
            .map(|d| (d.property.clone(), d.value.clone()))
            .collect()
    }

    fn pair(p: &str, v: &str) -> (String, String) {
        (p.to_string(), v.to_string())
    }

    fn sprites() -> SpriteSet {
        SpriteSet::new(vec![sprite_with(
            "build/sprite.png",
            &[("icons/a.png", 0, 0, 16, 16), ("icons/b.png", 0, 26, 16, 16)],
        )])
    }

    #[test]
    fn test_existing_slots_are_overwritten_in_place() {
        let sprites = sprites();
        let settings = Settings::default();
        let options = CssOptions {
            optimize: false,
            inline: false,
        };
        let mut ctx = RewriteContext::new(&sprites, options, &settings, "a.css");
        let mut rule = first_rule(
            ".b { width: 1px; background: url(../icons/b.png) #fff; background-position: 5px 5px; color: red; }",
        );

        assert!(rewrite_rule(&mut ctx, &mut rule, &[], 0));
        assert_eq!(
            pairs(&rule),
            vec![
                pair("width", "16px"),
                pair("background", "url('../images/sprite.png')"),
                pair("background-position", "0 -26px"),
                pair("color", "red"),
                pair("background-size", "16px 42px"),
                pair("background-repeat", "no-repeat"),
                pair("height", "16px"),
            ]
        );
    }

    #[test]
    fn test_optimize_removes_shared_declarations() {
        let sprites = sprites();
        let settings = Settings::default();
        let mut ctx = RewriteContext::new(&sprites, CssOptions::default(), &settings, "a.css");
        let mut rule = first_rule(
            ".a { background-repeat: repeat; background-image: url('icons/a.png'); background-size: 1px; color: red; }",
        );

        assert!(rewrite_rule(&mut ctx, &mut rule, &[], 4));
        assert_eq!(
            pairs(&rule),
            vec![
                pair("color", "red"),
                pair("background-position", "0 0"),
                pair("width", "16px"),
                pair("height", "16px"),
            ]
        );

        let group = ctx.groups.iter().next().unwrap();
        assert_eq!(group.url, "../images/sprite.png");
        assert_eq!(group.background_image, "url('../images/sprite.png')");
        assert_eq!(group.background_size, "16px 42px");
    }

    #[test]
    fn test_unresolved_leaves_rule_untouched() {
        let sprites = sprites();
        let settings = Settings::default();
        let mut ctx = RewriteContext::new(&sprites, CssOptions::default(), &settings, "a.css");
        let mut rule = first_rule(".z { background-image: url(icons/z.png); width: 3px; }");
        let before = rule.clone();

        assert!(!rewrite_rule(&mut ctx, &mut rule, &[], 0));
        assert_eq!(rule, before);
        assert_eq!(ctx.diagnostics.len(), 1);
        assert!(ctx.groups.is_empty());
    }

    #[test]
    fn test_ignored_declaration() {
        let sprites = sprites();
        let settings = Settings {
            show_ignored_rules: true,
            ..Settings::default()
        };
        let mut ctx = RewriteContext::new(&sprites, CssOptions::default(), &settings, "a.css");
        let mut rule = first_rule(".a { /* spritify:ignore */ background-image: url(icons/a.png); }");
        let before = rule.clone();

        assert!(!rewrite_rule(&mut ctx, &mut rule, &[], 0));
        assert_eq!(rule, before);
        assert_eq!(ctx.diagnostics.len(), 1);
        assert!(!sprites.iter().next().unwrap().coordinates["icons/a.png"].is_used());
    }

    #[test]
    fn test_comment_between_declarations_keeps_slots() {
        let sprites = sprites();
        let settings = Settings::default();
        let options = CssOptions {
            optimize: false,
            inline: false,
        };
        let mut ctx = RewriteContext::new(&sprites, options, &settings, "a.css");
        let mut rule =
            first_rule(".a { background-image: url(icons/a.png); /* note */ height: 2px; }");

        rewrite_rule(&mut ctx, &mut rule, &[], 0);

        assert!(rule.declarations[1].as_comment().is_some());
        assert_eq!(rule.value_of("height"), Some("16px"));
    }
}
