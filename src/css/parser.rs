//! Stylesheet parser.
//!
//! Builds the rule tree from the `cssparser` token stream. Comments are kept
//! (both between rules and inside declaration blocks) and every rule and
//! declaration records its source position.

use std::fmt;

use cssparser::{Parser, ParserInput, SourcePosition, Token};

use super::ast::{
    AtRule, AtRuleBody, Comment, Declaration, DeclarationItem, GroupRule, Keyframe, Node, Rule,
    Stylesheet,
};
use super::span::{LineIndex, Location, Span};

/// At-rules whose block holds nested rules rather than declarations.
const GROUP_RULES: &[&str] = &[
    "media",
    "supports",
    "document",
    "host",
    "container",
    "layer",
    "scope",
    "starting-style",
];

/// A syntax error with the location it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub location: Location,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

impl std::error::Error for ParseError {}

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Parse stylesheet source into a rule tree.
pub fn parse(source: &str) -> ParseResult<Stylesheet> {
    let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
    let mut input = ParserInput::new(source);
    let mut parser = Parser::new(&mut input);

    let builder = TreeBuilder {
        index: LineIndex::new(source),
    };
    let rules = builder.rules(&mut parser)?;
    Ok(Stylesheet { rules })
}

fn ends_prelude(token: &Token<'_>) -> bool {
    matches!(
        token,
        Token::CurlyBracketBlock | Token::Semicolon | Token::CloseCurlyBracket
    )
}

fn ends_property(token: &Token<'_>) -> bool {
    matches!(token, Token::Colon | Token::Semicolon)
}

fn ends_value(token: &Token<'_>) -> bool {
    matches!(token, Token::Semicolon)
}

/// Source text up to a top-level stop token, comments left out.
struct Scan<'i> {
    text: String,
    /// Byte offsets of top-level commas in `text`.
    commas: Vec<usize>,
    /// `None` at the end of input.
    stop: Option<Token<'i>>,
    /// Where the stop token starts.
    end: SourcePosition,
}

impl Scan<'_> {
    /// Split at top-level commas, trimming and dropping empty parts.
    fn split(&self) -> Vec<String> {
        let mut parts = Vec::new();
        let mut from = 0;
        for &comma in self.commas.iter().chain(std::iter::once(&self.text.len())) {
            parts.push(self.text[from..comma].trim());
            from = comma + 1;
        }
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}

struct TreeBuilder<'a> {
    index: LineIndex<'a>,
}

impl TreeBuilder<'_> {
    fn error(&self, at: SourcePosition, message: &str) -> ParseError {
        ParseError {
            message: message.to_string(),
            location: self.index.location(at.byte_index()),
        }
    }

    fn span(&self, start: SourcePosition, end: SourcePosition) -> Span {
        self.index.span(start.byte_index(), end.byte_index())
    }

    /// Parse a rule list up to the end of `input`. For a nested parser that
    /// is the closing brace of its block.
    fn rules(&self, input: &mut Parser<'_, '_>) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();

        loop {
            let state = input.state();
            let start = state.position();
            let Ok(token) = input.next_including_whitespace_and_comments().cloned() else {
                break;
            };

            match token {
                Token::WhiteSpace(_) | Token::CDO | Token::CDC => {}
                Token::Comment(text) => nodes.push(Node::Comment(self.comment(input, start, text)?)),
                Token::AtKeyword(name) => nodes.push(self.at_rule(input, start, &name)?),
                Token::Delim('@') => return Err(self.error(start, "at-rule name missing")),
                Token::CloseCurlyBracket => return Err(self.error(start, "unexpected '}'")),
                _ => {
                    input.reset(&state);
                    nodes.push(Node::Rule(self.rule(input)?));
                }
            }
        }

        Ok(nodes)
    }

    fn comment(
        &self,
        input: &Parser<'_, '_>,
        start: SourcePosition,
        text: &str,
    ) -> ParseResult<Comment> {
        self.check_comment(input, start)?;
        Ok(Comment {
            text: text.to_string(),
            position: self.span(start, input.position()),
        })
    }

    /// The tokenizer runs an unterminated comment to the end of input.
    fn check_comment(&self, input: &Parser<'_, '_>, start: SourcePosition) -> ParseResult<()> {
        let raw = input.slice_from(start);
        if raw.len() >= 4 && raw.ends_with("*/") {
            Ok(())
        } else {
            Err(self.error(start, "end of comment missing"))
        }
    }

    fn rule(&self, input: &mut Parser<'_, '_>) -> ParseResult<Rule> {
        let start = input.position();
        let prelude = self.scan(input, ends_prelude)?;
        if !matches!(prelude.stop, Some(Token::CurlyBracketBlock)) {
            return Err(self.error(prelude.end, "missing '{'"));
        }

        let selectors = prelude.split();
        if selectors.is_empty() {
            return Err(self.error(start, "selector missing"));
        }

        let declarations = self.block(input, |builder, block| builder.declarations(block))?;

        Ok(Rule {
            selectors,
            declarations,
            position: self.span(start, input.position()),
        })
    }

    fn declarations(&self, input: &mut Parser<'_, '_>) -> ParseResult<Vec<DeclarationItem>> {
        let mut items = Vec::new();

        loop {
            let state = input.state();
            let start = state.position();
            let Ok(token) = input.next_including_whitespace_and_comments().cloned() else {
                break;
            };

            match token {
                Token::WhiteSpace(_) | Token::Semicolon => {}
                Token::Comment(text) => {
                    items.push(DeclarationItem::Comment(self.comment(input, start, text)?))
                }
                _ => {
                    input.reset(&state);
                    items.push(DeclarationItem::Declaration(self.declaration(input)?));
                }
            }
        }

        Ok(items)
    }

    fn declaration(&self, input: &mut Parser<'_, '_>) -> ParseResult<Declaration> {
        let start = input.position();
        let property = self.scan(input, ends_property)?;
        let name = property.text.trim();

        if !matches!(property.stop, Some(Token::Colon)) || name.is_empty() {
            return Err(self.error(property.end, "property missing ':'"));
        }

        let value = self.scan(input, ends_value)?;

        Ok(Declaration {
            property: name.to_string(),
            value: value.text.trim().to_string(),
            position: self.span(start, value.end),
        })
    }

    fn at_rule(
        &self,
        input: &mut Parser<'_, '_>,
        start: SourcePosition,
        name: &str,
    ) -> ParseResult<Node> {
        let name = name.to_string();
        let scan = self.scan(input, ends_prelude)?;
        let prelude = scan.text.trim().to_string();

        match scan.stop {
            Some(Token::CurlyBracketBlock) => {}
            Some(Token::CloseCurlyBracket) => return Err(self.error(scan.end, "unexpected '}'")),
            _ => {
                return Ok(Node::AtRule(AtRule {
                    name,
                    prelude,
                    body: AtRuleBody::Statement,
                    position: self.span(start, input.position()),
                }))
            }
        }

        let kind = unprefixed(&name).to_ascii_lowercase();

        if kind == "keyframes" {
            let frames = self.block(input, |builder, block| builder.keyframes(block))?;
            return Ok(Node::AtRule(AtRule {
                name,
                prelude,
                body: AtRuleBody::Keyframes(frames),
                position: self.span(start, input.position()),
            }));
        }

        if GROUP_RULES.contains(&kind.as_str()) {
            let rules = self.block(input, |builder, block| builder.rules(block))?;
            return Ok(Node::Group(GroupRule {
                name,
                prelude,
                rules,
                position: self.span(start, input.position()),
            }));
        }

        let declarations = self.block(input, |builder, block| builder.declarations(block))?;
        Ok(Node::AtRule(AtRule {
            name,
            prelude,
            body: AtRuleBody::Declarations(declarations),
            position: self.span(start, input.position()),
        }))
    }

    fn keyframes(&self, input: &mut Parser<'_, '_>) -> ParseResult<Vec<Keyframe>> {
        let mut frames = Vec::new();

        loop {
            let state = input.state();
            let start = state.position();
            let Ok(token) = input.next_including_whitespace_and_comments().cloned() else {
                break;
            };

            match token {
                Token::WhiteSpace(_) => {}
                Token::Comment(text) => frames.push(Keyframe::Comment(self.comment(input, start, text)?)),
                _ => {
                    input.reset(&state);
                    let selector = self.scan(input, ends_prelude)?;
                    if !matches!(selector.stop, Some(Token::CurlyBracketBlock)) {
                        return Err(self.error(selector.end, "missing '{'"));
                    }
                    let values = selector.split();
                    let declarations =
                        self.block(input, |builder, block| builder.declarations(block))?;

                    frames.push(Keyframe::Frame {
                        values,
                        declarations,
                        position: self.span(start, input.position()),
                    });
                }
            }
        }

        Ok(frames)
    }

    /// Parse the `{}` block whose opening token was just consumed.
    ///
    /// The tokenizer closes open blocks at the end of input, so a block whose
    /// contents reach the end of input is reported as unclosed.
    fn block<'i, T, F>(&self, input: &mut Parser<'i, '_>, parse: F) -> ParseResult<T>
    where
        F: for<'tt> FnOnce(&Self, &mut Parser<'i, 'tt>) -> ParseResult<T>,
    {
        let mut contents_end = input.position();
        let nested = input.parse_nested_block(|block| {
            let parsed = parse(self, block);
            while block.next_including_whitespace_and_comments().is_ok() {}
            contents_end = block.position();
            Ok::<_, cssparser::ParseError<'i, ()>>(parsed)
        });
        let parsed = nested.map_err(|_| self.error(contents_end, "missing '}'"))??;

        if input.position() == contents_end {
            return Err(self.error(contents_end, "missing '}'"));
        }
        Ok(parsed)
    }

    /// Consume tokens up to the first one matching `stop`. Nested blocks and
    /// functions are taken whole.
    fn scan<'i>(
        &self,
        input: &mut Parser<'i, '_>,
        stop: fn(&Token<'_>) -> bool,
    ) -> ParseResult<Scan<'i>> {
        let mut text = String::new();
        let mut commas = Vec::new();
        let mut segment = input.position();

        loop {
            let before = input.position();
            let Ok(token) = input.next_including_whitespace_and_comments().cloned() else {
                text.push_str(input.slice_from(segment));
                return Ok(Scan {
                    text,
                    commas,
                    stop: None,
                    end: input.position(),
                });
            };

            if stop(&token) {
                text.push_str(input.slice(segment..before));
                return Ok(Scan {
                    text,
                    commas,
                    stop: Some(token),
                    end: before,
                });
            }

            match token {
                Token::Comment(_) => {
                    self.check_comment(input, before)?;
                    text.push_str(input.slice(segment..before));
                    segment = input.position();
                }
                Token::Comma => {
                    text.push_str(input.slice(segment..before));
                    commas.push(text.len());
                    segment = before;
                }
                _ => {}
            }
        }
    }
}

/// Strip a vendor prefix: `-webkit-keyframes` -> `keyframes`.
fn unprefixed(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix('-') {
        if let Some(i) = rest.find('-') {
            return &rest[i + 1..];
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_rule(sheet: &Stylesheet) -> &Rule {
        match &sheet.rules[0] {
            Node::Rule(r) => r,
            other => panic!("expected rule, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_rule() {
        let sheet = parse(".a { width: 10px; height: 20px }").unwrap();
        let rule = first_rule(&sheet);

        assert_eq!(rule.selectors, vec![".a"]);
        assert_eq!(rule.value_of("width"), Some("10px"));
        assert_eq!(rule.value_of("height"), Some("20px"));
    }

    #[test]
    fn test_parse_selector_list() {
        let sheet = parse(".a,\n.b > .c, a[title=\"x,y\"] { color: red; }").unwrap();
        let rule = first_rule(&sheet);

        assert_eq!(rule.selectors, vec![".a", ".b > .c", "a[title=\"x,y\"]"]);
    }

    #[test]
    fn test_parse_selector_list_keeps_nested_commas() {
        let sheet = parse(":is(a, b), c , /* x */ d { color: red; }").unwrap();
        let rule = first_rule(&sheet);

        assert_eq!(rule.selectors, vec![":is(a, b)", "c", "d"]);
    }

    #[test]
    fn test_parse_positions() {
        let sheet = parse(".a {\n  width: 1px;\n}\n\n.b {\n  background: url(b.png);\n}").unwrap();

        let Node::Rule(b) = &sheet.rules[1] else {
            panic!("expected rule");
        };
        assert_eq!(b.position.start, Location::new(5, 1));
        let decl = b.declarations().next().unwrap();
        assert_eq!(decl.position.start, Location::new(6, 3));
    }

    #[test]
    fn test_parse_keeps_comments() {
        let sheet = parse("/* spritify: ignore */\n.a { /* note */ color: red; }").unwrap();

        assert_eq!(sheet.rules[0].as_comment().unwrap().text, " spritify: ignore ");
        let rule = match &sheet.rules[1] {
            Node::Rule(r) => r,
            _ => panic!("expected rule"),
        };
        assert_eq!(rule.declarations[0].as_comment().unwrap().text, " note ");
    }

    #[test]
    fn test_parse_value_with_semicolon_in_url() {
        let css = ".a { background-image: url(data:image/png;base64,AAAA); width: 1px; }";
        let sheet = parse(css).unwrap();
        let rule = first_rule(&sheet);

        assert_eq!(
            rule.value_of("background-image"),
            Some("url(data:image/png;base64,AAAA)")
        );
        assert_eq!(rule.value_of("width"), Some("1px"));
    }

    #[test]
    fn test_parse_comment_opener_inside_url() {
        let css = ".a { background-image: url(//cdn/*/x.png); }\n.b { color: red; }";
        let sheet = parse(css).unwrap();

        assert_eq!(sheet.rules.len(), 2);
        assert_eq!(
            first_rule(&sheet).value_of("background-image"),
            Some("url(//cdn/*/x.png)")
        );
        let Node::Rule(b) = &sheet.rules[1] else {
            panic!("expected rule");
        };
        assert_eq!(b.selectors, vec![".b"]);
    }

    #[test]
    fn test_parse_strips_byte_order_mark() {
        let css = "\u{FEFF}/* spritify: ignore */.a{background-image:url(icons/a.png)}";
        let sheet = parse(css).unwrap();

        assert_eq!(sheet.rules[0].as_comment().unwrap().text, " spritify: ignore ");
        let Node::Rule(a) = &sheet.rules[1] else {
            panic!("expected rule");
        };
        assert_eq!(a.selectors, vec![".a"]);
    }

    #[test]
    fn test_parse_media_group() {
        let css = "@media (min-width: 10px) { .a { color: red; } .b { color: blue; } }";
        let sheet = parse(css).unwrap();

        match &sheet.rules[0] {
            Node::Group(g) => {
                assert_eq!(g.name, "media");
                assert_eq!(g.prelude, "(min-width: 10px)");
                assert_eq!(g.rules.len(), 2);
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_groups() {
        let css = "@supports (display: grid) { @media print { .a { color: red; } } }";
        let sheet = parse(css).unwrap();

        let Node::Group(outer) = &sheet.rules[0] else {
            panic!("expected group");
        };
        let Node::Group(inner) = &outer.rules[0] else {
            panic!("expected nested group");
        };
        assert_eq!(inner.name, "media");
        assert_eq!(inner.rules.len(), 1);
    }

    #[test]
    fn test_parse_at_rule_kinds() {
        let css = "@charset \"utf-8\";\n@import url(\"x.css\");\n@font-face { font-family: x; }\n@-webkit-keyframes spin { from { opacity: 0; } to { opacity: 1; } }";
        let sheet = parse(css).unwrap();

        assert_eq!(sheet.rules.len(), 4);
        match &sheet.rules[0] {
            Node::AtRule(a) => {
                assert_eq!(a.name, "charset");
                assert_eq!(a.prelude, "\"utf-8\"");
                assert_eq!(a.body, AtRuleBody::Statement);
            }
            _ => panic!("expected at-rule"),
        }
        match &sheet.rules[2] {
            Node::AtRule(a) => assert!(matches!(a.body, AtRuleBody::Declarations(_))),
            _ => panic!("expected at-rule"),
        }
        match &sheet.rules[3] {
            Node::AtRule(a) => match &a.body {
                AtRuleBody::Keyframes(frames) => assert_eq!(frames.len(), 2),
                other => panic!("expected keyframes, got {:?}", other),
            },
            _ => panic!("expected at-rule"),
        }
    }

    #[test]
    fn test_parse_minified() {
        let sheet = parse(".a{width:1px}.b{height:2px;}").unwrap();
        assert_eq!(sheet.rules.len(), 2);
    }

    #[test]
    fn test_parse_skips_html_comment_markers() {
        let sheet = parse("<!-- .a { width: 1px; } -->").unwrap();
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(first_rule(&sheet).selectors, vec![".a"]);
    }

    #[test]
    fn test_parse_error_missing_brace() {
        let err = parse(".a { width: 1px;").unwrap_err();
        assert_eq!(err.message, "missing '}'");
    }

    #[test]
    fn test_parse_error_unclosed_group() {
        let err = parse("@media print {\n  .a { color: red; }\n").unwrap_err();
        assert_eq!(err.message, "missing '}'");
    }

    #[test]
    fn test_parse_error_stray_close() {
        let err = parse(".a { }\n}").unwrap_err();
        assert_eq!(err.message, "unexpected '}'");
        assert_eq!(err.location, Location::new(2, 1));
    }

    #[test]
    fn test_parse_error_unterminated_comment() {
        let err = parse("/* open\n.a { }").unwrap_err();
        assert_eq!(err.message, "end of comment missing");
        assert_eq!(err.location, Location::new(1, 1));
    }

    #[test]
    fn test_parse_error_missing_colon() {
        let err = parse(".a { width 1px; }").unwrap_err();
        assert_eq!(err.message, "property missing ':'");
    }

    #[test]
    fn test_parse_error_selector_missing() {
        let err = parse("{ color: red; }").unwrap_err();
        assert_eq!(err.message, "selector missing");
    }

    #[test]
    fn test_unprefixed() {
        assert_eq!(unprefixed("-moz-document"), "document");
        assert_eq!(unprefixed("media"), "media");
    }
}
