//! CSS parsing and printing.
//!
//! The rule tree keeps comments as nodes so that author directives such as
//! `/* spritify: ignore */` can be seen by the rewriter, and every rule and
//! declaration records where it came from for diagnostics.
//!
//! # Example
//!
//! ```ignore
//! use spritify::css::{parse, stringify, PrintOptions};
//!
//! let sheet = parse(".a { width: 1px; }")?;
//! let text = stringify(&sheet, PrintOptions { compress: true });
//! assert_eq!(text, ".a{width:1px;}");
//! ```

pub mod ast;
mod parser;
mod printer;
pub mod span;

pub use ast::{
    AtRule, AtRuleBody, Comment, Declaration, DeclarationItem, GroupRule, Keyframe, Node, Rule,
    Stylesheet,
};
pub use parser::{parse, ParseError};
pub use printer::{stringify, PrintOptions};
pub use span::{LineIndex, Location, Span};

/// Whether the source is already minified (contains no line breaks).
pub fn is_compressed(source: &str) -> bool {
    !source.contains('\n')
}
