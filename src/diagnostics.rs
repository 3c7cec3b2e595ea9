//! Advisory diagnostics produced while rewriting stylesheets.
//!
//! Nothing here affects the build outcome. Diagnostics are collected as
//! values and printed by the caller once processing is done.

use std::fmt;

use crate::css::Location;
use crate::output::Printer;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

pub const IGNORED_RULE: &str = "spritify::ignored-rule";
pub const MISSING_IMAGE: &str = "spritify::missing-image";
pub const UNUSED_IMAGE: &str = "spritify::unused-image";

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable code, e.g. "spritify::missing-image".
    pub code: &'static str,
    pub message: String,
}

fn quote_selectors(selectors: &[String]) -> String {
    format!("'{}'", selectors.join("', '"))
}

impl Diagnostic {
    /// A rule skipped because of a `spritify: ignore` comment.
    pub fn ignored_rule(selectors: &[String], css_src: &str, at: Location) -> Self {
        Self {
            severity: Severity::Info,
            code: IGNORED_RULE,
            message: format!(
                "Ignored css rule(s) {} at css file {} line {}",
                quote_selectors(selectors),
                css_src,
                at
            ),
        }
    }

    /// A `url(...)` that no sprite contains.
    pub fn missing_image(image: &str, css_src: &str, at: Location, selectors: &[String]) -> Self {
        Self {
            severity: Severity::Warning,
            code: MISSING_IMAGE,
            message: format!(
                "Can't find image {} in the sprite image(s) at css file {} line {} css rule(s) {}",
                image,
                css_src,
                at,
                quote_selectors(selectors)
            ),
        }
    }

    /// A sprited image no stylesheet referenced.
    pub fn unused_image(image: &str, sprite_dest: &str) -> Self {
        Self {
            severity: Severity::Warning,
            code: UNUSED_IMAGE,
            message: format!("Unused image {} in sprite file {}", image, sprite_dest),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Merge another collection into this one, keeping order.
    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Diagnostics carrying the given code.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.items.iter().filter(move |d| d.code == code)
    }

    /// Print every diagnostic through the status printer.
    pub fn print(&self, printer: &Printer) {
        for diagnostic in &self.items {
            match diagnostic.severity {
                Severity::Info => printer.info("Info", &diagnostic.message),
                Severity::Warning => printer.warning("Warning", &diagnostic.message),
            }
        }
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
