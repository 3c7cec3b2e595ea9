//! The CSS properties the rewriter understands.

use crate::sprite::Geometry;

use super::CssOptions;

/// Image-affecting properties, in the order their values are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageProperty {
    BackgroundImage,
    Background,
    BackgroundSize,
    BackgroundRepeat,
    BackgroundPosition,
    Width,
    Height,
}

impl ImageProperty {
    pub const ALL: [ImageProperty; 7] = [
        ImageProperty::BackgroundImage,
        ImageProperty::Background,
        ImageProperty::BackgroundSize,
        ImageProperty::BackgroundRepeat,
        ImageProperty::BackgroundPosition,
        ImageProperty::Width,
        ImageProperty::Height,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ImageProperty::BackgroundImage => "background-image",
            ImageProperty::Background => "background",
            ImageProperty::BackgroundSize => "background-size",
            ImageProperty::BackgroundRepeat => "background-repeat",
            ImageProperty::BackgroundPosition => "background-position",
            ImageProperty::Width => "width",
            ImageProperty::Height => "height",
        }
    }

    /// Position in [`Self::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Carries a `url(...)` that may point at a sprited image.
    pub fn is_url_bearing(self) -> bool {
        matches!(self, ImageProperty::BackgroundImage | ImageProperty::Background)
    }

    /// Moves to the merged rule when selectors are optimized.
    pub fn is_optimizable(self) -> bool {
        matches!(
            self,
            ImageProperty::BackgroundImage
                | ImageProperty::Background
                | ImageProperty::BackgroundSize
                | ImageProperty::BackgroundRepeat
        )
    }

    /// Value written into a rule once its image resolved. URL-bearing
    /// properties are rewritten in place instead and have no computed value.
    pub fn compute(self, sprite: Geometry, image: Geometry, options: CssOptions) -> Option<String> {
        let single = options.inline && !options.optimize;

        match self {
            ImageProperty::BackgroundImage | ImageProperty::Background => None,
            ImageProperty::BackgroundSize => Some(if single {
                size(image)
            } else {
                size(sprite)
            }),
            ImageProperty::BackgroundRepeat => Some("no-repeat".to_string()),
            ImageProperty::BackgroundPosition => Some(if single {
                "0 0".to_string()
            } else {
                format!("{} {}", offset(image.x), offset(image.y))
            }),
            ImageProperty::Width => Some(px(image.width)),
            ImageProperty::Height => Some(px(image.height)),
        }
    }
}

/// `"{w}px {h}px"`.
pub fn size(geometry: Geometry) -> String {
    format!("{} {}", px(geometry.width), px(geometry.height))
}

pub fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

/// Zero offsets are written unitless.
fn offset(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        px(value)
    }
}

/// Shortest decimal form: integral values drop the fraction and `-0` is `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
