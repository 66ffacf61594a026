//! CSS Sizing — used border-box size of a box along one axis.
//!
//! [Spec: CSS Box Sizing Module Level 3](https://www.w3.org/TR/css-sizing-3/)
//!
//! ```text
//! compute_element_size()
//!   1. Resolve the content-box size (specified, percentage or auto)
//!   2. Transform to border-box (apply box-sizing)
//!   3. Apply min/max constraints
//! ```
//!
//! Callers resolve lengths to pixels first; nothing here touches the DOM.

/// Dimension being sized (width or height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    /// The CSS property that specifies this dimension.
    #[inline]
    #[must_use]
    pub const fn property(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
        }
    }

    /// The physical sides whose padding and border add to this dimension.
    #[inline]
    #[must_use]
    pub const fn sides(self) -> [&'static str; 2] {
        match self {
            Self::Width => ["left", "right"],
            Self::Height => ["top", "bottom"],
        }
    }
}

/// `box-sizing` (CSS Box Sizing Level 3 §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxSizing {
    #[default]
    ContentBox,
    BorderBox,
}

impl BoxSizing {
    /// Parse the keyword; anything unknown is the initial value.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("border-box") {
            Self::BorderBox
        } else {
            Self::ContentBox
        }
    }
}

/// Source of content-box size for an element (CSS 2.2 §10.3, §10.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentSource {
    /// Explicitly specified size, already in pixels.
    Specified(f32),

    /// Percentage of the containing block, `percent` in 0.0..=1.0.
    Percentage { percent: f32, basis: f32 },

    /// Auto size computed by the caller (fill-available width, stacked height).
    Auto(f32),
}

impl ContentSource {
    /// Resolve to a content-box size in pixels.
    #[inline]
    pub fn resolve(self) -> f32 {
        match self {
            Self::Percentage { percent, basis } => basis * percent,
            Self::Specified(pixels) | Self::Auto(pixels) => pixels,
        }
    }
}

/// Everything needed to size a box along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingContext {
    pub content: ContentSource,

    pub box_sizing: BoxSizing,

    /// Sum of padding + border in this dimension (px)
    pub padding_border: f32,

    /// Minimum size constraint (border-box, px)
    pub min: Option<f32>,

    /// Maximum size constraint (border-box, px)
    pub max: Option<f32>,
}

/// Transform a specified size to border-box.
///
/// Under `border-box` the specified size already includes padding and
/// border, but never shrinks below them.
///
/// ```
/// # use css_sizing::{apply_box_sizing, BoxSizing};
/// assert_eq!(apply_box_sizing(100.0, BoxSizing::ContentBox, 20.0), 120.0);
/// assert_eq!(apply_box_sizing(100.0, BoxSizing::BorderBox, 20.0), 100.0);
/// assert_eq!(apply_box_sizing(10.0, BoxSizing::BorderBox, 20.0), 20.0);
/// ```
#[inline]
pub fn apply_box_sizing(content_size: f32, box_sizing: BoxSizing, padding_border: f32) -> f32 {
    match box_sizing {
        BoxSizing::ContentBox => content_size.max(0.0) + padding_border,
        BoxSizing::BorderBox => content_size.max(padding_border),
    }
}

/// Clamp a border-box size to its min/max (CSS 2.2 §10.4). Min wins over max.
#[inline]
pub fn apply_constraints(size: f32, min: Option<f32>, max: Option<f32>) -> f32 {
    let capped = max.map_or(size, |max_size| size.min(max_size));
    min.map_or(capped, |min_size| capped.max(min_size))
}

/// Compute the used border-box size in pixels.
///
/// `Auto` sources are content sizes computed by the caller, so `box-sizing`
/// does not apply to them.
///
/// ```
/// # use css_sizing::{SizingContext, ContentSource, BoxSizing, compute_element_size};
/// // width: 50%; padding: 10px; border: 5px inside a 400px container
/// let ctx = SizingContext {
///     content: ContentSource::Percentage { percent: 0.5, basis: 400.0 },
///     box_sizing: BoxSizing::ContentBox,
///     padding_border: 30.0,
///     min: None,
///     max: Some(200.0),
/// };
/// assert_eq!(compute_element_size(ctx), 200.0);
/// ```
#[inline]
pub fn compute_element_size(ctx: SizingContext) -> f32 {
    let box_sizing = match ctx.content {
        ContentSource::Auto(_) => BoxSizing::ContentBox,
        ContentSource::Specified(_) | ContentSource::Percentage { .. } => ctx.box_sizing,
    };
    let border_box_size = apply_box_sizing(ctx.content.resolve(), box_sizing, ctx.padding_border);
    apply_constraints(border_box_size, ctx.min, ctx.max)
}

/// Content-box size left over once padding and border are removed from a
/// border-box size.
#[inline]
pub fn content_box_size(border_box: f32, padding_border: f32) -> f32 {
    (border_box - padding_border).max(0.0)
}
