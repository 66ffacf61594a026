//! CSS Values & Units Level 3 — §6 Dimensions (Lengths)
//! Spec: <https://www.w3.org/TR/css-values-3/#lengths>

use core::fmt;

use crate::{ParseError, Percentage};
use cssparser::{Parser, ParserInput, Token};

/// Length units understood by the resolver, plus `%` so a value and its unit
/// can be carried together before the percentage basis is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Pixels,
    Ems,
    RootEms,
    /// `ex`, approximated as half an em.
    XHeight,
    /// `ch`, approximated as half an em.
    ZeroAdvance,
    Percent,
    Points,
    Picas,
    Inches,
    Centimeters,
    Millimeters,
    ViewportWidth,
    ViewportHeight,
    ViewportMin,
    ViewportMax,
}

impl LengthUnit {
    /// Map a unit suffix (case-insensitive) to a unit.
    #[must_use]
    pub fn from_css(unit: &str) -> Option<Self> {
        let unit_kind = match unit.to_ascii_lowercase().as_str() {
            "px" => Self::Pixels,
            "em" => Self::Ems,
            "rem" => Self::RootEms,
            "ex" => Self::XHeight,
            "ch" => Self::ZeroAdvance,
            "%" => Self::Percent,
            "pt" => Self::Points,
            "pc" => Self::Picas,
            "in" => Self::Inches,
            "cm" => Self::Centimeters,
            "mm" => Self::Millimeters,
            "vw" => Self::ViewportWidth,
            "vh" => Self::ViewportHeight,
            "vmin" => Self::ViewportMin,
            "vmax" => Self::ViewportMax,
            _ => return None,
        };
        Some(unit_kind)
    }

    /// The canonical suffix used when serializing.
    #[inline]
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Pixels => "px",
            Self::Ems => "em",
            Self::RootEms => "rem",
            Self::XHeight => "ex",
            Self::ZeroAdvance => "ch",
            Self::Percent => "%",
            Self::Points => "pt",
            Self::Picas => "pc",
            Self::Inches => "in",
            Self::Centimeters => "cm",
            Self::Millimeters => "mm",
            Self::ViewportWidth => "vw",
            Self::ViewportHeight => "vh",
            Self::ViewportMin => "vmin",
            Self::ViewportMax => "vmax",
        }
    }

    /// Pixels per unit for the absolute units (§6.2), `None` otherwise.
    #[inline]
    #[must_use]
    pub const fn absolute_px(self) -> Option<f32> {
        match self {
            Self::Pixels => Some(1.0),
            Self::Inches => Some(96.0),
            Self::Centimeters => Some(96.0 / 2.54),
            Self::Millimeters => Some(96.0 / 25.4),
            Self::Points => Some(96.0 / 72.0),
            Self::Picas => Some(16.0),
            Self::Ems
            | Self::RootEms
            | Self::XHeight
            | Self::ZeroAdvance
            | Self::Percent
            | Self::ViewportWidth
            | Self::ViewportHeight
            | Self::ViewportMin
            | Self::ViewportMax => None,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_css())
    }
}

/// A CSS <length> or <length-percentage> value with unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    #[inline]
    #[must_use]
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Pixels,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}{}", self.value, self.unit)
    }
}

/// Viewport metrics used to evaluate viewport-relative units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
}

/// Everything a relative length needs to become pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LengthContext {
    /// Computed font size of the element the value applies to.
    pub font_size_px: f32,
    pub root_font_size_px: f32,
    pub viewport: Viewport,
    /// Reference length for `%`; `None` when the percentage cannot resolve.
    pub percent_basis_px: Option<f32>,
}

/// Compute the pixel value for a given `Length` using the current environment.
///
/// Returns `None` only for a percentage without a basis.
#[must_use]
pub fn compute_length_px(length: Length, ctx: &LengthContext) -> Option<f32> {
    if let Some(scale) = length.unit.absolute_px() {
        return Some(length.value * scale);
    }
    let width = ctx.viewport.width_px as f32;
    let height = ctx.viewport.height_px as f32;
    let px = match length.unit {
        LengthUnit::Ems => length.value * ctx.font_size_px,
        LengthUnit::RootEms => length.value * ctx.root_font_size_px,
        LengthUnit::XHeight | LengthUnit::ZeroAdvance => length.value * ctx.font_size_px * 0.5,
        LengthUnit::Percent => Percentage(length.value / 100.0).resolve(ctx.percent_basis_px?),
        LengthUnit::ViewportWidth => length.value * width / 100.0,
        LengthUnit::ViewportHeight => length.value * height / 100.0,
        LengthUnit::ViewportMin => length.value * width.min(height) / 100.0,
        LengthUnit::ViewportMax => length.value * width.max(height) / 100.0,
        LengthUnit::Pixels
        | LengthUnit::Inches
        | LengthUnit::Centimeters
        | LengthUnit::Millimeters
        | LengthUnit::Points
        | LengthUnit::Picas => length.value,
    };
    Some(px)
}

/// Parse a numeric value (§6.2): a dimension, a percentage, or a bare number
/// which is taken as pixels.
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` for non-numeric tokens and
/// `ParseError::UnknownUnit` for dimensions with an unsupported unit.
pub fn parse_length(input: &mut Parser) -> Result<Length, ParseError> {
    input.skip_whitespace();
    let start = input.position();
    let token = input
        .next()
        .map_err(|_| ParseError::UnexpectedToken)?
        .clone();
    match token {
        Token::Dimension { value, unit, .. } => LengthUnit::from_css(unit.as_ref())
            .map(|unit_kind| Length {
                value,
                unit: unit_kind,
            })
            .ok_or_else(|| ParseError::UnknownUnit(unit.as_ref().to_owned())),
        Token::Number { value, .. } => Ok(Length::px(value)),
        Token::Percentage { unit_value, .. } => Ok(Length {
            value: percent_literal(input.slice_from(start))
                .unwrap_or_else(|| (f64::from(unit_value) * 100.0) as f32),
            unit: LengthUnit::Percent,
        }),
        _ => Err(ParseError::UnexpectedToken),
    }
}

/// The written number of a percentage token, so `0.7%` yields exactly `0.7`
/// rather than its fraction scaled back up.
fn percent_literal(source: &str) -> Option<f32> {
    source.trim().strip_suffix('%')?.parse().ok()
}

/// Parse a complete value string such as `"12.5em"`.
///
/// # Errors
/// Propagates [`parse_length`] errors and returns `ParseError::TrailingInput`
/// when anything but whitespace follows the value.
pub fn parse_length_str(text: &str) -> Result<Length, ParseError> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let length = parse_length(&mut parser)?;
    if parser.is_exhausted() {
        Ok(length)
    } else {
        Err(ParseError::TrailingInput)
    }
}
