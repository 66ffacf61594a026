//! CSS Values and Units Module Level 3 — numeric values with units.
//! Spec: <https://www.w3.org/TR/css-values-3/>
//!
//! Inline style values arrive as raw strings such as `"20"`, `"50%"` or
//! `"1.5em"`. This crate tokenizes them with `cssparser` into a [`Length`]
//! and resolves lengths to pixels against a [`LengthContext`].

#![forbid(unsafe_code)]

pub mod chapter_5_percentages;
pub mod chapter_6_dimensions;

pub use chapter_5_percentages::{Percentage, parse_percentage};
pub use chapter_6_dimensions::{
    Length, LengthContext, LengthUnit, Viewport, compute_length_px, parse_length,
    parse_length_str,
};

/// Parse error for Values & Units parsing utilities in this crate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The next token did not match the expected grammar.
    #[error("unexpected token in numeric value")]
    UnexpectedToken,
    /// A dimension carried a unit this crate does not know.
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
    /// Tokens remained after a complete value was read.
    #[error("trailing input after value")]
    TrailingInput,
}
