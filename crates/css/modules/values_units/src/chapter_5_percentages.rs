//! CSS Values & Units Level 3 — §5 Percentages
//! Spec: <https://www.w3.org/TR/css-values-3/#percentages>

use crate::ParseError;
use cssparser::{Parser, Token};

/// A CSS <percentage>
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Percentage(pub f32); // stored as 0.0..=1.0

impl Percentage {
    /// Resolve against a reference length in pixels (§5.1.1).
    #[inline]
    #[must_use]
    pub fn resolve(self, basis_px: f32) -> f32 {
        basis_px * self.0
    }
}

/// Parse a CSS <percentage> (§5.1).
///
/// # Errors
/// Returns `ParseError::UnexpectedToken` when the next token is not a `<percentage>`.
pub fn parse_percentage(input: &mut Parser) -> Result<Percentage, ParseError> {
    if let Ok(token) = input.next()
        && let Token::Percentage { unit_value, .. } = token.clone()
    {
        return Ok(Percentage(unit_value));
    }
    Err(ParseError::UnexpectedToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssparser::ParserInput;

    #[test]
    fn percentage_resolves_against_basis() -> Result<(), ParseError> {
        let mut input = ParserInput::new("25%");
        let mut parser = Parser::new(&mut input);
        let pct = parse_percentage(&mut parser)?;
        assert_eq!(pct, Percentage(0.25));
        assert!((pct.resolve(400.0) - 100.0).abs() < f32::EPSILON);
        Ok(())
    }
}
