//! CSS selector parsing on top of the `cssparser` tokenizer.
//! Spec: <https://www.w3.org/TR/selectors-3/>

use crate::{
    AttrOperator, Combinator, ComplexSelector, CompoundSelector, SelectorList, SelectorParseError,
    SimpleSelector,
};
use core::mem::{replace, take};
use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, Token};

/// Accumulates compounds and combinators for one complex selector.
///
/// A combinator is only committed once the next simple selector arrives, so
/// whitespace around `>`/`+`/`~` and trailing whitespace need no lookahead.
#[derive(Default)]
struct ComplexBuilder {
    first: Option<CompoundSelector>,
    rest: Vec<(Combinator, CompoundSelector)>,
    current: CompoundSelector,
    /// Combinator linking `current` to the previous compound.
    incoming: Option<Combinator>,
    /// Combinator seen after `current`, not yet followed by a compound.
    pending: Option<Combinator>,
}

impl ComplexBuilder {
    fn whitespace(&mut self) {
        if !self.current.simples.is_empty() && self.pending.is_none() {
            self.pending = Some(Combinator::Descendant);
        }
    }

    fn combinator(&mut self, combinator: Combinator) -> Result<(), SelectorParseError> {
        if self.current.simples.is_empty() {
            return Err(SelectorParseError::DanglingCombinator);
        }
        match self.pending {
            None | Some(Combinator::Descendant) => {
                self.pending = Some(combinator);
                Ok(())
            }
            Some(_) => Err(SelectorParseError::DanglingCombinator),
        }
    }

    fn simple(&mut self, simple: SimpleSelector) {
        if let Some(combinator) = self.pending.take() {
            let done = take(&mut self.current);
            let link = replace(&mut self.incoming, Some(combinator));
            self.close(link, done);
        }
        self.current.simples.push(simple);
    }

    fn close(&mut self, link: Option<Combinator>, compound: CompoundSelector) {
        match (self.first.is_none(), link) {
            (true, _) => self.first = Some(compound),
            (false, link_kind) => self
                .rest
                .push((link_kind.unwrap_or(Combinator::Descendant), compound)),
        }
    }

    fn finish(&mut self) -> Result<ComplexSelector, SelectorParseError> {
        if self.current.simples.is_empty() {
            return Err(SelectorParseError::Empty);
        }
        if matches!(self.pending, Some(combinator) if combinator != Combinator::Descendant) {
            return Err(SelectorParseError::DanglingCombinator);
        }
        let mut builder = take(self);
        let last = take(&mut builder.current);
        builder.close(builder.incoming, last);
        Ok(ComplexSelector {
            first: builder.first.unwrap_or_default(),
            rest: builder.rest,
        })
    }
}

/// Parse a selector list from CSS text.
/// Spec: Section 3, 4, 5–8, 11
///
/// # Errors
/// Returns a [`SelectorParseError`] for empty groups, dangling combinators,
/// unsupported pseudo-classes and tokens outside the supported grammar.
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorParseError> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    let mut list = SelectorList::default();
    let mut builder = ComplexBuilder::default();

    while let Ok(token) = parser.next_including_whitespace() {
        match token.clone() {
            Token::WhiteSpace(_) => builder.whitespace(),
            Token::Comma => list.selectors.push(builder.finish()?),
            Token::Delim('>') => builder.combinator(Combinator::Child)?,
            Token::Delim('+') => builder.combinator(Combinator::AdjacentSibling)?,
            Token::Delim('~') => builder.combinator(Combinator::GeneralSibling)?,
            Token::Delim('*') => builder.simple(SimpleSelector::Universal),
            Token::Delim('.') => {
                let class = next_ident(&mut parser)?;
                builder.simple(SimpleSelector::Class(class));
            }
            Token::Ident(tag) => builder.simple(SimpleSelector::Type(tag.to_ascii_lowercase())),
            Token::IDHash(id) => builder.simple(SimpleSelector::IdSelector(id.to_string())),
            Token::Colon => {
                let pseudo = next_ident(&mut parser)?;
                builder.simple(pseudo_class(&pseudo)?);
            }
            Token::SquareBracketBlock => {
                let attribute = parser
                    .parse_nested_block(parse_attribute)
                    .map_err(|err: ParseError<'_, SelectorParseError>| match err.kind {
                        ParseErrorKind::Custom(inner) => inner,
                        ParseErrorKind::Basic(_) => SelectorParseError::BadAttribute,
                    })?;
                builder.simple(attribute);
            }
            other => return Err(SelectorParseError::UnexpectedToken(format!("{other:?}"))),
        }
    }

    list.selectors.push(builder.finish()?);
    Ok(list)
}

/// The identifier directly after `.` or `:`; whitespace in between is an error.
fn next_ident(parser: &mut Parser<'_, '_>) -> Result<String, SelectorParseError> {
    match parser.next_including_whitespace() {
        Ok(Token::Ident(name)) => Ok(name.to_string()),
        Ok(other) => Err(SelectorParseError::UnexpectedToken(format!("{other:?}"))),
        Err(_) => Err(SelectorParseError::Empty),
    }
}

fn pseudo_class(name: &str) -> Result<SimpleSelector, SelectorParseError> {
    match name.to_ascii_lowercase().as_str() {
        "first-child" => Ok(SimpleSelector::FirstChild),
        "last-child" => Ok(SimpleSelector::LastChild),
        _ => Err(SelectorParseError::UnsupportedPseudoClass(name.to_owned())),
    }
}

/// Contents of `[...]`: `name`, or `name <op> value` with an ident or string value.
fn parse_attribute<'i>(
    block: &mut Parser<'i, '_>,
) -> Result<SimpleSelector, ParseError<'i, SelectorParseError>> {
    let name = block.expect_ident()?.to_ascii_lowercase();
    if block.is_exhausted() {
        return Ok(SimpleSelector::Attribute {
            name,
            operator: AttrOperator::Exists,
            value: String::new(),
        });
    }
    let operator = match block.next()?.clone() {
        Token::Delim('=') => AttrOperator::Equals,
        Token::IncludeMatch => AttrOperator::Includes,
        Token::DashMatch => AttrOperator::DashMatch,
        Token::PrefixMatch => AttrOperator::Prefix,
        Token::SuffixMatch => AttrOperator::Suffix,
        Token::SubstringMatch => AttrOperator::Substring,
        _ => return Err(block.new_custom_error(SelectorParseError::BadAttribute)),
    };
    let value = match block.next()?.clone() {
        Token::Ident(text) | Token::QuotedString(text) => text.to_string(),
        _ => return Err(block.new_custom_error(SelectorParseError::BadAttribute)),
    };
    block.expect_exhausted()?;
    Ok(SimpleSelector::Attribute {
        name,
        operator,
        value,
    })
}
