//! CSS Style Attributes — the declaration block behind `style="..."`.
//! Spec: <https://www.w3.org/TR/css-style-attr/>
//!
//! Elements keep their inline declarations in source order. Script-style
//! accessor names (`marginLeft`, `cssFloat`) map back to property names here.

#![forbid(unsafe_code)]

use core::fmt;

use smallvec::SmallVec;

/// A single CSS declaration parsed from a style attribute.
///
/// Spec: <https://www.w3.org/TR/css-style-attr/#interpreting>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name normalized to ASCII lowercase as per CSS case-insensitivity.
    pub property: String,
    /// Raw value trimmed of surrounding ASCII whitespace. May contain spaces.
    pub value: String,
}

/// Parse the value of a `style` attribute into a list of declarations.
///
/// Items without a colon, or with an empty property or value, are skipped.
///
/// Spec: <https://www.w3.org/TR/css-style-attr/#interpreting>
pub fn parse_style_attribute(input: &str) -> Vec<Declaration> {
    input
        .split(';')
        .filter_map(|raw_item| {
            let (raw_prop, raw_value) = raw_item.split_once(':')?;
            let property_text = raw_prop.trim_matches(is_ascii_whitespace);
            let value_text = raw_value.trim_matches(is_ascii_whitespace);
            (!property_text.is_empty() && !value_text.is_empty()).then(|| Declaration {
                property: property_text.to_ascii_lowercase(),
                value: value_text.to_owned(),
            })
        })
        .collect()
}

/// ASCII whitespace per CSS Syntax (TAB, LF, FF, CR, SPACE).
///
/// Spec: <https://www.w3.org/TR/css-syntax-3/#whitespace>
const fn is_ascii_whitespace(character: char) -> bool {
    matches!(
        character,
        '\u{0009}' | '\u{000A}' | '\u{000C}' | '\u{000D}' | '\u{0020}'
    )
}

/// An element's inline declaration block. Later declarations of the same
/// property replace earlier ones in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: SmallVec<Declaration, 4>,
}

impl InlineStyle {
    /// Build a block from attribute text, last occurrence of a property winning.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut style = Self::default();
        for decl in parse_style_attribute(input) {
            style.set(&decl.property, &decl.value);
        }
        style
    }

    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        let wanted = property.to_ascii_lowercase();
        self.declarations
            .iter()
            .find(|decl| decl.property == wanted)
            .map(|decl| decl.value.as_str())
    }

    /// Set a declaration; an empty value removes it, as assigning `""` to a
    /// style accessor does.
    pub fn set(&mut self, property: &str, value: &str) {
        let property_name = property.trim().to_ascii_lowercase();
        let value_text = value.trim();
        if value_text.is_empty() {
            self.remove(&property_name);
            return;
        }
        if let Some(existing) = self
            .declarations
            .iter_mut()
            .find(|decl| decl.property == property_name)
        {
            value_text.clone_into(&mut existing.value);
        } else {
            self.declarations.push(Declaration {
                property: property_name,
                value: value_text.to_owned(),
            });
        }
    }

    /// Remove a declaration, returning its old value.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let wanted = property.to_ascii_lowercase();
        let index = self
            .declarations
            .iter()
            .position(|decl| decl.property == wanted)?;
        Some(self.declarations.remove(index).value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for InlineStyle {
    /// Serializes as `prop: value; prop: value`.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, decl) in self.declarations.iter().enumerate() {
            if index > 0 {
                formatter.write_str("; ")?;
            }
            write!(formatter, "{}: {}", decl.property, decl.value)?;
        }
        Ok(())
    }
}

/// Map a style accessor name back to its CSS property.
///
/// `marginLeft` becomes `margin-left`; both `cssFloat` and `styleFloat`
/// become `float`. A leading capital marks a vendor prefix, so
/// `WebkitTextStrokeWidth` becomes `-webkit-text-stroke-width`. Hyphenated
/// names pass through lowercased.
pub fn property_from_accessor(accessor: &str) -> String {
    if accessor == "cssFloat" || accessor == "styleFloat" {
        return String::from("float");
    }
    let mut out = String::with_capacity(accessor.len() + 4);
    for character in accessor.chars() {
        if character.is_ascii_uppercase() {
            out.push('-');
            out.push(character.to_ascii_lowercase());
        } else {
            out.push(character);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_invalid_items() {
        let decls = parse_style_attribute(" width : 10px ;; color ; :red; top:");
        assert_eq!(
            decls,
            vec![Declaration {
                property: "width".into(),
                value: "10px".into()
            }]
        );
    }

    #[test]
    fn last_declaration_wins_in_place() {
        let style = InlineStyle::parse("Width: 1px; top: 0; width: 2px");
        assert_eq!(style.get("width"), Some("2px"));
        assert_eq!(style.to_string(), "width: 2px; top: 0");
    }

    #[test]
    fn empty_value_removes() {
        let mut style = InlineStyle::parse("position:absolute;visibility:hidden");
        style.set("position", "");
        assert_eq!(style.get("position"), None);
        assert_eq!(style.to_string(), "visibility: hidden");
    }

    #[test]
    fn accessor_names_map_to_properties() {
        assert_eq!(property_from_accessor("marginLeft"), "margin-left");
        assert_eq!(property_from_accessor("borderTopWidth"), "border-top-width");
        assert_eq!(property_from_accessor("cssFloat"), "float");
        assert_eq!(property_from_accessor("styleFloat"), "float");
        assert_eq!(property_from_accessor("top"), "top");
        assert_eq!(property_from_accessor("WebkitTextStrokeWidth"), "-webkit-text-stroke-width");
        assert_eq!(property_from_accessor("MozTabSize"), "-moz-tab-size");
    }
}
