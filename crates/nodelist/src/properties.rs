//! Which CSS properties can be animated, and how they are addressed.
//!
//! Classification is a static rule table: a property is a simple numeric
//! length when any rule matches its name. Adding a property is a table edit.

use html::Dimension;

use crate::config::StyleFlavor;

/// Measurement axis of a length property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[must_use]
    pub const fn dimension(self) -> Dimension {
        match self {
            Self::X => Dimension::Width,
            Self::Y => Dimension::Height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// A single length, e.g. `width` or `margin-left`.
    Simple(Axis),
    /// Several lengths rendered through one template. Recognized but not
    /// animatable yet.
    Templated {
        template: &'static str,
        round: bool,
        allow_negative: bool,
    },
    Unsupported,
}

#[derive(Clone, Copy)]
enum Rule {
    Contains(&'static str),
    EndsWith(&'static str),
}

impl Rule {
    fn matches(self, name: &str) -> bool {
        match self {
            Self::Contains(text) => name.contains(text),
            Self::EndsWith(text) => name.ends_with(text),
        }
    }
}

const SIMPLE_RULES: [Rule; 9] = [
    Rule::Contains("width"),
    Rule::Contains("height"),
    Rule::Contains("font-size"),
    Rule::EndsWith("top"),
    Rule::EndsWith("bottom"),
    Rule::EndsWith("left"),
    Rule::EndsWith("right"),
    Rule::EndsWith("spacing"),
    Rule::EndsWith("indent"),
];

const Y_AXIS_RULES: [Rule; 2] = [Rule::Contains("height"), Rule::Contains("top")];

const TEMPLATED: [(&str, PropertyKind); 1] = [(
    "background-position",
    PropertyKind::Templated {
        template: "?u1 ?u2",
        round: true,
        allow_negative: true,
    },
)];

impl PropertyKind {
    /// Classify a hyphenated property name (case-insensitive).
    pub fn classify(property: &str) -> Self {
        let name = property.trim().to_ascii_lowercase();
        if let Some(&(_, kind)) = TEMPLATED.iter().find(|(templated, _)| *templated == name) {
            return kind;
        }
        if !SIMPLE_RULES.iter().any(|rule| rule.matches(&name)) {
            return Self::Unsupported;
        }
        if Y_AXIS_RULES.iter().any(|rule| rule.matches(&name)) {
            Self::Simple(Axis::Y)
        } else {
            Self::Simple(Axis::X)
        }
    }
}

/// Style accessor for a hyphenated property: `margin-left` becomes
/// `marginLeft`, `float` becomes `cssFloat` or `styleFloat`. A vendor prefix
/// keeps its capital: `-webkit-text-stroke-width` becomes
/// `WebkitTextStrokeWidth`.
pub fn to_style_accessor(property: &str, flavor: StyleFlavor) -> String {
    let name = property.trim().to_ascii_lowercase();
    if name == "float" {
        return match flavor {
            StyleFlavor::Standard => String::from("cssFloat"),
            StyleFlavor::Legacy => String::from("styleFloat"),
        };
    }
    let mut accessor = String::with_capacity(name.len());
    let mut upper_next = false;
    for character in name.chars() {
        if character == '-' {
            upper_next = true;
        } else if upper_next {
            accessor.push(character.to_ascii_uppercase());
            upper_next = false;
        } else {
            accessor.push(character);
        }
    }
    accessor
}
