//! Used sizes and computed values for inline-styled elements.
//!
//! There is no cascade: an element's style is its inline declaration block,
//! with `font-size` inherited. Boxes are laid out as blocks stacked
//! vertically; `position: absolute` and `fixed` boxes are out of flow and
//! shrink to their content.

use css_sizing::{
    BoxSizing, ContentSource, Dimension, SizingContext, compute_element_size, content_box_size,
};
use css_values_units::{Length, LengthContext, LengthUnit, compute_length_px, parse_length_str};
use core::iter;
use indextree::NodeId;

use crate::Document;

/// The `position` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl Position {
    fn from_css(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "relative" | "sticky" => Self::Relative,
            "absolute" => Self::Absolute,
            "fixed" => Self::Fixed,
            _ => Self::Static,
        }
    }

    #[inline]
    const fn out_of_flow(self) -> bool {
        matches!(self, Self::Absolute | Self::Fixed)
    }
}

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

/// Pick one side out of a 1-4 value box shorthand.
fn shorthand_side<'value>(value: &'value str, side: &str) -> Option<&'value str> {
    let parts: Vec<&str> = value.split_ascii_whitespace().collect();
    let index = SIDES.iter().position(|&name| name == side)?;
    let pick = match (parts.len(), index) {
        (1, _) | (2 | 3, 0) | (2, 2) => 0,
        (2 | 3, 1 | 3) => 1,
        (3, 2) => 2,
        (4, _) => index,
        _ => return None,
    };
    parts.get(pick).copied()
}

fn format_px(value: f32) -> String {
    format!("{value}px")
}

fn parse_specified(value: &str) -> Option<Length> {
    parse_length_str(value).ok()
}

impl Document {
    fn viewport_size(&self, dim: Dimension) -> f32 {
        let viewport = self.environment().viewport;
        match dim {
            Dimension::Width => viewport.width_px as f32,
            Dimension::Height => viewport.height_px as f32,
        }
    }

    pub fn position(&self, node: NodeId) -> Position {
        self.style(node, "position")
            .map(Position::from_css)
            .unwrap_or_default()
    }

    /// True when the element or an ancestor has `display: none`.
    pub fn is_display_none(&self, node: NodeId) -> bool {
        iter::once(node)
            .chain(self.ancestors(node))
            .any(|each| {
                self.style(each, "display")
                    .is_some_and(|value| value.trim().eq_ignore_ascii_case("none"))
            })
    }

    /// Computed `font-size` in pixels, inherited from the nearest ancestor
    /// and defaulting to the root font size.
    pub fn font_size_px(&self, node: NodeId) -> f32 {
        let root_size = self.environment().root_font_size_px;
        let parent_size = self
            .parent_element(node)
            .map_or(root_size, |parent| self.font_size_px(parent));
        let Some(length) = self.style(node, "font-size").and_then(parse_specified) else {
            return parent_size;
        };
        let ctx = LengthContext {
            font_size_px: parent_size,
            root_font_size_px: root_size,
            viewport: self.environment().viewport,
            percent_basis_px: Some(parent_size),
        };
        compute_length_px(length, &ctx).unwrap_or(parent_size)
    }

    /// Resolve a length string for `node`; `em` uses the element's font size.
    pub fn length_px(&self, node: NodeId, value: &str, percent_basis: Option<f32>) -> Option<f32> {
        let length = parse_specified(value)?;
        let ctx = LengthContext {
            font_size_px: self.font_size_px(node),
            root_font_size_px: self.environment().root_font_size_px,
            viewport: self.environment().viewport,
            percent_basis_px: percent_basis,
        };
        compute_length_px(length, &ctx)
    }

    /// Content size of the containing block along `dim`, `None` when it is
    /// not definite (an auto-height parent).
    pub fn containing_block(&self, node: NodeId, dim: Dimension) -> Option<f32> {
        match self.position(node) {
            Position::Fixed => Some(self.viewport_size(dim)),
            Position::Absolute => {
                let positioned = self
                    .ancestors(node)
                    .into_iter()
                    .filter(|&ancestor| self.is_element(ancestor))
                    .find(|&ancestor| self.position(ancestor) != Position::Static);
                Some(positioned.map_or_else(
                    || self.viewport_size(dim),
                    |ancestor| {
                        let borders: f32 = dim
                            .sides()
                            .iter()
                            .map(|side| self.border_width(ancestor, side))
                            .sum();
                        content_box_size(self.measure(ancestor, dim), borders)
                    },
                ))
            }
            Position::Static | Position::Relative => {
                let Some(parent) = self.parent_element(node) else {
                    return Some(self.viewport_size(dim));
                };
                if dim == Dimension::Height && self.specified_content(parent, dim).is_none() {
                    return None;
                }
                Some(content_box_size(
                    self.measure(parent, dim),
                    self.padding_border(parent, dim),
                ))
            }
        }
    }

    /// The specified size as a content source, `None` for `auto`, unset or
    /// unresolvable percentages.
    fn specified_content(&self, node: NodeId, dim: Dimension) -> Option<ContentSource> {
        let length = self.style(node, dim.property()).and_then(parse_specified)?;
        if length.unit == LengthUnit::Percent {
            let basis = self.containing_block(node, dim)?;
            return Some(ContentSource::Percentage {
                percent: length.value / 100.0,
                basis,
            });
        }
        let ctx = LengthContext {
            font_size_px: self.font_size_px(node),
            root_font_size_px: self.environment().root_font_size_px,
            viewport: self.environment().viewport,
            percent_basis_px: None,
        };
        compute_length_px(length, &ctx).map(ContentSource::Specified)
    }

    /// Like [`Self::length_px`], looking up the containing block only for percentages.
    fn length_px_along(&self, node: NodeId, value: &str, dim: Dimension) -> Option<f32> {
        let length = parse_specified(value)?;
        let basis = if length.unit == LengthUnit::Percent {
            self.containing_block(node, dim)
        } else {
            None
        };
        self.length_px(node, value, basis)
    }

    /// One side of a box edge (`margin`/`padding`), longhand before shorthand.
    fn edge_value(&self, node: NodeId, edge: &str, side: &str) -> Option<&str> {
        self.style(node, &format!("{edge}-{side}"))
            .or_else(|| self.style(node, edge).and_then(|value| shorthand_side(value, side)))
    }

    /// Percentages on every side refer to the containing block width.
    fn edge_px(&self, node: NodeId, edge: &str, side: &str) -> f32 {
        self.edge_value(node, edge, side)
            .and_then(|value| self.length_px_along(node, value, Dimension::Width))
            .unwrap_or(0.0)
    }

    /// Border width of one side from `border-<side>-width`, `border-width`,
    /// `border-<side>` or `border`.
    pub fn border_width(&self, node: NodeId, side: &str) -> f32 {
        let longhand = self
            .style(node, &format!("border-{side}-width"))
            .or_else(|| {
                self.style(node, "border-width")
                    .and_then(|value| shorthand_side(value, side))
            });
        if let Some(value) = longhand {
            return self.length_px(node, value, None).unwrap_or(0.0);
        }
        self.style(node, &format!("border-{side}"))
            .or_else(|| self.style(node, "border"))
            .and_then(|value| {
                value
                    .split_ascii_whitespace()
                    .find_map(|part| self.length_px(node, part, None))
            })
            .unwrap_or(0.0)
    }

    /// Padding plus border along `dim`.
    pub fn padding_border(&self, node: NodeId, dim: Dimension) -> f32 {
        dim.sides()
            .iter()
            .map(|side| self.edge_px(node, "padding", side) + self.border_width(node, side))
            .sum()
    }

    fn margin_sum(&self, node: NodeId, dim: Dimension) -> f32 {
        dim.sides()
            .iter()
            .map(|side| self.edge_px(node, "margin", side))
            .sum()
    }

    fn constraint(&self, node: NodeId, property: &str, dim: Dimension) -> Option<f32> {
        self.style(node, property)
            .and_then(|value| self.length_px_along(node, value, dim))
    }

    fn auto_content(&self, node: NodeId, dim: Dimension, padding_border: f32) -> f32 {
        if self.position(node).out_of_flow() && dim == Dimension::Width {
            return 0.0;
        }
        match dim {
            Dimension::Width => {
                let available = self
                    .containing_block(node, dim)
                    .unwrap_or_else(|| self.viewport_size(dim));
                (available - self.margin_sum(node, dim) - padding_border).max(0.0)
            }
            Dimension::Height => self
                .children(node)
                .into_iter()
                .filter(|&child| self.is_element(child) && !self.position(child).out_of_flow())
                .map(|child| self.measure(child, dim) + self.margin_sum(child, dim))
                .sum(),
        }
    }

    /// Rendered border-box size along `dim`, the `offsetWidth` /
    /// `offsetHeight` analogue. Detached and `display: none` elements
    /// measure zero.
    pub fn measure(&self, node: NodeId, dim: Dimension) -> f32 {
        if !self.is_element(node) || !self.is_attached(node) || self.is_display_none(node) {
            return 0.0;
        }
        let padding_border = self.padding_border(node, dim);
        let content = self
            .specified_content(node, dim)
            .unwrap_or_else(|| ContentSource::Auto(self.auto_content(node, dim, padding_border)));
        let (min_name, max_name) = match dim {
            Dimension::Width => ("min-width", "max-width"),
            Dimension::Height => ("min-height", "max-height"),
        };
        compute_element_size(SizingContext {
            content,
            box_sizing: BoxSizing::from_css(self.style(node, "box-sizing").unwrap_or_default()),
            padding_border,
            min: self.constraint(node, min_name, dim),
            max: self.constraint(node, max_name, dim),
        })
    }

    /// Computed value of `property`, the `getComputedStyle` analogue.
    ///
    /// Widths and heights report the used size in the element's box-sizing
    /// box; `font-size` reports the inherited pixel size. Other relative
    /// lengths resolve to pixels when a basis exists. Unset box offsets,
    /// margins, paddings and border widths read as `0px`, `max-*` as `none`.
    pub fn computed_style(&self, node: NodeId, property: &str) -> String {
        let name = property.trim().to_ascii_lowercase();
        match name.as_str() {
            "width" | "height" => {
                let dim = if name == "width" {
                    Dimension::Width
                } else {
                    Dimension::Height
                };
                if !self.is_attached(node) {
                    return self
                        .style(node, &name)
                        .map_or_else(|| String::from("auto"), str::to_owned);
                }
                let border_box = self.measure(node, dim);
                let box_sizing =
                    BoxSizing::from_css(self.style(node, "box-sizing").unwrap_or_default());
                match box_sizing {
                    BoxSizing::BorderBox => format_px(border_box),
                    BoxSizing::ContentBox => format_px(content_box_size(
                        border_box,
                        self.padding_border(node, dim),
                    )),
                }
            }
            "font-size" => format_px(self.font_size_px(node)),
            _ => self.style(node, &name).map_or_else(
                || default_computed(&name),
                |value| self.resolve_inline(node, &name, value),
            ),
        }
    }

    fn resolve_inline(&self, node: NodeId, name: &str, value: &str) -> String {
        let Some(length) = parse_specified(value) else {
            return value.to_owned();
        };
        if length.unit == LengthUnit::Pixels {
            return value.to_owned();
        }
        let vertical = !name.starts_with("margin")
            && !name.starts_with("padding")
            && (name.contains("height") || name.ends_with("top") || name.ends_with("bottom"));
        let dim = if vertical {
            Dimension::Height
        } else {
            Dimension::Width
        };
        self.length_px_along(node, value, dim)
            .map_or_else(|| value.to_owned(), format_px)
    }
}

fn default_computed(name: &str) -> String {
    let zero = SIDES.contains(&name)
        || name.starts_with("margin")
        || name.starts_with("padding")
        || name.starts_with("min-")
        || (name.starts_with("border") && name.ends_with("width"))
        || name.ends_with("spacing")
        || name == "text-indent";
    if name.starts_with("max-") {
        String::from("none")
    } else if zero {
        format_px(0.0)
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_sides_follow_css_order() {
        assert_eq!(shorthand_side("1px", "left"), Some("1px"));
        assert_eq!(shorthand_side("1px 2px", "left"), Some("2px"));
        assert_eq!(shorthand_side("1px 2px", "bottom"), Some("1px"));
        assert_eq!(shorthand_side("1px 2px 3px", "bottom"), Some("3px"));
        assert_eq!(shorthand_side("1px 2px 3px", "left"), Some("2px"));
        assert_eq!(shorthand_side("1px 2px 3px 4px", "left"), Some("4px"));
    }

    #[test]
    fn unset_defaults() {
        assert_eq!(default_computed("top"), "0px");
        assert_eq!(default_computed("margin-left"), "0px");
        assert_eq!(default_computed("border-top-width"), "0px");
        assert_eq!(default_computed("max-width"), "none");
        assert_eq!(default_computed("color"), "");
    }
}
