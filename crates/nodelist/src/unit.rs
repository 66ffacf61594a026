//! Unit resolution for animated properties.
//!
//! Values in different units are reconciled by measuring: a hidden probe is
//! placed next to the element, sized once in the source unit and once as
//! ten target units, and the ratio of the two measurements is the converted
//! value. Only the `from` side is ever converted, into the unit of `to`.

use anim::{PropSpec, Template};
use css_values_units::{Length, LengthUnit, parse_length_str};
use html::NodeId;
use log::{debug, warn};

use crate::page::Page;
use crate::properties::{Axis, PropertyKind, to_style_accessor};
use crate::NodeListError;

const PROBE_STYLE: &str = "position:absolute;visibility:hidden;border:0;margin:0;padding:0";

/// A property ready to animate: numeric endpoints in one unit.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDescriptor {
    pub property: String,
    pub accessor: String,
    /// `from` as given, or the computed style when none was.
    pub raw_from: String,
    pub raw_to: String,
    pub from: f32,
    pub to: f32,
    pub unit: LengthUnit,
    /// Pixel values animate in whole pixels.
    pub round: bool,
    pub template: Template,
}

impl PropertyDescriptor {
    pub fn prop_spec(&self) -> PropSpec {
        PropSpec::new(self.template.clone(), self.from, self.to).rounded(self.round)
    }
}

/// Resolve `property` on `element` from `from` (default: its computed value)
/// to `to`.
///
/// # Errors
/// `UnsupportedProperty` for anything but simple lengths, `InvalidValue` for
/// values that aren't lengths, `ProbeBusy` when a conversion is already
/// running.
pub fn resolve_property(
    page: &Page,
    element: NodeId,
    property: &str,
    from: Option<&str>,
    to: &str,
) -> Result<PropertyDescriptor, NodeListError> {
    let PropertyKind::Simple(axis) = PropertyKind::classify(property) else {
        return Err(NodeListError::UnsupportedProperty(property.to_owned()));
    };
    let raw_from = from.map_or_else(
        || page.document().borrow().computed_style(element, property),
        str::to_owned,
    );
    let target = parse_value(property, to)?;
    let source = parse_value(property, &raw_from)?;
    let from_value = if source.unit == target.unit {
        source.value
    } else {
        convert_units(page, element, source, target.unit, axis)?
    };
    Ok(PropertyDescriptor {
        property: property.to_owned(),
        accessor: to_style_accessor(property, page.config().style_flavor),
        raw_from,
        raw_to: to.to_owned(),
        from: from_value,
        to: target.value,
        unit: target.unit,
        round: target.unit == LengthUnit::Pixels,
        template: Template::with_unit(target.unit.as_css()),
    })
}

fn parse_value(property: &str, raw: &str) -> Result<Length, NodeListError> {
    parse_length_str(raw).map_err(|err| NodeListError::InvalidValue {
        property: property.to_owned(),
        value: raw.to_owned(),
        reason: err.to_string(),
    })
}

/// Express `value` in `target` units as measured next to `element`.
///
/// A detached element measures zero, so the result is NaN or infinite; that
/// is logged, not rejected.
///
/// # Errors
/// `ProbeBusy` on re-entry, or a DOM error if the probe can't be placed.
pub fn convert_units(
    page: &Page,
    element: NodeId,
    value: Length,
    target: LengthUnit,
    axis: Axis,
) -> Result<f32, NodeListError> {
    let guard = ProbeGuard::acquire(page, element)?;
    let source_px = guard.measure(value, axis)?;
    let unit_px = guard.measure(
        Length {
            value: 10.0,
            unit: target,
        },
        axis,
    )? / 10.0;
    drop(guard);

    let converted = source_px / unit_px;
    if converted.is_finite() {
        debug!(target: "nodelist::unit", "{value} = {converted}{target} ({axis:?}) next to {element:?}");
    } else {
        warn!(target: "nodelist::unit", "{value} -> {target} measured {source_px}/{unit_px} next to {element:?}; is it attached?");
    }
    Ok(converted)
}

/// Exclusive use of the page's probe. The probe is detached again when the
/// guard drops.
pub struct ProbeGuard<'page> {
    page: &'page Page,
    probe: NodeId,
}

impl<'page> ProbeGuard<'page> {
    pub fn acquire(page: &'page Page, element: NodeId) -> Result<Self, NodeListError> {
        if page.probe.busy.get() {
            return Err(NodeListError::ProbeBusy);
        }
        let probe = page.probe.node.get().unwrap_or_else(|| {
            let created = page.document().borrow_mut().create_element("div");
            page.probe.node.set(Some(created));
            created
        });
        page.probe.busy.set(true);
        let guard = Self { page, probe };
        {
            let mut document = page.document().borrow_mut();
            document.set_attribute(probe, "style", PROBE_STYLE)?;
            document.insert_after(element, probe)?;
        }
        Ok(guard)
    }

    fn measure(&self, length: Length, axis: Axis) -> Result<f32, NodeListError> {
        let dim = axis.dimension();
        let mut document = self.page.document().borrow_mut();
        document.set_style(self.probe, dim.property(), &length.to_string())?;
        Ok(document.measure(self.probe, dim))
    }
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.page.document().borrow_mut().detach(self.probe);
        self.page.probe.busy.set(false);
    }
}
