//! `NodeList::anim` and the shortcut family built on it.

use std::rc::Rc;

use anim::{Anim, AnimHandle, StyleTarget, Tween};
use html::{DocumentHandle, NodeId};
use log::{debug, warn};

use crate::unit::resolve_property;
use crate::{NodeList, NodeListError};

/// One endpoint of an animated property. Numbers are pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum CssValue {
    Number(f32),
    Text(String),
}

impl CssValue {
    fn to_css(&self) -> String {
        match self {
            Self::Number(number) => format!("{number}px"),
            Self::Text(text) => text.clone(),
        }
    }
}

impl From<f32> for CssValue {
    fn from(number: f32) -> Self {
        Self::Number(number)
    }
}

impl From<&str> for CssValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for CssValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Target value of a property, optionally with an explicit start. Without
/// one the animation starts from the element's computed style.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyValue {
    pub from: Option<CssValue>,
    pub to: CssValue,
}

impl PropertyValue {
    pub fn to(value: impl Into<CssValue>) -> Self {
        Self {
            from: None,
            to: value.into(),
        }
    }

    pub fn from_to(from: impl Into<CssValue>, to: impl Into<CssValue>) -> Self {
        Self {
            from: Some(from.into()),
            to: to.into(),
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(number: f32) -> Self {
        Self::to(number)
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        Self::to(text)
    }
}

impl From<(f32, f32)> for PropertyValue {
    fn from((from, to): (f32, f32)) -> Self {
        Self::from_to(from, to)
    }
}

impl From<(&str, &str)> for PropertyValue {
    fn from((from, to): (&str, &str)) -> Self {
        Self::from_to(from, to)
    }
}

#[derive(Clone, Debug)]
pub struct AnimOptions {
    pub tween: Tween,
    /// Release the animation once it completes.
    pub destroy_on_complete: bool,
    pub looping: bool,
    /// Start immediately instead of handing back an idle handle.
    pub start_now: bool,
}

impl Default for AnimOptions {
    fn default() -> Self {
        Self {
            tween: Tween::default(),
            destroy_on_complete: true,
            looping: false,
            start_now: true,
        }
    }
}

impl AnimOptions {
    #[must_use]
    pub fn with_tween(mut self, tween: Tween) -> Self {
        self.tween = tween;
        self
    }

    /// # Errors
    /// `UnknownTween` when `name` isn't one of the named tweens.
    pub fn named_tween(self, name: &str) -> Result<Self, NodeListError> {
        let tween = Tween::from_name(name).ok_or_else(|| NodeListError::UnknownTween(name.to_owned()))?;
        Ok(self.with_tween(tween))
    }

    #[must_use]
    pub const fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    #[must_use]
    pub const fn destroy_on_complete(mut self, destroy: bool) -> Self {
        self.destroy_on_complete = destroy;
        self
    }

    #[must_use]
    pub const fn start_now(mut self, start: bool) -> Self {
        self.start_now = start;
        self
    }
}

/// Writes animated values into an element's inline style.
struct ElementStyleTarget {
    document: DocumentHandle,
    node: NodeId,
}

impl StyleTarget for ElementStyleTarget {
    fn set_style(&self, accessor: &str, value: &str) {
        if let Err(err) = self
            .document
            .borrow_mut()
            .set_style_accessor(self.node, accessor, value)
        {
            warn!(target: "nodelist::anim", "dropping {accessor}={value}: {err}");
        }
    }
}

impl NodeList {
    /// Animate `properties` of the first element over `duration_secs`.
    ///
    /// Every property is resolved before anything starts, so one bad
    /// property leaves the element untouched.
    ///
    /// # Errors
    /// `EmptySelection`, `UnsupportedProperty` for non-length properties,
    /// `InvalidValue` for values that aren't lengths.
    pub fn anim(
        &self,
        duration_secs: f32,
        properties: &[(&str, PropertyValue)],
        opts: &AnimOptions,
    ) -> Result<AnimHandle, NodeListError> {
        let element = self.first().ok_or(NodeListError::EmptySelection)?;
        let descriptors = properties
            .iter()
            .map(|(property, value)| {
                let from = value.from.as_ref().map(CssValue::to_css);
                resolve_property(self.page(), element, property, from.as_deref(), &value.to.to_css())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let target = Rc::new(ElementStyleTarget {
            document: self.page().document().clone(),
            node: element,
        });
        let anim = descriptors.iter().fold(
            Anim::new(duration_secs)
                .target(target)
                .tween(opts.tween.clone())
                .looping(opts.looping)
                .destroy_on_complete(opts.destroy_on_complete),
            |builder, descriptor| builder.prop(&descriptor.accessor, descriptor.prop_spec()),
        );
        let handle = self.page().timeline().add(anim);
        debug!(
            target: "nodelist::anim",
            "{} props on {element:?} over {duration_secs}s ({})",
            descriptors.len(),
            opts.tween.name()
        );
        if opts.start_now {
            handle.start()?;
        }
        Ok(handle)
    }

    /// Queue an animation behind the ones already running on this selection.
    ///
    /// # Errors
    /// Always `NotImplemented`.
    pub fn queue_anim(
        &self,
        _duration_secs: f32,
        _properties: &[(&str, PropertyValue)],
        _opts: &AnimOptions,
    ) -> Result<AnimHandle, NodeListError> {
        self.shortcut("queue_anim")
    }

    /// # Errors
    /// Always `NotImplemented`.
    pub fn fade_in(&self, _duration_secs: f32, _opts: &AnimOptions) -> Result<AnimHandle, NodeListError> {
        self.shortcut("fade_in")
    }

    /// # Errors
    /// Always `NotImplemented`.
    pub fn fade_out(&self, _duration_secs: f32, _opts: &AnimOptions) -> Result<AnimHandle, NodeListError> {
        self.shortcut("fade_out")
    }

    /// # Errors
    /// Always `NotImplemented`.
    pub fn fade_toggle(&self, _duration_secs: f32, _opts: &AnimOptions) -> Result<AnimHandle, NodeListError> {
        self.shortcut("fade_toggle")
    }

    /// # Errors
    /// Always `NotImplemented`.
    pub fn slide_open(&self, _duration_secs: f32, _opts: &AnimOptions) -> Result<AnimHandle, NodeListError> {
        self.shortcut("slide_open")
    }

    /// # Errors
    /// Always `NotImplemented`.
    pub fn slide_shut(&self, _duration_secs: f32, _opts: &AnimOptions) -> Result<AnimHandle, NodeListError> {
        self.shortcut("slide_shut")
    }

    /// # Errors
    /// Always `NotImplemented`.
    pub fn slide_toggle(&self, _duration_secs: f32, _opts: &AnimOptions) -> Result<AnimHandle, NodeListError> {
        self.shortcut("slide_toggle")
    }

    fn shortcut(&self, name: &'static str) -> Result<AnimHandle, NodeListError> {
        warn!(target: "nodelist::anim", "{name} on {} elements is not implemented", self.len());
        Err(NodeListError::NotImplemented(name))
    }
}
