//! Element selections with property animation and event binding.
//!
//! A [`Page`] owns a document; a [`NodeList`] is an ordered selection of its
//! elements. Selections animate lengths ([`NodeList::anim`]), converting
//! between CSS units where the endpoints disagree, and bind, delegate and
//! fire DOM events.

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]

mod animate;
mod config;
mod error;
mod events;
mod page;
mod properties;
mod unit;

use core::fmt;
use std::rc::Rc;

use css_selectors::{SelectorList, filter_matching, parse_selector_list};
use log::trace;

pub use anim::{AnimEvent, AnimHandle, Tween};
pub use animate::{AnimOptions, CssValue, PropertyValue};
pub use config::{PageConfig, StyleFlavor};
pub use error::NodeListError;
pub use events::{CallContext, DelegateBinding, Handler, This, handler};
pub use css_values_units::{LengthUnit, Viewport};
pub use html::{Event, EventInit, NodeId};
pub use page::Page;
pub use properties::{Axis, PropertyKind, to_style_accessor};
pub use unit::{PropertyDescriptor, convert_units, resolve_property};

/// An ordered selection of elements on one page.
#[derive(Clone)]
pub struct NodeList {
    page: Rc<Page>,
    nodes: Vec<NodeId>,
}

impl NodeList {
    /// Every element matching `selector`, in document order.
    ///
    /// # Errors
    /// `InvalidSelector` when the selector doesn't parse.
    pub fn query(page: &Rc<Page>, selector: &str) -> Result<Self, NodeListError> {
        let list = parse_selector(selector)?;
        let nodes = {
            let document = page.document().borrow();
            filter_matching(&*document, &list, document.elements())
        };
        trace!(target: "nodelist", "`{selector}` matched {} elements", nodes.len());
        Ok(Self {
            page: Rc::clone(page),
            nodes,
        })
    }

    pub fn from_nodes(page: &Rc<Page>, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            page: Rc::clone(page),
            nodes: nodes.into_iter().collect(),
        }
    }

    #[inline]
    pub fn page(&self) -> &Rc<Page> {
        &self.page
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[inline]
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Computed value of `property` on the first element.
    pub fn css(&self, property: &str) -> Option<String> {
        let first = self.first()?;
        Some(self.page.document().borrow().computed_style(first, property))
    }

    /// Set an inline declaration on every element; an empty value removes it.
    ///
    /// # Errors
    /// Fails if a selected node is no longer an element of the document.
    pub fn set_css(&self, property: &str, value: &str) -> Result<&Self, NodeListError> {
        let mut document = self.page.document().borrow_mut();
        for &node in &self.nodes {
            document.set_style(node, property, value)?;
        }
        Ok(self)
    }
}

impl fmt::Debug for NodeList {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeList")
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<SelectorList, NodeListError> {
    parse_selector_list(selector).map_err(|err| NodeListError::InvalidSelector {
        selector: selector.to_owned(),
        reason: err.to_string(),
    })
}
