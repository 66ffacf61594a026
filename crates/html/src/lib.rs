//! In-process document model: an arena DOM with inline styles, a small
//! measurement routine for rendered sizes, and DOM event dispatch.

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]

pub mod dom;
pub mod events;
pub mod layout;

pub use css_sizing::Dimension;
pub use css_values_units::Viewport;
pub use dom::Document;
pub use events::{
    DocumentHandle, Event, EventInit, EventPhase, KEY_EVENTS, Listener, ListenerId,
    dispatch_event, fire, key_sequence,
};
pub use indextree::NodeId;
pub use layout::Position;

use css_style_attr::InlineStyle;
use indextree::NodeError;
use smallvec::SmallVec;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Document,
    Element { tag: String },
    Text { text: String },
}

#[derive(Debug, Clone, Default)]
pub struct DOMNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
    pub style: InlineStyle,
}

impl DOMNode {
    #[inline]
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Document | NodeKind::Text { .. } => None,
        }
    }
}

/// Rendering environment a document is measured in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub viewport: Viewport,
    pub root_font_size_px: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            viewport: Viewport {
                width_px: 1024,
                height_px: 768,
            },
            root_font_size_px: 16.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} does not exist")]
    MissingNode(NodeId),
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("tree operation failed: {0}")]
    Tree(#[from] NodeError),
}
