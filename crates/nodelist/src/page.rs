use core::cell::{Cell, RefCell};
use std::rc::Rc;

use anim::Timeline;
use html::{Document, DocumentHandle, NodeId};
use log::debug;

use crate::config::PageConfig;
use crate::events::BindingRegistry;
use crate::{NodeList, NodeListError};

/// The hidden element unit conversions measure with, created on first use.
#[derive(Default)]
pub struct ProbeSlot {
    pub node: Cell<Option<NodeId>>,
    pub busy: Cell<bool>,
}

/// A document and the per-page state its selections share.
pub struct Page {
    document: DocumentHandle,
    body: NodeId,
    timeline: Timeline,
    config: PageConfig,
    pub(crate) probe: ProbeSlot,
    pub(crate) bindings: RefCell<BindingRegistry>,
}

impl Page {
    /// An empty document with a `<body>` under the root.
    ///
    /// # Errors
    /// Fails if the body can't be attached.
    pub fn new(config: PageConfig) -> Result<Rc<Self>, NodeListError> {
        let mut document = Document::new(config.environment());
        let body = document.create_element("body");
        document.append_child(document.root(), body)?;
        debug!(target: "nodelist::page", "new page {}x{}", config.viewport.width_px, config.viewport.height_px);
        Ok(Rc::new(Self {
            document: DocumentHandle::new(document),
            body,
            timeline: Timeline::new(),
            config,
            probe: ProbeSlot::default(),
            bindings: RefCell::new(BindingRegistry::default()),
        }))
    }

    #[inline]
    pub fn document(&self) -> &DocumentHandle {
        &self.document
    }

    #[inline]
    pub fn body(&self) -> NodeId {
        self.body
    }

    #[inline]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[inline]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Create an element with `attributes` and append it to `parent`.
    ///
    /// # Errors
    /// Fails when `parent` is not in the document.
    pub fn append_element(
        &self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Result<NodeId, NodeListError> {
        let mut document = self.document.borrow_mut();
        let element = document.create_element(tag);
        for &(name, value) in attributes {
            document.set_attribute(element, name, value)?;
        }
        document.append_child(parent, element)?;
        Ok(element)
    }

    /// Advance animations by one configured frame.
    pub fn tick(&self) {
        self.timeline.tick(self.config.frame_interval);
    }

    /// Live `on`/`delegate` bindings across all selections.
    pub fn binding_count(&self) -> usize {
        self.bindings.borrow().len()
    }

    /// Shorthand for [`NodeList::query`].
    ///
    /// # Errors
    /// Fails for an invalid selector.
    pub fn select(self: &Rc<Self>, selector: &str) -> Result<NodeList, NodeListError> {
        NodeList::query(self, selector)
    }
}
