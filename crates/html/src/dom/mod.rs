//! Arena-backed document tree.

mod adapter;
mod printing;

use css_style_attr::{InlineStyle, property_from_accessor};
use indextree::{Arena, Node, NodeId};
use log::trace;

use crate::events::ListenerRegistry;
use crate::{DOMNode, DomError, Environment, NodeKind};

pub struct Document {
    dom: Arena<DOMNode>,
    root: NodeId,
    env: Environment,
    pub(crate) listeners: ListenerRegistry,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

impl Document {
    pub fn new(env: Environment) -> Self {
        let mut dom = Arena::new();
        Self {
            root: dom.new_node(DOMNode::default()),
            dom,
            env,
            listeners: ListenerRegistry::default(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn environment(&self) -> Environment {
        self.env
    }

    /// Create a detached element. Tag names are stored lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.dom.new_node(DOMNode {
            kind: NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            },
            ..DOMNode::default()
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.dom.new_node(DOMNode {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            ..DOMNode::default()
        })
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    ///
    /// # Errors
    /// Fails when either node is unknown or `child` is an ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure(parent)?;
        self.ensure(child)?;
        parent.checked_append(child, &mut self.dom)?;
        trace!(target: "html::dom", "append {child:?} to {parent:?}");
        Ok(())
    }

    /// Insert `node` as the next sibling of `reference`.
    ///
    /// # Errors
    /// Fails when either node is unknown or `node` is an ancestor of `reference`.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        self.ensure(reference)?;
        self.ensure(node)?;
        reference.checked_insert_after(node, &mut self.dom)?;
        trace!(target: "html::dom", "insert {node:?} after {reference:?}");
        Ok(())
    }

    /// Unlink `node` (and its subtree) from its parent and siblings.
    pub fn detach(&mut self, node: NodeId) {
        if self.contains(node) {
            node.detach(&mut self.dom);
        }
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.dom.get(node).is_some_and(|entry| !entry.is_removed())
    }

    pub fn node(&self, node: NodeId) -> Option<&DOMNode> {
        self.dom
            .get(node)
            .filter(|entry| !entry.is_removed())
            .map(Node::get)
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut DOMNode, DomError> {
        let data = self
            .dom
            .get_mut(node)
            .filter(|entry| !entry.is_removed())
            .ok_or(DomError::MissingNode(node))?
            .get_mut();
        if matches!(data.kind, NodeKind::Element { .. }) {
            Ok(data)
        } else {
            Err(DomError::NotAnElement(node))
        }
    }

    fn ensure(&self, node: NodeId) -> Result<(), DomError> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(DomError::MissingNode(node))
        }
    }

    pub fn element_tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(DOMNode::tag)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element_tag(node).is_some()
    }

    pub fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.dom.get(node)?.parent()
    }

    /// Nearest ancestor that is an element.
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent_node(node).filter(|&parent| self.is_element(parent))
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        if self.contains(node) {
            node.children(&self.dom).collect()
        } else {
            Vec::new()
        }
    }

    /// Ancestors of `node`, nearest first, excluding `node` itself.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        if self.contains(node) {
            node.ancestors(&self.dom).skip(1).collect()
        } else {
            Vec::new()
        }
    }

    pub fn previous_element(&self, node: NodeId) -> Option<NodeId> {
        if !self.contains(node) {
            return None;
        }
        node.preceding_siblings(&self.dom)
            .skip(1)
            .find(|&sibling| self.is_element(sibling))
    }

    pub fn next_element(&self, node: NodeId) -> Option<NodeId> {
        if !self.contains(node) {
            return None;
        }
        node.following_siblings(&self.dom)
            .skip(1)
            .find(|&sibling| self.is_element(sibling))
    }

    /// True when `node` is the root or has the root among its ancestors.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(node) && node.ancestors(&self.dom).any(|ancestor| ancestor == self.root)
    }

    /// Attached elements in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.root
            .descendants(&self.dom)
            .filter(|&node| self.is_element(node))
            .collect()
    }

    /// Elements in the subtree under `node`, in document order, excluding `node`.
    pub fn descendant_elements(&self, node: NodeId) -> Vec<NodeId> {
        if !self.contains(node) {
            return Vec::new();
        }
        node.descendants(&self.dom)
            .skip(1)
            .filter(|&descendant| self.is_element(descendant))
            .collect()
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.node(node)?
            .attrs
            .iter()
            .find(|(key, _)| *key == wanted)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute. `style` replaces the inline declaration block.
    ///
    /// # Errors
    /// Fails for unknown nodes and non-elements.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let key = name.to_ascii_lowercase();
        let element = self.element_mut(node)?;
        if key == "style" {
            element.style = InlineStyle::parse(value);
            return Ok(());
        }
        if let Some(slot) = element.attrs.iter_mut().find(|(existing, _)| *existing == key) {
            value.clone_into(&mut slot.1);
        } else {
            element.attrs.push((key, value.to_owned()));
        }
        Ok(())
    }

    /// Inline declaration for `property`, if any.
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node)?.style.get(property)
    }

    /// Set an inline declaration; an empty value removes it.
    ///
    /// # Errors
    /// Fails for unknown nodes and non-elements.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(node)?.style.set(property, value);
        Ok(())
    }

    /// Set through a style accessor name such as `marginLeft` or `cssFloat`.
    ///
    /// # Errors
    /// Fails for unknown nodes and non-elements.
    pub fn set_style_accessor(
        &mut self,
        node: NodeId,
        accessor: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.set_style(node, &property_from_accessor(accessor), value)
    }

    /// Read through a style accessor name.
    pub fn style_accessor(&self, node: NodeId, accessor: &str) -> Option<&str> {
        self.style(node, &property_from_accessor(accessor))
    }

    /// Serialized inline style, as the `style` attribute would read.
    pub fn style_text(&self, node: NodeId) -> String {
        self.node(node)
            .map(|data| data.style.to_string())
            .unwrap_or_default()
    }
}
