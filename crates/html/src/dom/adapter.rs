//! Selector matching over the document tree.

use css_selectors::ElementAdapter;
use indextree::NodeId;

use super::Document;

impl ElementAdapter for Document {
    type Handle = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.parent_element(element)
    }

    fn previous_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        self.previous_element(element)
    }

    fn next_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        self.next_element(element)
    }

    fn tag_name(&self, element: NodeId) -> Option<&str> {
        self.element_tag(element)
    }

    fn element_id(&self, element: NodeId) -> Option<&str> {
        self.attribute(element, "id")
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.attribute(element, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|name| name == class))
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        self.attribute(element, name)
    }
}
