//! Direct and delegated event bindings.
//!
//! Every binding is recorded in the page's registry next to the DOM listener
//! it installed, so bindings can be removed by callback identity (`detach`,
//! `detach_delegate`) or by the token `delegate` returns (`unbind`).

use core::any::Any;
use core::fmt;
use std::rc::Rc;

use css_selectors::matches_selector_list;
use html::{DocumentHandle, Event, EventInit, KEY_EVENTS, Listener, ListenerId, NodeId, dispatch_event, key_sequence};
use log::{debug, trace};

use crate::{NodeList, NodeListError, parse_selector};

/// What a handler sees as its context object.
#[derive(Clone, Debug)]
pub enum This {
    Node(NodeId),
    Value(Rc<dyn Any>),
}

impl This {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Node(node) => Some(*node),
            Self::Value(_) => None,
        }
    }

    pub fn value<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Value(value) => value.downcast_ref(),
            Self::Node(_) => None,
        }
    }
}

/// Passed to every handler invocation.
pub struct CallContext<'doc> {
    pub document: &'doc DocumentHandle,
    /// The caller's context value, else the bound element (direct bindings)
    /// or the matched element (delegated bindings).
    pub this: This,
}

/// A bound callback. Identity (`Rc::ptr_eq`) is what `detach` matches on.
pub type Handler = Rc<dyn Fn(&CallContext<'_>, &mut Event)>;

pub fn handler(callback: impl Fn(&CallContext<'_>, &mut Event) + 'static) -> Handler {
    Rc::new(callback)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(u64);

struct Binding {
    id: BindingId,
    node: NodeId,
    event_type: String,
    /// `None` for direct bindings.
    selector: Option<String>,
    handler: Handler,
    listener: ListenerId,
}

#[derive(Default)]
pub struct BindingRegistry {
    next_id: u64,
    entries: Vec<Binding>,
}

impl BindingRegistry {
    fn insert(
        &mut self,
        node: NodeId,
        event_type: &str,
        selector: Option<&str>,
        handler: &Handler,
        listener: ListenerId,
    ) -> BindingId {
        self.next_id += 1;
        let id = BindingId(self.next_id);
        self.entries.push(Binding {
            id,
            node,
            event_type: event_type.to_owned(),
            selector: selector.map(str::to_owned),
            handler: Rc::clone(handler),
            listener,
        });
        id
    }

    fn remove_where(&mut self, mut predicate: impl FnMut(&Binding) -> bool) -> Vec<Binding> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for binding in self.entries.drain(..) {
            if predicate(&binding) {
                removed.push(binding);
            } else {
                kept.push(binding);
            }
        }
        self.entries = kept;
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Token for the bindings one `delegate` call made, one per element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegateBinding {
    ids: Vec<BindingId>,
}

impl DelegateBinding {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn normalize(event_type: &str) -> String {
    event_type.trim().to_ascii_lowercase()
}

fn kind_label(event_type: &str) -> &'static str {
    if KEY_EVENTS.contains(&event_type) {
        "key"
    } else {
        "generic"
    }
}

impl NodeList {
    /// Call `handler` for `event_type` on every element. The context is
    /// `this`, or the element the listener sits on.
    pub fn on(&self, event_type: &str, handler: &Handler, this: Option<This>) -> &Self {
        let event_type = normalize(event_type);
        let this = Rc::new(this);
        for &node in &self.nodes {
            let callback = Rc::clone(handler);
            let context = Rc::clone(&this);
            let listener: Listener = Rc::new(move |document: &DocumentHandle, event: &mut Event| {
                let call = CallContext {
                    document,
                    this: Option::clone(&context).unwrap_or(This::Node(node)),
                };
                callback(&call, event);
            });
            let listener_id = self
                .page
                .document()
                .borrow_mut()
                .add_listener(node, &event_type, false, listener);
            self.page
                .bindings
                .borrow_mut()
                .insert(node, &event_type, None, handler, listener_id);
        }
        debug!(target: "nodelist::events", "bound {} `{event_type}` on {} elements", kind_label(&event_type), self.nodes.len());
        self
    }

    /// Remove every direct binding of `handler` for `event_type`. Returns how
    /// many were removed.
    pub fn detach(&self, event_type: &str, handler: &Handler) -> usize {
        let event_type = normalize(event_type);
        let removed = self.page.bindings.borrow_mut().remove_where(|binding| {
            binding.selector.is_none()
                && binding.event_type == event_type
                && self.nodes.contains(&binding.node)
                && Rc::ptr_eq(&binding.handler, handler)
        });
        self.release(&removed)
    }

    /// Listen for `event_type` on every element and call `handler` when the
    /// event's source matches `selector`. The context is `this`, or the
    /// matched source element; the event is passed through.
    ///
    /// # Errors
    /// `InvalidSelector` when the selector doesn't parse; nothing is bound.
    pub fn delegate(
        &self,
        event_type: &str,
        selector: &str,
        handler: &Handler,
        this: Option<This>,
    ) -> Result<DelegateBinding, NodeListError> {
        let event_type = normalize(event_type);
        let selector = selector.trim();
        let list = Rc::new(parse_selector(selector)?);
        let this = Rc::new(this);
        let mut ids = Vec::with_capacity(self.nodes.len());
        for &node in &self.nodes {
            let callback = Rc::clone(handler);
            let context = Rc::clone(&this);
            let matcher = Rc::clone(&list);
            let listener: Listener = Rc::new(move |document: &DocumentHandle, event: &mut Event| {
                let Some(source) = event.source else {
                    return;
                };
                if !matches_selector_list(&*document.borrow(), source, &matcher) {
                    return;
                }
                trace!(target: "nodelist::events", "delegated `{}` matched {source:?} under {node:?}", event.kind);
                let call = CallContext {
                    document,
                    this: Option::clone(&context).unwrap_or(This::Node(source)),
                };
                callback(&call, event);
            });
            let listener_id = self
                .page
                .document()
                .borrow_mut()
                .add_listener(node, &event_type, false, listener);
            ids.push(self.page.bindings.borrow_mut().insert(
                node,
                &event_type,
                Some(selector),
                handler,
                listener_id,
            ));
        }
        debug!(target: "nodelist::events", "delegated `{event_type}` to `{selector}` on {} elements", ids.len());
        Ok(DelegateBinding { ids })
    }

    /// On every element, remove the first delegated binding whose event,
    /// selector and handler all match. Returns how many were removed.
    pub fn detach_delegate(&self, event_type: &str, selector: &str, handler: &Handler) -> usize {
        let event_type = normalize(event_type);
        let selector = selector.trim();
        let mut seen = Vec::with_capacity(self.nodes.len());
        let removed = self.page.bindings.borrow_mut().remove_where(|binding| {
            let hit = binding.selector.as_deref() == Some(selector)
                && binding.event_type == event_type
                && self.nodes.contains(&binding.node)
                && !seen.contains(&binding.node)
                && Rc::ptr_eq(&binding.handler, handler);
            if hit {
                seen.push(binding.node);
            }
            hit
        });
        self.release(&removed)
    }

    /// Remove exactly the bindings `binding` made.
    pub fn unbind(&self, binding: &DelegateBinding) -> usize {
        let removed = self
            .page
            .bindings
            .borrow_mut()
            .remove_where(|entry| binding.ids.contains(&entry.id));
        self.release(&removed)
    }

    fn release(&self, removed: &[Binding]) -> usize {
        let mut document = self.page.document().borrow_mut();
        for binding in removed {
            document.remove_listener(binding.node, binding.listener);
        }
        if !removed.is_empty() {
            debug!(target: "nodelist::events", "released {} bindings", removed.len());
        }
        removed.len()
    }

    /// Dispatch a synthetic `event_type` on each element in turn and return
    /// the last event. Once a listener prevents the default, later events
    /// start out prevented.
    pub fn fire(&self, event_type: &str, init: &EventInit) -> Option<Event> {
        let mut last = None;
        let mut prevented = false;
        for &node in &self.nodes {
            let mut event = Event::with_init(event_type, init);
            if prevented {
                event.prevent_default();
            }
            dispatch_event(self.page.document(), node, &mut event);
            prevented |= event.is_default_prevented();
            last = Some(event);
        }
        last
    }

    /// Press `key` on every element: `keydown`, `keypress` when the key
    /// produces a character, `keyup`. Returns the dispatched events.
    pub fn fire_key(&self, key: &str) -> Vec<Event> {
        let mut fired = Vec::new();
        for &node in &self.nodes {
            for mut event in key_sequence(key) {
                dispatch_event(self.page.document(), node, &mut event);
                fired.push(event);
            }
        }
        fired
    }
}

impl fmt::Debug for CallContext<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CallContext")
            .field("this", &self.this)
            .finish_non_exhaustive()
    }
}
