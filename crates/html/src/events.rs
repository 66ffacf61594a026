//! DOM events.
//!
//! Dispatch follows the W3C model:
//!   1. Build the propagation path from the target's parent up to the root.
//!   2. Capture phase: root down to the parent, capture listeners only.
//!   3. At-target phase: every listener on the target, in registration order.
//!   4. Bubble phase: parent up to the root, non-capture listeners, only for
//!      bubbling events.
//!
//! Listeners are snapshotted per node and the document borrow is released
//! before each callback runs, so callbacks may mutate the document or add and
//! remove listeners. A listener removed mid-dispatch is not invoked.

use core::cell::{Ref, RefCell, RefMut};
use core::fmt;
use std::collections::HashMap;
use std::rc::Rc;

use indextree::NodeId;
use log::{debug, trace};

use crate::Document;

/// Which phase of the dispatch algorithm is currently executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Propagation {
    Continue,
    /// Finish the current node, then stop.
    Stopped,
    /// Skip the remaining listeners on the current node too.
    StoppedImmediately,
}

/// Event types that only fire on their target.
const NON_BUBBLING: [&str; 5] = ["mouseenter", "mouseleave", "focus", "blur", "load"];

/// Keyboard events in the order a key press produces them.
pub const KEY_EVENTS: [&str; 3] = ["keydown", "keypress", "keyup"];

/// A DOM event that can be dispatched through the tree.
#[derive(Clone, Debug)]
pub struct Event {
    /// Lowercase event type, e.g. `"click"`.
    pub kind: String,
    /// The node the event was originally dispatched on.
    pub source: Option<NodeId>,
    /// The node whose listeners are currently being invoked.
    pub current_target: Option<NodeId>,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation: Propagation,
    properties: HashMap<String, String>,
}

impl Event {
    /// A cancelable event; bubbling unless the type is one that never bubbles.
    pub fn new(event_type: &str) -> Self {
        let name = event_type.trim().to_ascii_lowercase();
        Self {
            bubbles: !NON_BUBBLING.contains(&name.as_str()),
            kind: name,
            source: None,
            current_target: None,
            phase: EventPhase::None,
            cancelable: true,
            default_prevented: false,
            propagation: Propagation::Continue,
            properties: HashMap::new(),
        }
    }

    pub fn with_init(event_type: &str, init: &EventInit) -> Self {
        let mut event = Self::new(event_type);
        if let Some(bubbles) = init.bubbles {
            event.bubbles = bubbles;
        }
        if let Some(cancelable) = init.cancelable {
            event.cancelable = cancelable;
        }
        for (name, value) in &init.properties {
            event.set_property(name, value);
        }
        event
    }

    /// Only takes effect on cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop after the listeners on the current node.
    pub fn stop_propagation(&mut self) {
        if self.propagation == Propagation::Continue {
            self.propagation = Propagation::Stopped;
        }
    }

    /// Stop now, skipping the remaining listeners on the current node too.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation = Propagation::StoppedImmediately;
    }

    #[inline]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    #[inline]
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation != Propagation::Continue
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_owned(), value.to_owned());
    }

    /// The `key` property of keyboard events.
    pub fn key(&self) -> Option<&str> {
        self.property("key")
    }

    pub fn is_key_event(&self) -> bool {
        KEY_EVENTS.contains(&self.kind.as_str())
    }
}

/// Overrides and extra data for a synthetic event.
#[derive(Clone, Debug, Default)]
pub struct EventInit {
    pub bubbles: Option<bool>,
    pub cancelable: Option<bool>,
    pub properties: Vec<(String, String)>,
}

impl EventInit {
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.properties.push((name.to_owned(), value.to_owned()));
        self
    }
}

/// A listener callback. It receives the document so it can read or mutate it
/// while the dispatcher holds no borrow.
pub type Listener = Rc<dyn Fn(&DocumentHandle, &mut Event)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Clone, Copy, PartialEq, Eq)]
enum PhaseFilter {
    Capture,
    Bubble,
    Any,
}

struct ListenerEntry {
    id: ListenerId,
    event_type: String,
    capture: bool,
    callback: Listener,
}

/// Listeners per node, in registration order.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    by_node: HashMap<NodeId, Vec<ListenerEntry>>,
}

impl ListenerRegistry {
    fn add(&mut self, node: NodeId, event_type: &str, capture: bool, callback: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.by_node.entry(node).or_default().push(ListenerEntry {
            id,
            event_type: event_type.trim().to_ascii_lowercase(),
            capture,
            callback,
        });
        id
    }

    fn remove(&mut self, node: NodeId, id: ListenerId) -> bool {
        let Some(list) = self.by_node.get_mut(&node) else {
            return false;
        };
        let before = list.len();
        list.retain(|entry| entry.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.by_node.remove(&node);
        }
        removed
    }

    fn contains(&self, node: NodeId, id: ListenerId) -> bool {
        self.by_node
            .get(&node)
            .is_some_and(|list| list.iter().any(|entry| entry.id == id))
    }

    fn snapshot(&self, node: NodeId, event_type: &str, filter: PhaseFilter) -> Vec<(ListenerId, Listener)> {
        self.by_node
            .get(&node)
            .map(|list| {
                list.iter()
                    .filter(|entry| entry.event_type == event_type)
                    .filter(|entry| match filter {
                        PhaseFilter::Capture => entry.capture,
                        PhaseFilter::Bubble => !entry.capture,
                        PhaseFilter::Any => true,
                    })
                    .map(|entry| (entry.id, Rc::clone(&entry.callback)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn count(&self, node: NodeId) -> usize {
        self.by_node.get(&node).map_or(0, Vec::len)
    }
}

impl Document {
    /// Register a listener; event type names are case-insensitive.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        capture: bool,
        callback: Listener,
    ) -> ListenerId {
        let id = self.listeners.add(node, event_type, capture, callback);
        debug!(target: "html::events", "listener {id:?} for `{event_type}` on {node:?}");
        id
    }

    /// Returns whether a listener was removed.
    pub fn remove_listener(&mut self, node: NodeId, id: ListenerId) -> bool {
        let removed = self.listeners.remove(node, id);
        if removed {
            debug!(target: "html::events", "removed listener {id:?} from {node:?}");
        }
        removed
    }

    pub fn has_listener(&self, node: NodeId, id: ListenerId) -> bool {
        self.listeners.contains(node, id)
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.count(node)
    }
}

/// Shared, single-threaded handle to a document.
#[derive(Clone)]
pub struct DocumentHandle(Rc<RefCell<Document>>);

impl DocumentHandle {
    pub fn new(document: Document) -> Self {
        Self(Rc::new(RefCell::new(document)))
    }

    /// # Panics
    /// Panics if the document is mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Document> {
        self.0.borrow()
    }

    /// # Panics
    /// Panics if the document is already borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Document> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DocumentHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("DocumentHandle")
            .field(&Rc::as_ptr(&self.0))
            .finish()
    }
}

fn invoke_listeners(handle: &DocumentHandle, node: NodeId, event: &mut Event, filter: PhaseFilter) {
    event.current_target = Some(node);
    let listeners = handle
        .borrow()
        .listeners
        .snapshot(node, &event.kind, filter);
    for (id, callback) in listeners {
        if event.propagation == Propagation::StoppedImmediately {
            break;
        }
        if !handle.borrow().has_listener(node, id) {
            continue;
        }
        callback(handle, event);
    }
}

/// Dispatch `event` at `target` (capture, at-target, bubble).
///
/// Returns `true` if the default action was *not* prevented.
pub fn dispatch_event(handle: &DocumentHandle, target: NodeId, event: &mut Event) -> bool {
    event.source = Some(target);
    let path = handle.borrow().ancestors(target);
    trace!(target: "html::events", "dispatch `{}` at {target:?} through {} ancestors", event.kind, path.len());

    event.phase = EventPhase::Capturing;
    for &node in path.iter().rev() {
        if event.is_propagation_stopped() {
            break;
        }
        invoke_listeners(handle, node, event, PhaseFilter::Capture);
    }

    if !event.is_propagation_stopped() {
        event.phase = EventPhase::AtTarget;
        invoke_listeners(handle, target, event, PhaseFilter::Any);
    }

    if event.bubbles {
        event.phase = EventPhase::Bubbling;
        for &node in &path {
            if event.is_propagation_stopped() {
                break;
            }
            invoke_listeners(handle, node, event, PhaseFilter::Bubble);
        }
    }

    event.phase = EventPhase::None;
    event.current_target = None;
    !event.default_prevented
}

/// Build and dispatch a synthetic event, returning it for inspection.
pub fn fire(handle: &DocumentHandle, target: NodeId, event_type: &str, init: &EventInit) -> Event {
    let mut event = Event::with_init(event_type, init);
    dispatch_event(handle, target, &mut event);
    event
}

/// The events one key press produces: `keydown`, `keypress` when the key
/// yields a single character, then `keyup`.
pub fn key_sequence(key: &str) -> Vec<Event> {
    let produces_char = key.chars().count() == 1;
    KEY_EVENTS
        .iter()
        .filter(|&&name| produces_char || name != "keypress")
        .map(|&name| {
            let mut event = Event::new(name);
            event.set_property("key", key);
            event
        })
        .collect()
}
