use core::cell::RefCell;
use std::rc::Rc;

use html::{
    Document, DocumentHandle, Event, EventInit, EventPhase, Listener, NodeId, dispatch_event,
    fire, key_sequence,
};

type Log = Rc<RefCell<Vec<String>>>;

/// root > outer(section) > inner(span)
fn setup() -> anyhow::Result<(DocumentHandle, NodeId, NodeId)> {
    let mut doc = Document::default();
    let outer = doc.create_element("section");
    let inner = doc.create_element("span");
    doc.append_child(doc.root(), outer)?;
    doc.append_child(outer, inner)?;
    Ok((DocumentHandle::new(doc), outer, inner))
}

fn recorder(log: &Log, label: &'static str) -> Listener {
    let log = Rc::clone(log);
    Rc::new(move |_doc: &DocumentHandle, event: &mut Event| {
        let phase = match event.phase {
            EventPhase::Capturing => "capture",
            EventPhase::AtTarget => "target",
            EventPhase::Bubbling => "bubble",
            EventPhase::None => "none",
        };
        log.borrow_mut().push(format!("{label}:{phase}"));
    })
}

#[test]
fn capture_target_bubble_order() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let (handle, outer, inner) = setup()?;
    let log: Log = Rc::default();
    {
        let mut doc = handle.borrow_mut();
        doc.add_listener(outer, "click", false, recorder(&log, "outer"));
        doc.add_listener(outer, "click", true, recorder(&log, "outer-capture"));
        doc.add_listener(inner, "CLICK", false, recorder(&log, "inner"));
    }
    let mut event = Event::new("click");
    assert!(dispatch_event(&handle, inner, &mut event));
    assert_eq!(
        *log.borrow(),
        vec!["outer-capture:capture", "inner:target", "outer:bubble"]
    );
    assert_eq!(event.source, Some(inner));
    assert_eq!(event.phase, EventPhase::None);
    Ok(())
}

#[test]
fn non_bubbling_events_stay_on_target() -> anyhow::Result<()> {
    let (handle, outer, inner) = setup()?;
    let log: Log = Rc::default();
    handle
        .borrow_mut()
        .add_listener(outer, "mouseenter", false, recorder(&log, "outer"));
    let event = fire(&handle, inner, "mouseenter", &EventInit::default());
    assert!(!event.bubbles);
    assert!(log.borrow().is_empty());

    let forced = EventInit {
        bubbles: Some(true),
        ..EventInit::default()
    };
    fire(&handle, inner, "mouseenter", &forced);
    assert_eq!(log.borrow().len(), 1);
    Ok(())
}

#[test]
fn stop_propagation_and_prevent_default() -> anyhow::Result<()> {
    let (handle, outer, inner) = setup()?;
    let log: Log = Rc::default();
    let stopper: Listener = Rc::new(|_doc: &DocumentHandle, event: &mut Event| {
        event.prevent_default();
        event.stop_propagation();
    });
    {
        let mut doc = handle.borrow_mut();
        doc.add_listener(inner, "click", false, stopper);
        doc.add_listener(inner, "click", false, recorder(&log, "inner-second"));
        doc.add_listener(outer, "click", false, recorder(&log, "outer"));
    }
    let mut event = Event::new("click");
    assert!(!dispatch_event(&handle, inner, &mut event));
    assert!(event.is_default_prevented());
    assert_eq!(*log.borrow(), vec!["inner-second:target"]);

    let uncancelable = EventInit {
        cancelable: Some(false),
        ..EventInit::default()
    };
    let fired = fire(&handle, inner, "click", &uncancelable);
    assert!(!fired.is_default_prevented());
    Ok(())
}

#[test]
fn listeners_may_mutate_the_document() -> anyhow::Result<()> {
    let (handle, outer, inner) = setup()?;
    let log: Log = Rc::default();
    let second = handle
        .borrow_mut()
        .add_listener(inner, "click", false, recorder(&log, "removed"));
    let remover: Listener = Rc::new(move |doc: &DocumentHandle, _event: &mut Event| {
        let mut doc = doc.borrow_mut();
        doc.remove_listener(inner, second);
        let extra = doc.create_element("b");
        assert!(matches!(doc.append_child(outer, extra), Ok(())));
    });
    // Registered after `second` but runs first because it is on the capture path.
    handle.borrow_mut().add_listener(outer, "click", true, remover);
    fire(&handle, inner, "click", &EventInit::default());
    assert!(log.borrow().is_empty());
    assert_eq!(handle.borrow().children(outer).len(), 2);
    assert_eq!(handle.borrow().listener_count(inner), 0);
    Ok(())
}

#[test]
fn fired_events_carry_properties() -> anyhow::Result<()> {
    let (handle, _outer, inner) = setup()?;
    let seen: Rc<RefCell<Option<String>>> = Rc::default();
    let sink = Rc::clone(&seen);
    handle.borrow_mut().add_listener(
        inner,
        "custom",
        false,
        Rc::new(move |_doc: &DocumentHandle, event: &mut Event| {
            *sink.borrow_mut() = event.property("detail").map(str::to_owned);
        }),
    );
    fire(&handle, inner, "custom", &EventInit::default().with("detail", "42"));
    assert_eq!(seen.borrow().as_deref(), Some("42"));
    Ok(())
}

#[test]
fn key_sequences() {
    let names: Vec<String> = key_sequence("a")
        .into_iter()
        .map(|event| event.kind)
        .collect();
    assert_eq!(names, vec!["keydown", "keypress", "keyup"]);

    let shift = key_sequence("Shift");
    assert_eq!(shift.len(), 2);
    assert!(shift.iter().all(Event::is_key_event));
    assert_eq!(shift[0].key(), Some("Shift"));
}
