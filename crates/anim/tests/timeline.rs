use core::cell::{Cell, RefCell};
use core::time::Duration;
use std::collections::HashMap;
use std::rc::Rc;

use anim::{Anim, AnimError, AnimEvent, PropSpec, StyleTarget, Template, Timeline, Tween};

#[derive(Default)]
struct Recorder {
    values: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl StyleTarget for Recorder {
    fn set_style(&self, accessor: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(accessor.to_owned(), value.to_owned());
        self.writes.set(self.writes.get() + 1);
    }
}

impl Recorder {
    fn value(&self, accessor: &str) -> Option<String> {
        self.values.borrow().get(accessor).cloned()
    }
}

fn width_anim(target: &Rc<Recorder>, duration: f32) -> Anim {
    Anim::new(duration)
        .target(Rc::clone(target) as Rc<dyn StyleTarget>)
        .prop("width", PropSpec::new(Template::with_unit("px"), 0.0, 100.0).rounded(true))
        .tween(Tween::linear())
}

#[test]
fn start_writes_first_frame() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let target = Rc::new(Recorder::default());
    let timeline = Timeline::new();
    let handle = timeline.add(width_anim(&target, 1.0));
    assert!(!handle.is_playing());
    handle.start()?;
    assert!(handle.is_playing());
    assert_eq!(timeline.active_count(), 1);
    assert_eq!(target.value("width").as_deref(), Some("0px"));
    Ok(())
}

#[test]
fn ticks_interpolate_then_complete() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let target = Rc::new(Recorder::default());
    let timeline = Timeline::new();
    let handle = timeline.add(width_anim(&target, 1.0).destroy_on_complete(false));
    handle.start()?;

    timeline.tick(Duration::from_millis(250));
    assert_eq!(target.value("width").as_deref(), Some("25px"));
    timeline.tick(Duration::from_millis(250));
    assert_eq!(target.value("width").as_deref(), Some("50px"));
    timeline.tick(Duration::from_secs(2));
    assert_eq!(target.value("width").as_deref(), Some("100px"));

    assert!(!handle.is_playing());
    assert!(!handle.is_destroyed());
    assert!(timeline.is_idle());
    Ok(())
}

#[test]
fn completion_destroys_by_default() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let target = Rc::new(Recorder::default());
    let timeline = Timeline::new();
    let handle = timeline.add(width_anim(&target, 0.5));
    handle.start()?;
    timeline.tick(Duration::from_secs(1));
    assert!(handle.is_destroyed());
    assert_eq!(handle.start().err(), Some(AnimError::Destroyed));
    Ok(())
}

#[test]
fn first_frame_is_reported_after_it_is_written() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let target = Rc::new(Recorder::default());
    let timeline = Timeline::new();
    let handle = timeline.add(width_anim(&target, 1.0));
    let frames = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&frames);
    let recorder = Rc::clone(&target);
    handle.on(AnimEvent::Frame, move |_| {
        seen.borrow_mut().push(recorder.value("width"));
    });
    handle.start()?;
    assert_eq!(*frames.borrow(), vec![Some(String::from("0px"))]);
    timeline.tick(Duration::from_millis(500));
    assert_eq!(frames.borrow().len(), 2);
    Ok(())
}

#[test]
fn events_fire_in_order() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let target = Rc::new(Recorder::default());
    let timeline = Timeline::new();
    let handle = timeline.add(width_anim(&target, 0.1));
    let seen = Rc::new(RefCell::new(Vec::new()));
    for event in [AnimEvent::Start, AnimEvent::Frame, AnimEvent::Complete] {
        let log = Rc::clone(&seen);
        handle.on(event, move |_| log.borrow_mut().push(event));
    }
    handle.start()?;
    timeline.tick(Duration::from_millis(50));
    timeline.tick(Duration::from_millis(60));
    assert_eq!(
        *seen.borrow(),
        vec![
            AnimEvent::Start,
            AnimEvent::Frame,
            AnimEvent::Frame,
            AnimEvent::Frame,
            AnimEvent::Complete
        ]
    );
    Ok(())
}

#[test]
fn stop_halts_and_notifies() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let target = Rc::new(Recorder::default());
    let timeline = Timeline::new();
    let handle = timeline.add(width_anim(&target, 1.0));
    let stops = Rc::new(Cell::new(0));
    let counter = Rc::clone(&stops);
    handle.on(AnimEvent::Stop, move |_| counter.set(counter.get() + 1));
    handle.start()?;
    timeline.tick(Duration::from_millis(400));
    handle.stop();
    handle.stop();
    let writes = target.writes.get();
    timeline.tick(Duration::from_millis(400));
    assert_eq!(target.writes.get(), writes);
    assert_eq!(target.value("width").as_deref(), Some("40px"));
    assert_eq!(stops.get(), 1);
    Ok(())
}

#[test]
fn looping_wraps_position() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let target = Rc::new(Recorder::default());
    let timeline = Timeline::new();
    let handle = timeline.add(width_anim(&target, 1.0).looping(true));
    handle.start()?;
    timeline.tick(Duration::from_millis(1250));
    assert!(handle.is_playing());
    assert!((handle.position() - 0.25).abs() < 1e-4);
    assert_eq!(target.value("width").as_deref(), Some("25px"));
    Ok(())
}

#[test]
fn missing_target_is_an_error() {
    let timeline = Timeline::new();
    let handle = timeline.add(Anim::new(1.0));
    assert_eq!(handle.start().err(), Some(AnimError::NoTarget));
}

#[test]
fn clamps_apply_after_rounding() {
    let mut spec = PropSpec::new(Template::with_unit("px"), 0.0, 10.0).rounded(true);
    spec.min = Some(2.0);
    spec.max = Some(8.0);
    assert!((spec.value_at(0.0) - 2.0).abs() < f32::EPSILON);
    assert!((spec.value_at(0.46) - 5.0).abs() < f32::EPSILON);
    assert!((spec.value_at(1.0) - 8.0).abs() < f32::EPSILON);
}

#[test]
fn later_prop_replaces_earlier() {
    let timeline = Timeline::new();
    let handle = timeline.add(
        Anim::new(1.0)
            .prop("height", PropSpec::new(Template::with_unit("px"), 0.0, 1.0))
            .prop("height", PropSpec::new(Template::with_unit("em"), 0.0, 2.0)),
    );
    let props = handle.props();
    assert_eq!(props.len(), 1);
    assert_eq!(props[0].1.template.as_str(), "?em");
    assert_eq!(handle.tween_name(), "easeBoth");
}
