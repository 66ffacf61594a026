use core::cell::RefCell;
use core::time::Duration;
use std::rc::{Rc, Weak};

use log::{debug, trace};

use crate::{AnimError, Template, Tween};

/// Where animated values are written, e.g. an element's inline style.
pub trait StyleTarget {
    fn set_style(&self, accessor: &str, value: &str);
}

/// One animated property.
#[derive(Clone, Debug, PartialEq)]
pub struct PropSpec {
    pub template: Template,
    pub from: f32,
    pub to: f32,
    /// Round each frame's value to a whole number.
    pub round: bool,
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl PropSpec {
    #[must_use]
    pub fn new(template: Template, from: f32, to: f32) -> Self {
        Self {
            template,
            from,
            to,
            round: false,
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub fn rounded(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Value at eased progress, after rounding and clamping.
    #[must_use]
    pub fn value_at(&self, eased: f32) -> f32 {
        let raw = (self.to - self.from).mul_add(eased, self.from);
        let rounded = if self.round { raw.round() } else { raw };
        let floored = self.min.map_or(rounded, |min| rounded.max(min));
        self.max.map_or(floored, |max| floored.min(max))
    }
}

/// Lifecycle notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimEvent {
    Start,
    Frame,
    Stop,
    Complete,
}

/// Builder for an animation. Defaults: `easeBoth`, not looping, destroyed
/// once complete.
pub struct Anim {
    duration: f32,
    target: Option<Rc<dyn StyleTarget>>,
    props: Vec<(String, PropSpec)>,
    tween: Tween,
    looping: bool,
    destroy_on_complete: bool,
}

impl Anim {
    /// `duration_secs` is the length of one run in seconds.
    #[must_use]
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration: duration_secs.max(0.0),
            target: None,
            props: Vec::new(),
            tween: Tween::default(),
            looping: false,
            destroy_on_complete: true,
        }
    }

    #[must_use]
    pub fn target(mut self, target: Rc<dyn StyleTarget>) -> Self {
        self.target = Some(target);
        self
    }

    /// Animate the target's `accessor`. Adding the same accessor again replaces it.
    #[must_use]
    pub fn prop(mut self, accessor: &str, spec: PropSpec) -> Self {
        if let Some(slot) = self.props.iter_mut().find(|(name, _)| name == accessor) {
            slot.1 = spec;
        } else {
            self.props.push((accessor.to_owned(), spec));
        }
        self
    }

    #[must_use]
    pub fn tween(mut self, tween: Tween) -> Self {
        self.tween = tween;
        self
    }

    #[must_use]
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    #[must_use]
    pub fn destroy_on_complete(mut self, destroy: bool) -> Self {
        self.destroy_on_complete = destroy;
        self
    }

    fn frame(&self, progress: f32) -> Vec<(String, String)> {
        let eased = self.tween.apply(progress);
        self.props
            .iter()
            .map(|(accessor, spec)| (accessor.clone(), spec.template.render(spec.value_at(eased))))
            .collect()
    }
}

type AnimCallback = Rc<dyn Fn(&AnimHandle)>;

struct AnimState {
    anim: Anim,
    elapsed: f32,
    playing: bool,
    destroyed: bool,
    listeners: Vec<(AnimEvent, AnimCallback)>,
}

#[derive(Default)]
struct TimelineState {
    active: Vec<Rc<RefCell<AnimState>>>,
}

/// Drives every playing animation registered with it.
#[derive(Clone, Default)]
pub struct Timeline {
    state: Rc<RefCell<TimelineState>>,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation without starting it.
    pub fn add(&self, anim: Anim) -> AnimHandle {
        AnimHandle {
            state: Rc::new(RefCell::new(AnimState {
                anim,
                elapsed: 0.0,
                playing: false,
                destroyed: false,
                listeners: Vec::new(),
            })),
            timeline: Rc::downgrade(&self.state),
        }
    }

    /// Advance all playing animations by `delta`.
    pub fn tick(&self, delta: Duration) {
        let playing: Vec<Rc<RefCell<AnimState>>> =
            self.state.borrow().active.iter().map(Rc::clone).collect();
        trace!(target: "anim", "tick {delta:?} over {} animations", playing.len());
        for state in playing {
            let handle = AnimHandle {
                state,
                timeline: Rc::downgrade(&self.state),
            };
            handle.advance(delta.as_secs_f32());
        }
    }

    pub fn active_count(&self) -> usize {
        self.state.borrow().active.len()
    }

    pub fn is_idle(&self) -> bool {
        self.active_count() == 0
    }
}

/// Shared handle to a registered animation.
#[derive(Clone)]
pub struct AnimHandle {
    state: Rc<RefCell<AnimState>>,
    timeline: Weak<RefCell<TimelineState>>,
}

impl AnimHandle {
    /// Start from the beginning, writing the first frame immediately and
    /// reporting it as a `Frame` after `Start`.
    ///
    /// # Errors
    /// Fails once the animation has been destroyed, or when it has no target.
    pub fn start(&self) -> Result<&Self, AnimError> {
        let (writes, target) = {
            let mut state = self.state.borrow_mut();
            if state.destroyed {
                return Err(AnimError::Destroyed);
            }
            let target = state.anim.target.as_ref().map(Rc::clone).ok_or(AnimError::NoTarget)?;
            state.elapsed = 0.0;
            state.playing = true;
            (state.anim.frame(0.0), target)
        };
        self.register();
        debug!(target: "anim", "start: {} props over {}s", writes.len(), self.duration());
        self.emit(AnimEvent::Start);
        for (accessor, value) in &writes {
            target.set_style(accessor, value);
        }
        self.emit(AnimEvent::Frame);
        Ok(self)
    }

    /// Halt where it is. Stopping an idle animation does nothing.
    pub fn stop(&self) -> &Self {
        let was_playing = {
            let mut state = self.state.borrow_mut();
            core::mem::replace(&mut state.playing, false)
        };
        if was_playing {
            self.unregister();
            debug!(target: "anim", "stopped at {}s", self.position());
            self.emit(AnimEvent::Stop);
        }
        self
    }

    /// Stop and release the target and listeners; the handle can't restart.
    pub fn destroy(&self) {
        self.stop();
        let mut state = self.state.borrow_mut();
        state.destroyed = true;
        state.anim.target = None;
        state.listeners.clear();
    }

    /// Subscribe to a lifecycle event.
    pub fn on(&self, event: AnimEvent, callback: impl Fn(&Self) + 'static) -> &Self {
        self.state
            .borrow_mut()
            .listeners
            .push((event, Rc::new(callback)));
        self
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    /// Seconds into the current run.
    pub fn position(&self) -> f32 {
        self.state.borrow().elapsed
    }

    pub fn duration(&self) -> f32 {
        self.state.borrow().anim.duration
    }

    /// The animated properties, in registration order.
    pub fn props(&self) -> Vec<(String, PropSpec)> {
        self.state.borrow().anim.props.clone()
    }

    pub fn tween_name(&self) -> &'static str {
        self.state.borrow().anim.tween.name()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    fn register(&self) {
        if let Some(timeline) = self.timeline.upgrade() {
            let mut timeline = timeline.borrow_mut();
            if !timeline.active.iter().any(|state| Rc::ptr_eq(state, &self.state)) {
                timeline.active.push(Rc::clone(&self.state));
            }
        }
    }

    fn unregister(&self) {
        if let Some(timeline) = self.timeline.upgrade() {
            timeline
                .borrow_mut()
                .active
                .retain(|state| !Rc::ptr_eq(state, &self.state));
        }
    }

    fn emit(&self, event: AnimEvent) {
        let callbacks: Vec<AnimCallback> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|(kind, _)| *kind == event)
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(self);
        }
    }

    fn advance(&self, secs: f32) {
        let (writes, target, completed, destroy) = {
            let mut state = self.state.borrow_mut();
            if !state.playing {
                return;
            }
            state.elapsed += secs;
            let duration = state.anim.duration;
            let mut completed = false;
            let progress = if state.elapsed < duration {
                state.elapsed / duration
            } else if state.anim.looping && duration > 0.0 {
                state.elapsed %= duration;
                state.elapsed / duration
            } else {
                state.elapsed = duration;
                state.playing = false;
                completed = true;
                1.0
            };
            (
                state.anim.frame(progress),
                state.anim.target.as_ref().map(Rc::clone),
                completed,
                state.anim.destroy_on_complete,
            )
        };
        if let Some(style_target) = target {
            for (accessor, value) in &writes {
                style_target.set_style(accessor, value);
            }
        }
        self.emit(AnimEvent::Frame);
        if completed {
            self.unregister();
            debug!(target: "anim", "complete after {}s", self.duration());
            self.emit(AnimEvent::Complete);
            if destroy {
                self.destroy();
            }
        }
    }
}
