//! Frame-driven property tweening.
//!
//! An [`Anim`] describes numeric properties to move from one value to another
//! over a duration. Adding it to a [`Timeline`] yields an [`AnimHandle`]; the
//! host advances the timeline with [`Timeline::tick`] and each frame writes
//! `template(value)` strings into the animation's [`StyleTarget`].

mod template;
mod timeline;
mod tween;

pub use template::Template;
pub use timeline::{Anim, AnimEvent, AnimHandle, PropSpec, StyleTarget, Timeline};
pub use tween::Tween;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnimError {
    #[error("animation was destroyed")]
    Destroyed,
    #[error("animation has no target")]
    NoTarget,
    #[error("template `{0}` has no `?` placeholder")]
    BadTemplate(String),
}
