//! Easing curves mapping linear progress `0..=1` to eased progress.
//!
//! Ease curves take a strength (the exponent, 2 by default). Overshoot
//! curves may leave `0..=1` mid-animation but always end at exactly 1.

use core::f32::consts::PI;
use core::fmt;
use std::rc::Rc;

const DEFAULT_STRENGTH: f32 = 2.0;
const DEFAULT_OVERSHOOT: f32 = 1.701_58;

/// A shared easing function.
#[derive(Clone)]
pub struct Tween {
    name: &'static str,
    curve: Rc<dyn Fn(f32) -> f32>,
}

impl Tween {
    fn named(name: &'static str, curve: impl Fn(f32) -> f32 + 'static) -> Self {
        Self {
            name,
            curve: Rc::new(curve),
        }
    }

    /// Wrap any function of progress.
    pub fn custom(curve: impl Fn(f32) -> f32 + 'static) -> Self {
        Self::named("custom", curve)
    }

    #[must_use]
    pub fn linear() -> Self {
        Self::named("linear", |progress| progress)
    }

    #[must_use]
    pub fn ease_in(strength: f32) -> Self {
        Self::named("easeIn", move |progress| progress.powf(strength))
    }

    #[must_use]
    pub fn ease_out(strength: f32) -> Self {
        Self::named("easeOut", move |progress| {
            1.0 - (1.0 - progress).powf(strength)
        })
    }

    #[must_use]
    pub fn ease_both(strength: f32) -> Self {
        Self::named("easeBoth", move |progress| {
            if progress < 0.5 {
                (2.0 * progress).powf(strength) / 2.0
            } else {
                1.0 - (2.0 - 2.0 * progress).powf(strength) / 2.0
            }
        })
    }

    #[must_use]
    pub fn overshoot_in(amount: f32) -> Self {
        Self::named("overshootIn", move |progress| {
            progress * progress * ((amount + 1.0) * progress - amount)
        })
    }

    #[must_use]
    pub fn overshoot_out(amount: f32) -> Self {
        Self::named("overshootOut", move |progress| {
            let rest = progress - 1.0;
            rest * rest * ((amount + 1.0) * rest + amount) + 1.0
        })
    }

    #[must_use]
    pub fn overshoot_both(amount: f32) -> Self {
        let scaled = amount * 1.525;
        Self::named("overshootBoth", move |progress| {
            let doubled = progress * 2.0;
            if doubled < 1.0 {
                doubled * doubled * ((scaled + 1.0) * doubled - scaled) / 2.0
            } else {
                let rest = doubled - 2.0;
                (rest * rest * ((scaled + 1.0) * rest + scaled) + 2.0) / 2.0
            }
        })
    }

    #[must_use]
    pub fn bounce_out() -> Self {
        Self::named("bounceOut", bounce_out)
    }

    #[must_use]
    pub fn elastic_out(period: f32) -> Self {
        Self::named("elasticOut", move |progress| {
            if progress <= 0.0 || progress >= 1.0 {
                return progress.clamp(0.0, 1.0);
            }
            let shift = period / 4.0;
            (-10.0 * progress).exp2() * ((progress - shift) * (2.0 * PI) / period).sin() + 1.0
        })
    }

    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    #[must_use]
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::named("cubicBezier", move |progress| {
            cubic_bezier(progress, x1, y1, x2, y2)
        })
    }

    /// Look up a tween by its script name (`"easeBoth"`, `"linear"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let tween = match name {
            "linear" => Self::linear(),
            "easeIn" => Self::ease_in(DEFAULT_STRENGTH),
            "easeOut" => Self::ease_out(DEFAULT_STRENGTH),
            "easeBoth" => Self::ease_both(DEFAULT_STRENGTH),
            "overshootIn" => Self::overshoot_in(DEFAULT_OVERSHOOT),
            "overshootOut" => Self::overshoot_out(DEFAULT_OVERSHOOT),
            "overshootBoth" => Self::overshoot_both(DEFAULT_OVERSHOOT),
            "bounceOut" => Self::bounce_out(),
            "elasticOut" => Self::elastic_out(0.3),
            _ => return None,
        };
        Some(tween)
    }

    /// Eased progress; input is clamped to `0..=1`.
    #[must_use]
    pub fn apply(&self, progress: f32) -> f32 {
        (self.curve)(progress.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for Tween {
    fn default() -> Self {
        Self::ease_both(DEFAULT_STRENGTH)
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Tween").field(&self.name).finish()
    }
}

fn bounce_out(progress: f32) -> f32 {
    const SCALE: f32 = 7.5625;
    const STEP: f32 = 2.75;
    if progress < 1.0 / STEP {
        SCALE * progress * progress
    } else if progress < 2.0 / STEP {
        let shifted = progress - 1.5 / STEP;
        SCALE * shifted * shifted + 0.75
    } else if progress < 2.5 / STEP {
        let shifted = progress - 2.25 / STEP;
        SCALE * shifted * shifted + 0.9375
    } else {
        let shifted = progress - 2.625 / STEP;
        SCALE * shifted * shifted + 0.984_375
    }
}

/// Evaluate a cubic-bezier timing curve at input progress `progress`.
///
/// Newton-Raphson inverts the x polynomial, then y is sampled at the
/// solved parameter.
fn cubic_bezier(progress: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let sample = |param: f32, ctrl1: f32, ctrl2: f32| -> f32 {
        let inverse = 1.0 - param;
        3.0 * inverse * inverse * param * ctrl1 + 3.0 * inverse * param * param * ctrl2 + param.powi(3)
    };
    let slope = |param: f32| -> f32 {
        let linear = 3.0 * x1;
        let quadratic = 3.0 * (x2 - x1) - linear;
        let cubic = 1.0 - linear - quadratic;
        linear + 2.0 * quadratic * param + 3.0 * cubic * param * param
    };

    let mut param = progress;
    for _ in 0..8 {
        let error = sample(param, x1, x2) - progress;
        let derivative = slope(param);
        if derivative.abs() < 1e-7 {
            break;
        }
        param = (param - error / derivative).clamp(0.0, 1.0);
    }
    sample(param, y1, y2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(left: f32, right: f32) -> bool {
        (left - right).abs() < 1e-3
    }

    #[test]
    fn every_named_tween_spans_zero_to_one() {
        for name in [
            "linear",
            "easeIn",
            "easeOut",
            "easeBoth",
            "overshootIn",
            "overshootOut",
            "overshootBoth",
            "bounceOut",
            "elasticOut",
        ] {
            let tween = Tween::from_name(name);
            assert!(tween.as_ref().is_some_and(|curve| close(curve.apply(0.0), 0.0)), "{name} at 0");
            assert!(tween.as_ref().is_some_and(|curve| close(curve.apply(1.0), 1.0)), "{name} at 1");
        }
        assert!(Tween::from_name("wobble").is_none());
    }

    #[test]
    fn ease_both_is_symmetric() {
        let tween = Tween::default();
        assert!(close(tween.apply(0.5), 0.5));
        assert!(close(tween.apply(0.25), 1.0 - tween.apply(0.75)));
        assert!(tween.apply(0.25) < 0.25);
    }

    #[test]
    fn overshoot_leaves_the_range() {
        assert!(Tween::overshoot_in(DEFAULT_OVERSHOOT).apply(0.2) < 0.0);
        assert!(Tween::overshoot_out(DEFAULT_OVERSHOOT).apply(0.8) > 1.0);
    }

    #[test]
    fn cubic_bezier_matches_css_ease() {
        let ease = Tween::cubic_bezier(0.25, 0.1, 0.25, 1.0);
        assert!(close(ease.apply(0.5), 0.8024));
        let linear = Tween::cubic_bezier(0.0, 0.0, 1.0, 1.0);
        assert!(close(linear.apply(0.3), 0.3));
    }
}
