//! Easing curves and tween descriptors.
//!
//! A [`Tween`] is a plain value describing "go from `from` to `to` over
//! `duration` seconds starting at `start`". It holds no clock of its own: the
//! caller evaluates it against the current time once per tick.

/// Easing curve applied to normalized time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Quadratic ease-out: fast start, soft landing.
    QuadOut,
    /// Quadratic ease-in-out.
    QuadInOut,
    /// Cubic ease-in-out, a stronger S-curve than [`Easing::QuadInOut`].
    CubicInOut,
}

impl Easing {
    /// Map normalized time `t` in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Evaluate an eased transition from `from` to `to`.
///
/// `elapsed` is clamped to `[0, duration]`; a non-positive duration jumps
/// straight to `to`.
pub fn ease(kind: Easing, from: f32, to: f32, duration: f32, elapsed: f32) -> f32 {
    if duration <= 0.0 {
        return to;
    }
    let t = (elapsed / duration).clamp(0.0, 1.0);
    if t >= 1.0 {
        return to;
    }
    from + (to - from) * kind.apply(t)
}

/// A scheduled transition of a single scalar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Start time in clock seconds.
    pub start: f32,
    /// Duration in seconds.
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    /// Value at clock time `now`.
    #[inline]
    pub fn value_at(&self, now: f32) -> f32 {
        ease(self.easing, self.from, self.to, self.duration, now - self.start)
    }

    /// Clock time at which the tween reaches `to`.
    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.duration.max(0.0)
    }

    #[inline]
    pub fn is_finished(&self, now: f32) -> bool {
        now >= self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for kind in [Easing::Linear, Easing::QuadOut, Easing::QuadInOut, Easing::CubicInOut] {
            assert_eq!(kind.apply(0.0), 0.0);
            assert_eq!(kind.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_in_out_midpoint() {
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
        // Cubic is slower off the mark than quadratic
        assert!(Easing::CubicInOut.apply(0.2) < Easing::QuadInOut.apply(0.2));
    }

    #[test]
    fn test_quad_out_is_front_loaded() {
        assert!(Easing::QuadOut.apply(0.5) > 0.5);
        assert!((Easing::QuadOut.apply(0.5) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_ease_clamps_elapsed() {
        assert_eq!(ease(Easing::Linear, 2.0, 4.0, 1.0, -1.0), 2.0);
        assert_eq!(ease(Easing::Linear, 2.0, 4.0, 1.0, 5.0), 4.0);
        assert!((ease(Easing::Linear, 2.0, 4.0, 1.0, 0.25) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_jumps() {
        assert_eq!(ease(Easing::QuadOut, 0.0, 1.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_tween_schedule() {
        let tween = Tween::new(1.0, 0.0, 10.0, 2.0, Easing::Linear);
        assert_eq!(tween.value_at(9.0), 1.0);
        assert!((tween.value_at(11.0) - 0.5).abs() < 1e-6);
        assert_eq!(tween.end(), 12.0);
        assert!(!tween.is_finished(11.9));
        assert!(tween.is_finished(12.0));
        assert_eq!(tween.value_at(12.0), 0.0);
    }
}
