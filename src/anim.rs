//! The animation scheduler: an explicit `Idle`/`Animating` state machine
//! over the timeline position, driven by a single `tick(now)` entry point.
//!
//! The scheduler never touches a real clock. The host's per-frame callback
//! (vsync timer, test loop, anything) feeds timestamps in; that keeps the
//! scheduling policy unit-testable with synthetic time.

use crate::anim_ease::Ease;

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Idle,
    Animating {
        target: f64,
        start_value: f64,
        start_ms: f64,
        duration_ms: f64,
        ease: Ease,
    },
}

/// Drives one timeline's continuous position over wall-clock time. At most
/// one animation is active; starting a new one implicitly cancels the
/// previous (no queueing).
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    value: f64,
    state: State,
}

impl Player {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            state: State::Idle,
        }
    }

    /// Current position. Between ticks this is the last rendered value.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, State::Animating { .. })
    }

    /// Cancel any running animation and jump to `value`. The caller renders
    /// once afterwards.
    pub fn set_value(&mut self, value: f64) {
        self.cancel();
        self.value = value;
    }

    /// Start animating toward `target`. A non-finite or non-positive
    /// duration, or [`Ease::None`], degrades to [`Player::set_value`].
    ///
    /// [`Ease::ConstantSpeed`] reinterprets `duration_ms` as milliseconds
    /// per unit of distance: the effective duration is
    /// `duration_ms * |target - value|`, after which it behaves as linear.
    pub fn animate_to(&mut self, target: f64, duration_ms: f64, ease: Ease, now_ms: f64) {
        self.cancel();

        let mut duration_ms = duration_ms;
        let mut ease = ease;
        if ease == Ease::ConstantSpeed {
            duration_ms *= (target - self.value).abs();
            ease = Ease::Linear;
        }
        if !duration_ms.is_finite() || duration_ms <= 0.0 || ease == Ease::None {
            self.set_value(target);
            return;
        }

        self.state = State::Animating {
            target,
            start_value: self.value,
            start_ms: now_ms,
            duration_ms,
            ease,
        };
    }

    /// Idempotent; safe to call from `Idle`. After it returns no further
    /// tick advances the value until a new animation starts, and the value
    /// stays exactly where the last tick left it.
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }

    /// Advance to `now_ms` and return the position to render. Idle ticks
    /// return the value unchanged.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let State::Animating {
            target,
            start_value,
            start_ms,
            duration_ms,
            ease,
        } = self.state
        else {
            return self.value;
        };

        let elapsed = (now_ms - start_ms).max(0.0);
        let progress = (elapsed / duration_ms).min(1.0);
        self.value = lerp(start_value, target, ease.apply(progress));
        if progress >= 1.0 {
            self.value = target;
            self.state = State::Idle;
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_animation_hits_midpoint_and_end() {
        let mut p = Player::new(0.0);
        p.animate_to(3.0, 1000.0, Ease::Linear, 0.0);
        assert!((p.tick(500.0) - 1.5).abs() < 1e-9);
        assert_eq!(p.tick(1000.0), 3.0);
        assert!(!p.is_animating());
    }

    #[test]
    fn cancel_freezes_the_last_rendered_value() {
        let mut p = Player::new(0.0);
        p.animate_to(3.0, 1000.0, Ease::Linear, 0.0);
        let mid = p.tick(500.0);
        p.cancel();
        assert_eq!(p.value(), mid);
        // Later ticks change nothing.
        assert_eq!(p.tick(900.0), mid);
        assert_eq!(p.tick(2000.0), mid);
    }

    #[test]
    fn cancel_is_idempotent_and_safe_from_idle() {
        let mut p = Player::new(1.0);
        p.cancel();
        p.cancel();
        assert_eq!(p.value(), 1.0);
        // Still able to accept new work immediately.
        p.animate_to(2.0, 10.0, Ease::Linear, 0.0);
        assert!(p.is_animating());
    }

    #[test]
    fn set_value_cancels_running_animation() {
        let mut p = Player::new(0.0);
        p.animate_to(5.0, 1000.0, Ease::Linear, 0.0);
        p.set_value(2.0);
        assert!(!p.is_animating());
        assert_eq!(p.tick(700.0), 2.0);
    }

    #[test]
    fn starting_a_new_animation_replaces_the_old_one() {
        let mut p = Player::new(0.0);
        p.animate_to(10.0, 1000.0, Ease::Linear, 0.0);
        p.tick(500.0);
        p.animate_to(0.0, 1000.0, Ease::Linear, 500.0);
        // Halfway back from 5.0 toward 0.0.
        assert!((p.tick(1000.0) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_durations_and_none_jump() {
        let mut p = Player::new(0.0);
        p.animate_to(4.0, 0.0, Ease::Linear, 0.0);
        assert_eq!(p.value(), 4.0);
        assert!(!p.is_animating());

        p.animate_to(6.0, f64::INFINITY, Ease::Linear, 0.0);
        assert_eq!(p.value(), 6.0);

        p.animate_to(8.0, 1000.0, Ease::None, 0.0);
        assert_eq!(p.value(), 8.0);
    }

    #[test]
    fn constant_speed_scales_duration_by_distance() {
        let mut p = Player::new(1.0);
        // 100 ms per unit over 3 units: 300 ms total, linear.
        p.animate_to(4.0, 100.0, Ease::ConstantSpeed, 0.0);
        assert!((p.tick(150.0) - 2.5).abs() < 1e-9);
        assert_eq!(p.tick(300.0), 4.0);
        assert!(!p.is_animating());
    }

    #[test]
    fn constant_speed_with_zero_distance_jumps() {
        let mut p = Player::new(2.0);
        p.animate_to(2.0, 100.0, Ease::ConstantSpeed, 0.0);
        assert!(!p.is_animating());
        assert_eq!(p.value(), 2.0);
    }

    #[test]
    fn cubic_ease_is_slow_at_the_edges() {
        let mut p = Player::new(0.0);
        p.animate_to(1.0, 1000.0, Ease::CubicInOut, 0.0);
        let early = p.tick(100.0);
        assert!(early < 0.1);
        let mid = p.tick(500.0);
        assert!((mid - 0.5).abs() < 1e-9);
        assert_eq!(p.tick(1000.0), 1.0);
    }

    #[test]
    fn ticks_before_start_do_not_rewind() {
        let mut p = Player::new(1.0);
        p.animate_to(2.0, 100.0, Ease::Linear, 1000.0);
        assert_eq!(p.tick(900.0), 1.0);
        assert!(p.is_animating());
    }
}
