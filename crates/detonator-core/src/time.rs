use serde::{Deserialize, Serialize};

/// A timer counting down from a fixed total toward zero.
///
/// The raw remaining value may dip below zero after the tick that expires
/// it; every accessor reports it clamped to `[0, total]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    total: f32,
    remaining: f32,
}

impl Countdown {
    pub fn new(total: f32) -> Self {
        Self {
            total,
            remaining: total,
        }
    }

    /// Advance by `dt`. Returns true if the timer is at or below zero afterwards.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= sanitize_dt(dt);
        self.is_expired()
    }

    /// Jump straight to zero.
    pub fn expire(&mut self) {
        self.remaining = 0.0;
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    /// Time left, never negative.
    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    pub fn elapsed(&self) -> f32 {
        self.total - self.remaining()
    }

    /// Elapsed share of the total in `[0, 1]`. A zero-length timer is complete.
    pub fn progress(&self) -> f32 {
        if self.total <= 0.0 {
            return 1.0;
        }
        (self.elapsed() / self.total).clamp(0.0, 1.0)
    }
}

/// Replace NaN, infinite and negative step sizes with zero.
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_expires_once_crossing_zero() {
        let mut c = Countdown::new(1.0);
        assert!(!c.tick(0.5));
        assert!(c.tick(0.6));
        assert!(c.is_expired());
    }

    #[test]
    fn remaining_never_negative() {
        let mut c = Countdown::new(1.0);
        c.tick(5.0);
        assert_eq!(c.remaining(), 0.0);
        assert_eq!(c.progress(), 1.0);
    }

    #[test]
    fn expire_zeroes_timer() {
        let mut c = Countdown::new(3.0);
        c.expire();
        assert!(c.is_expired());
        assert_eq!(c.remaining(), 0.0);
    }

    #[test]
    fn progress_tracks_elapsed_share() {
        let mut c = Countdown::new(2.0);
        c.tick(0.5);
        assert!((c.progress() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn zero_length_is_complete() {
        let c = Countdown::new(0.0);
        assert!(c.is_expired());
        assert_eq!(c.progress(), 1.0);
    }

    #[test]
    fn bad_steps_do_not_move_timer() {
        let mut c = Countdown::new(1.0);
        assert!(!c.tick(f32::NAN));
        assert!(!c.tick(-3.0));
        assert_eq!(c.remaining(), 1.0);
    }

    #[test]
    fn sanitize_rejects_bad_steps() {
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY), 0.0);
        assert_eq!(sanitize_dt(-0.1), 0.0);
        assert_eq!(sanitize_dt(0.016), 0.016);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn accessors_stay_in_range(
                total in 0.0f32..10.0,
                steps in proptest::collection::vec(-1.0f32..2.0, 0..32),
            ) {
                let mut c = Countdown::new(total);
                for dt in steps {
                    c.tick(dt);
                    prop_assert!(c.remaining() >= 0.0 && c.remaining() <= total);
                    prop_assert!((0.0..=1.0).contains(&c.progress()));
                }
            }
        }
    }
}
