use std::f32::consts::PI;

/// Explicit elapsed/duration record for a time-based animation step.
///
/// A zero (or negative) duration reports full progress immediately, so an
/// animation configured with no duration completes on its first tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationTimer {
    elapsed: f32,
    duration: f32,
}

impl AnimationTimer {
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    /// Advance by `dt` seconds and return the new progress.
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.max(0.0);
        self.progress()
    }

    /// Fraction of the duration elapsed, clamped to `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Half sine bump: 0 at both ends, 1 at `progress = 0.5`.
pub fn sine_bump(progress: f32) -> f32 {
    (progress.clamp(0.0, 1.0) * PI).sin().max(0.0)
}

/// Triangle wave over `[0, 1]` with the given half-period.
pub fn ping_pong(time: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let t = time.rem_euclid(length * 2.0);
    let value = if t < length { t } else { length * 2.0 - t };
    value / length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        let mut timer = AnimationTimer::new(2.0);
        assert_eq!(timer.progress(), 0.0);
        assert_eq!(timer.tick(0.5), 0.25);
        assert_eq!(timer.tick(10.0), 1.0);
        assert!(timer.is_finished());
        assert_eq!(timer.tick(-3.0), 1.0);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let timer = AnimationTimer::new(0.0);
        assert_eq!(timer.progress(), 1.0);
        assert!(timer.is_finished());
        assert!(AnimationTimer::new(-1.0).is_finished());
    }

    #[test]
    fn sine_bump_peaks_in_the_middle() {
        assert_eq!(sine_bump(0.0), 0.0);
        assert!((sine_bump(0.5) - 1.0).abs() < 1e-6);
        assert!(sine_bump(1.0) < 1e-6);
    }

    #[test]
    fn ping_pong_bounces() {
        assert_eq!(ping_pong(0.0, 1.0), 0.0);
        assert!((ping_pong(0.5, 1.0) - 0.5).abs() < 1e-6);
        assert!((ping_pong(1.0, 1.0) - 1.0).abs() < 1e-6);
        assert!((ping_pong(1.5, 1.0) - 0.5).abs() < 1e-6);
        assert!(ping_pong(2.0, 1.0).abs() < 1e-6);
        assert_eq!(ping_pong(3.0, 0.0), 0.0);
    }
}
