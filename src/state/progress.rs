//! Progress gauge animation state

use std::time::{Duration, Instant};

/// Eased transition of the progress percentage between steps
#[derive(Debug, Clone)]
pub struct ProgressAnimation {
    /// When the current transition started; `None` while at rest
    pub start_time: Option<Instant>,
    /// Percentage shown when the transition started
    pub from: f64,
    /// Percentage the gauge is heading to
    pub to: f64,
}

impl ProgressAnimation {
    /// Length of one transition
    const ANIMATION_DURATION: Duration = Duration::from_millis(300);

    /// Start at rest on `percent`
    pub fn new(percent: f64) -> Self {
        Self {
            start_time: None,
            from: percent,
            to: percent,
        }
    }

    /// Begin animating from the currently shown value towards `percent`
    pub fn retarget(&mut self, percent: f64) {
        self.from = self.value();
        self.to = percent;
        self.start_time = Some(Instant::now());
    }

    /// Jump straight to `percent` without animating
    pub fn settle(&mut self, percent: f64) {
        *self = Self::new(percent);
    }

    /// Percentage to draw right now
    pub fn value(&self) -> f64 {
        match self.start_time {
            Some(start) => self.value_at(start.elapsed()),
            None => self.to,
        }
    }

    /// Percentage `elapsed` into the transition
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if elapsed >= Self::ANIMATION_DURATION {
            return self.to;
        }
        let progress = elapsed.as_secs_f32() / Self::ANIMATION_DURATION.as_secs_f32();
        // Cubic ease-out for smooth deceleration
        let eased = f64::from(simple_easing::cubic_out(progress));
        self.from + (self.to - self.from) * eased
    }

    pub fn is_animating(&self) -> bool {
        self.start_time
            .is_some_and(|start| start.elapsed() < Self::ANIMATION_DURATION)
    }
}
