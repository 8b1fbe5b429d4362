//! Small interpolation layer shared by every animated element. The scene
//! turns these into SMIL/CSS timing attributes; interactive hosts can drive
//! them from their own frame clock.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseOut,
    /// Underdamped spring approximation, used for hover label nudges.
    Spring,
}

impl Easing {
    /// Maps normalized time `t` in [0, 1] to progress. Input outside the
    /// range is clamped.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::Spring => 1.0 - (-6.0 * t).exp() * (12.0 * t).cos(),
        }
    }

    pub fn css_timing(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseOut => "cubic-bezier(0.33, 1, 0.68, 1)",
            Self::Spring => "cubic-bezier(0.34, 1.56, 0.64, 1)",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub delay: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            delay: 0.0,
            easing: Easing::Linear,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Value at wall-clock time `now` (seconds since the tween was armed).
    /// Holds the start value through the delay and the end value forever
    /// after completion.
    pub fn sample(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (now - self.delay) / self.duration;
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn finished(&self, now: f32) -> bool {
        now >= self.delay + self.duration
    }
}

/// Entry delay for the `index`-th element of a staggered group.
pub fn stagger(index: usize, step: f32) -> f32 {
    index as f32 * step
}
