/// Animates the scroll position from one offset to another over a fixed duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollTween {
    from: u64,
    to: u64,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
}

impl ScrollTween {
    pub fn new(from: u64, to: u64, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
        }
    }

    pub fn from(&self) -> u64 {
        self.from
    }

    pub fn target(&self) -> u64 {
        self.to
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// A zero-length tween, or one that doesn't move, finishes immediately.
    pub fn is_done(&self, now_ms: u64) -> bool {
        self.from == self.to || now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Scroll offset at `now_ms`. Lands exactly on the target once done.
    pub fn offset_at(&self, now_ms: u64) -> u64 {
        if self.is_done(now_ms) {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = elapsed as f64 / self.duration_ms as f64;
        let progress = self.easing.apply(t);

        let from = self.from as f64;
        let to = self.to as f64;
        let offset = from + (to - from) * progress;
        if offset <= 0.0 { 0 } else { offset as u64 }
    }

    /// Restarts the tween from its current position towards a new target.
    pub fn redirect(&mut self, now_ms: u64, to: u64) {
        let here = self.offset_at(now_ms);
        *self = Self::new(here, to, now_ms, self.duration_ms, self.easing);
    }
}

/// Progress curve of a [`ScrollTween`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    /// Browser-like smooth scrolling: fast start, gentle landing.
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 - 2.0 * t;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}
