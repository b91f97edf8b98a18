/// A single cancelable deadline on the host-driven clock.
///
/// Scheduling replaces any previous deadline, so at most one firing is ever pending.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deadline {
    at_ms: Option<u64>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64) {
        self.at_ms = Some(now_ms.saturating_add(delay_ms));
    }

    pub fn cancel(&mut self) {
        self.at_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.at_ms.is_some()
    }

    pub fn at_ms(&self) -> Option<u64> {
        self.at_ms
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        self.at_ms.is_some_and(|at| now_ms >= at)
    }

    /// Clears the deadline and returns `true` if it was due at `now_ms`.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        if self.is_due(now_ms) {
            self.at_ms = None;
            return true;
        }
        false
    }
}

pub(crate) fn earliest(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
