use alloc::string::String;

use clusterlist::{ClusterList, ClusterListOptions, Error, RecordSource, Result};

use crate::{Easing, MemorySurface, NavigationInput, ScrollTween, ViewportTracker};

/// A complete, UI-free host for a [`ClusterList`].
///
/// It wires the engine to a [`MemorySurface`] and a [`ViewportTracker`], animates the scroll
/// requests the engine makes, and tells the engine when such a scroll has finished. Time is
/// virtual: every call takes `now_ms`.
///
/// Drive it by calling:
/// - `init(now_ms)` once
/// - `scroll_to(offset, now_ms)` for user scrolling
/// - `tick(now_ms)` every frame, or at least at `next_deadline()` while not animating
/// - `submit_jump` / `key_press` / `jump_to` for navigation
pub struct HeadlessHost<S: RecordSource> {
    list: ClusterList<S, MemorySurface, ViewportTracker>,
    input: NavigationInput,
    tween: Option<ScrollTween>,
    smooth_scroll_ms: u64,
    easing: Easing,
    alert: Option<String>,
}

impl<S: RecordSource> HeadlessHost<S> {
    pub fn new(options: ClusterListOptions, source: S, surface: MemorySurface) -> Self {
        Self {
            list: ClusterList::new(options, source, surface, ViewportTracker::new()),
            input: NavigationInput::new(),
            tween: None,
            smooth_scroll_ms: 400,
            easing: Easing::default(),
            alert: None,
        }
    }

    /// Sets the duration and curve of animated scrolls started by jumps.
    pub fn with_smooth_scroll(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.smooth_scroll_ms = duration_ms;
        self.easing = easing;
        self
    }

    pub fn list(&self) -> &ClusterList<S, MemorySurface, ViewportTracker> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ClusterList<S, MemorySurface, ViewportTracker> {
        &mut self.list
    }

    pub fn surface(&self) -> &MemorySurface {
        self.list.surface()
    }

    pub fn input(&self) -> &NavigationInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut NavigationInput {
        &mut self.input
    }

    /// The last message shown to the user, if any.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn scroll_offset(&self) -> u64 {
        self.list.surface().scroll_offset()
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Renders the list and delivers the initial visibility of every cluster.
    pub fn init(&mut self, now_ms: u64) {
        self.tween = None;
        self.alert = None;
        self.list.init(now_ms);
        self.pump(now_ms);
    }

    pub fn dispose(&mut self, now_ms: u64) {
        self.tween = None;
        self.list.dispose(now_ms);
    }

    /// A user scroll. Cancels a running animation.
    ///
    /// Returns the applied (clamped) offset.
    pub fn scroll_to(&mut self, offset: u64, now_ms: u64) -> u64 {
        if self.tween.take().is_some() {
            cdebug!(offset, "user scroll cancelled the animation");
        }
        let applied = self.list.surface_mut().set_scroll_offset(offset);
        self.pump(now_ms);
        applied
    }

    /// Advances engine timers and the scroll animation, then reports visibility changes.
    ///
    /// Returns the new scroll offset while an animation is running.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        self.list.tick(now_ms);

        if let Some(request) = self.list.surface_mut().take_scroll_request() {
            let from = self.list.surface().scroll_offset();
            self.tween = Some(match self.tween {
                Some(mut running) => {
                    running.redirect(now_ms, request.offset);
                    running
                }
                None => ScrollTween::new(
                    from,
                    request.offset,
                    now_ms,
                    self.smooth_scroll_ms,
                    self.easing,
                ),
            });
        }

        let moved = match self.tween {
            Some(tween) => {
                let offset = self.list.surface_mut().set_scroll_offset(tween.offset_at(now_ms));
                if tween.is_done(now_ms) {
                    self.tween = None;
                    self.list.scroll_settled(now_ms);
                }
                Some(offset)
            }
            None => None,
        };

        self.pump(now_ms);
        moved
    }

    /// When the host has to tick next if nothing else happens. Animations need every frame.
    pub fn next_deadline(&self) -> Option<u64> {
        self.list.next_deadline()
    }

    /// The jump button: jumps to the typed row, or does nothing if the text is not a number.
    ///
    /// Returns whether a jump was started.
    pub fn submit_jump(&mut self, now_ms: u64) -> Result<bool> {
        match self.input.click() {
            Some(index) => self.jump_to(index, now_ms).map(|()| true),
            None => {
                cdebug!(text = self.input.text(), "jump input ignored");
                Ok(false)
            }
        }
    }

    /// A key press in the jump field; only Enter submits.
    pub fn key_press(&mut self, key: &str, now_ms: u64) -> Result<bool> {
        match self.input.key(key) {
            Some(index) => self.jump_to(index, now_ms).map(|()| true),
            None => Ok(false),
        }
    }

    /// Jumps to a row. Out-of-range rows are rejected with a message for the user.
    pub fn jump_to(&mut self, index: i64, now_ms: u64) -> Result<()> {
        let count = self.list.source().count();
        let valid = usize::try_from(index).ok().filter(|&i| i < count);
        let Some(record_index) = valid else {
            let err = Error::InvalidIndex { index, count };
            cwarn!(index, count, "jump rejected");
            self.alert = Some(err.user_message());
            return Err(err);
        };
        self.list.jump_to(record_index, now_ms)
    }

    /// Feeds the tracker's pending transitions to the engine.
    fn pump(&mut self, now_ms: u64) {
        let (surface, tracker) = self.list.surface_and_tracker();
        let entries = tracker.collect(surface);
        if !entries.is_empty() {
            self.list.on_visibility(entries, now_ms);
        }
    }
}

impl<S> core::fmt::Debug for HeadlessHost<S>
where
    S: RecordSource,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HeadlessHost")
            .field("list", &self.list)
            .field("input", &self.input)
            .field("tween", &self.tween)
            .field("alert", &self.alert)
            .finish()
    }
}
