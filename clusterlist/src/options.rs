use crate::{Align, TrackerConfig};

/// Configuration for [`crate::ClusterList`].
///
/// All durations are in milliseconds on the host-driven clock passed to the engine's
/// `*_ms` entry points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterListOptions {
    /// Records per cluster. Clamped to at least 1.
    pub cluster_size: usize,

    /// Number of leading clusters that are rendered up front and never replaced by
    /// placeholders. Cluster 0 is also the height reference.
    pub always_loaded: usize,

    /// Quiet period after the last visibility change before the loaded set is reconciled.
    pub debounce_ms: u64,

    /// Time allowed for force-loaded clusters to be laid out before a jump locates its row.
    pub load_settle_ms: u64,

    /// Fallback for the end of a jump's scroll animation when the host never calls
    /// `scroll_settled`.
    pub scroll_settle_ms: u64,

    /// Delay before visibility tracking resumes after a jump failed to locate its row.
    pub failure_resume_ms: u64,

    /// How long a jumped-to row stays highlighted.
    pub highlight_ms: u64,

    pub scroll_align: Align,

    /// Number of diagnostics entries kept.
    pub diagnostics_capacity: usize,

    pub tracker: TrackerConfig,
}

impl Default for ClusterListOptions {
    fn default() -> Self {
        Self {
            cluster_size: 50,
            always_loaded: 2,
            debounce_ms: 150,
            load_settle_ms: 150,
            scroll_settle_ms: 1000,
            failure_resume_ms: 100,
            highlight_ms: 3000,
            scroll_align: Align::Center,
            diagnostics_capacity: 100,
            tracker: TrackerConfig::default(),
        }
    }
}

impl ClusterListOptions {
    pub fn new(cluster_size: usize) -> Self {
        Self::default().with_cluster_size(cluster_size)
    }

    pub fn with_cluster_size(mut self, cluster_size: usize) -> Self {
        self.cluster_size = cluster_size.max(1);
        self
    }

    pub fn with_always_loaded(mut self, always_loaded: usize) -> Self {
        self.always_loaded = always_loaded;
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Sets the three navigation timings at once.
    pub fn with_navigation_timing(
        mut self,
        load_settle_ms: u64,
        scroll_settle_ms: u64,
        failure_resume_ms: u64,
    ) -> Self {
        self.load_settle_ms = load_settle_ms;
        self.scroll_settle_ms = scroll_settle_ms;
        self.failure_resume_ms = failure_resume_ms;
        self
    }

    pub fn with_highlight_ms(mut self, highlight_ms: u64) -> Self {
        self.highlight_ms = highlight_ms;
        self
    }

    pub fn with_scroll_align(mut self, align: Align) -> Self {
        self.scroll_align = align;
        self
    }

    pub fn with_diagnostics_capacity(mut self, capacity: usize) -> Self {
        self.diagnostics_capacity = capacity;
        self
    }

    pub fn with_tracker(mut self, tracker: TrackerConfig) -> Self {
        self.tracker = tracker;
        self
    }
}
