use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

/// Where a row should land in the viewport when it is scrolled into view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
    /// Only scroll when the row is not already fully visible.
    Auto,
}

/// Rendering state of a cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClusterState {
    Placeholder,
    Materialized,
}

/// A contiguous run of record indexes owned by one cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterRange {
    pub cluster: usize,
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl ClusterRange {
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn contains(&self, record_index: usize) -> bool {
        record_index >= self.start_index && record_index < self.end_index
    }

    pub fn indexes(&self) -> Range<usize> {
        self.start_index..self.end_index
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl core::fmt::Display for Level {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable log line. Records are identified by their position in the source
/// (index 0 is the most recent).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogRecord {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    pub level: Level,
    pub message: String,
}

impl LogRecord {
    pub fn new(timestamp_ms: u64, level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            level,
            message: message.into(),
        }
    }
}

/// A single visibility transition reported by a [`crate::VisibilityTracker`] host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityEntry<N> {
    pub cluster: usize,
    /// The node the transition was observed on.
    pub node: N,
    /// `true` when the node intersects the viewport plus its buffer margin.
    pub is_intersecting: bool,
}

/// Geometry the viewport tracker is (re)connected with.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackerConfig {
    /// Buffer added above and below the viewport, in pixels.
    pub root_margin_px: u32,
    /// Fraction of a node's height that has to intersect before it counts as visible.
    pub threshold: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            root_margin_px: 200,
            threshold: 0.1,
        }
    }
}

/// A point-in-time snapshot of the engine, for status panels.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status {
    pub total_clusters: usize,
    /// Sorted cluster indexes currently inside the viewport buffer.
    pub visible_clusters: Vec<usize>,
    /// Sorted cluster indexes currently materialized.
    pub loaded_clusters: Vec<usize>,
    pub attached: bool,
    pub navigating: bool,
    /// Deadline of the pending reconciliation, if any.
    pub reconcile_at_ms: Option<u64>,
}

impl Status {
    pub fn visible_count(&self) -> usize {
        self.visible_clusters.len()
    }
}
