use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use clusterlist::{TrackerConfig, VisibilityEntry, VisibilityTracker};

use crate::{MemorySurface, NodeId};

#[derive(Clone, Copy, Debug)]
struct Observed {
    cluster: usize,
    /// Last reported state; `None` until the first report.
    reported: Option<bool>,
}

/// Geometric visibility tracker for a [`MemorySurface`].
///
/// A node is intersecting when at least `threshold` of its height lies within the viewport
/// grown by `root_margin_px` on both ends. Only transitions are reported, except that a freshly
/// observed node always reports its initial state once.
#[derive(Clone, Debug, Default)]
pub struct ViewportTracker {
    config: Option<TrackerConfig>,
    observed: BTreeMap<NodeId, Observed>,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.config.is_some()
    }

    pub fn config(&self) -> Option<&TrackerConfig> {
        self.config.as_ref()
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    pub fn is_observing(&self, node: NodeId) -> bool {
        self.observed.contains_key(&node)
    }

    /// Checks every observed node against the current scroll position of `surface`.
    ///
    /// Nodes that are no longer in the container are skipped.
    pub fn collect(&mut self, surface: &MemorySurface) -> Vec<VisibilityEntry<NodeId>> {
        let Some(config) = self.config else {
            return Vec::new();
        };
        let margin = u64::from(config.root_margin_px);
        let root_start = surface.scroll_offset().saturating_sub(margin);
        let root_end = surface.scroll_offset() + u64::from(surface.viewport_height()) + margin;

        let mut entries = Vec::new();
        for (&node, observed) in &mut self.observed {
            let Some((top, height)) = surface.bounds(node) else {
                continue;
            };
            let is_intersecting =
                intersects(top, height, root_start, root_end, config.threshold);
            if observed.reported != Some(is_intersecting) {
                observed.reported = Some(is_intersecting);
                entries.push(VisibilityEntry {
                    cluster: observed.cluster,
                    node,
                    is_intersecting,
                });
            }
        }
        entries
    }
}

fn intersects(top: u64, height: u32, root_start: u64, root_end: u64, threshold: f32) -> bool {
    let bottom = top + u64::from(height);
    if height == 0 {
        return top >= root_start && top < root_end;
    }
    let overlap = bottom.min(root_end).saturating_sub(top.max(root_start));
    if overlap == 0 {
        return false;
    }
    overlap as f32 / height as f32 >= threshold
}

impl VisibilityTracker<NodeId> for ViewportTracker {
    fn connect(&mut self, config: &TrackerConfig) {
        self.config = Some(*config);
        self.observed.clear();
    }

    fn observe(&mut self, cluster: usize, node: &NodeId) {
        self.observed.insert(
            *node,
            Observed {
                cluster,
                reported: None,
            },
        );
    }

    fn unobserve(&mut self, node: &NodeId) {
        self.observed.remove(node);
    }

    fn disconnect_all(&mut self) {
        self.config = None;
        self.observed.clear();
    }
}
