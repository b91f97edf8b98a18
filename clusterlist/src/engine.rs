use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::vec::Vec;
use core::ops::Range;

use crate::diagnostics::Diagnostics;
use crate::navigator::{Highlight, PendingJump};
use crate::timer::{Deadline, earliest};
use crate::{
    ClusterListOptions, ClusterState, Error, HeightEstimator, JumpStage, Partition,
    RecordSource, RenderSurface, Result, Status, VisibilityTracker,
};

/// A clustered list virtualization engine.
///
/// Records are grouped into fixed-size clusters. Clusters near the viewport are
/// materialized (one row per record); all others are rendered as placeholders sized from a
/// measured reference cluster. The first `always_loaded` clusters stay materialized.
///
/// The engine holds no timers or threads. The host drives it:
/// - `init(now_ms)` once the container exists
/// - `on_visibility(entries, now_ms)` whenever the viewport tracker reports transitions
/// - `tick(now_ms)` when `next_deadline()` is reached (or every frame)
/// - `jump_to(index, now_ms)` for programmatic navigation
pub struct ClusterList<S, R, T>
where
    S: RecordSource,
    R: RenderSurface<S::Record>,
    T: VisibilityTracker<R::Node>,
{
    pub(crate) options: ClusterListOptions,
    pub(crate) source: S,
    pub(crate) surface: R,
    pub(crate) tracker: T,
    pub(crate) partition: Partition,
    pub(crate) heights: HeightEstimator,

    pub(crate) loaded: BTreeMap<usize, R::Node>,
    pub(crate) visible: BTreeSet<usize>,
    pub(crate) target: BTreeSet<usize>,
    pub(crate) reconcile: Deadline,

    pub(crate) initialized: bool,
    pub(crate) attached: bool,
    pub(crate) suspend_depth: usize,
    pub(crate) jump: Option<PendingJump>,
    pub(crate) highlights: Vec<Highlight<R::Node>>,

    pub(crate) diagnostics: Diagnostics,
    /// Latest host clock reading, used to stamp diagnostics.
    pub(crate) now_ms: u64,
}

impl<S, R, T> ClusterList<S, R, T>
where
    S: RecordSource,
    R: RenderSurface<S::Record>,
    T: VisibilityTracker<R::Node>,
{
    /// Creates an engine over `source`. Nothing is rendered until [`Self::init`].
    pub fn new(options: ClusterListOptions, source: S, surface: R, tracker: T) -> Self {
        let partition = Partition::new(source.count(), options.cluster_size);
        cdebug!(
            records = partition.record_count(),
            cluster_size = partition.cluster_size(),
            clusters = partition.cluster_count(),
            "ClusterList::new"
        );
        Self {
            diagnostics: Diagnostics::new(options.diagnostics_capacity),
            options,
            source,
            surface,
            tracker,
            partition,
            heights: HeightEstimator::new(),
            loaded: BTreeMap::new(),
            visible: BTreeSet::new(),
            target: BTreeSet::new(),
            reconcile: Deadline::new(),
            initialized: false,
            attached: false,
            suspend_depth: 0,
            jump: None,
            highlights: Vec::new(),
            now_ms: 0,
        }
    }

    pub fn options(&self) -> &ClusterListOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    /// Borrows the render surface and the tracker together, e.g. for a tracker that reads
    /// layout from the surface.
    pub fn surface_and_tracker(&mut self) -> (&R, &mut T) {
        (&self.surface, &mut self.tracker)
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Renders the list from scratch.
    ///
    /// The always-loaded clusters are appended first and cluster 0 is measured; every other
    /// cluster gets a placeholder sized from that measurement. Finally the tracker is
    /// attached and every cluster node is registered with it.
    pub fn init(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.reset();
        self.surface.clear();

        let count = self.partition.cluster_count();
        let eager = self.options.always_loaded.max(1).min(count);

        for cluster in 0..eager {
            let Ok(range) = self.partition.range_of(cluster) else {
                continue;
            };
            let records: Vec<&S::Record> = range
                .indexes()
                .filter_map(|i| self.source.at(i))
                .collect();
            let node = self
                .surface
                .create_materialized_node(cluster, range.start_index, &records);
            self.surface.append(node.clone());
            self.loaded.insert(cluster, node);
        }

        if let Some(reference) = self.loaded.get(&0) {
            let height = self.surface.measure_height(reference);
            self.heights.capture(height);
            self.diagnostics
                .info(now_ms, format!("Reference cluster height: {height}px"));
        }

        for cluster in eager..count {
            let Some(height) = self.heights.estimate(&self.partition, cluster) else {
                continue;
            };
            let label = self.placeholder_label(cluster);
            let node = self.surface.create_placeholder_node(cluster, height, &label);
            self.surface.append(node);
        }

        self.initialized = true;
        cdebug!(
            clusters = count,
            materialized = eager,
            placeholders = count - eager,
            "ClusterList::init"
        );
        self.attach(now_ms);
        self.diagnostics.info(
            now_ms,
            format!("Initialized virtual scroll observer for {count} clusters"),
        );
    }

    /// Tears the rendered list down and drops all transient state.
    pub fn dispose(&mut self, now_ms: u64) {
        cdebug!(now_ms, "ClusterList::dispose");
        self.now_ms = now_ms;
        self.reset();
        self.surface.clear();
    }

    fn reset(&mut self) {
        self.tracker.disconnect_all();
        self.attached = false;
        self.suspend_depth = 0;
        self.jump = None;
        for h in self.highlights.drain(..) {
            self.surface.set_highlighted(&h.node, false);
        }
        self.reconcile.cancel();
        self.loaded.clear();
        self.visible.clear();
        self.target.clear();
        self.heights.reset();
        self.initialized = false;
    }

    /// Connects the tracker and registers every cluster node currently in the container.
    pub(crate) fn attach(&mut self, now_ms: u64) {
        self.tracker.connect(&self.options.tracker);
        let mut observed = 0usize;
        for cluster in 0..self.partition.cluster_count() {
            match self.surface.find_node_for_cluster(cluster) {
                Some(node) => {
                    self.tracker.observe(cluster, &node);
                    observed += 1;
                }
                None => {
                    cwarn!(cluster, "attach: no node for cluster");
                    self.diagnostics
                        .info(now_ms, format!("Cluster {cluster} has no node to observe"));
                }
            }
        }
        self.attached = true;
        cdebug!(observed, "tracker attached");
    }

    pub(crate) fn detach(&mut self) {
        self.tracker.disconnect_all();
        self.attached = false;
        self.reconcile.cancel();
        cdebug!("tracker detached");
    }

    /// Fires every timer that is due at `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.advance_navigation(now_ms);
        self.expire_highlights(now_ms);
        if self.attached && self.reconcile.fire(now_ms) {
            self.reconcile_now(now_ms);
        }
    }

    /// The earliest deadline the host should call [`Self::tick`] at.
    pub fn next_deadline(&self) -> Option<u64> {
        let mut next = self.reconcile.at_ms();
        if let Some(jump) = &self.jump {
            next = earliest(next, jump.deadline.at_ms());
        }
        for h in &self.highlights {
            next = earliest(next, h.until.at_ms());
        }
        next
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_suspended(&self) -> bool {
        self.suspend_depth > 0
    }

    pub fn is_navigating(&self) -> bool {
        self.jump.is_some()
    }

    pub fn jump_stage(&self) -> Option<JumpStage> {
        self.jump.as_ref().map(|j| j.stage)
    }

    pub fn cluster_count(&self) -> usize {
        self.partition.cluster_count()
    }

    pub fn reference_height(&self) -> Option<u32> {
        self.heights.reference()
    }

    pub fn is_loaded(&self, cluster: usize) -> bool {
        self.loaded.contains_key(&cluster)
    }

    /// State of a cluster as tracked by the engine; `None` before `init` or out of range.
    pub fn cluster_state(&self, cluster: usize) -> Option<ClusterState> {
        if !self.initialized || cluster >= self.partition.cluster_count() {
            return None;
        }
        if self.loaded.contains_key(&cluster) {
            Some(ClusterState::Materialized)
        } else {
            Some(ClusterState::Placeholder)
        }
    }

    /// Materialized node of a cluster, if loaded.
    pub fn loaded_node(&self, cluster: usize) -> Option<&R::Node> {
        self.loaded.get(&cluster)
    }

    pub fn loaded_clusters(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.loaded.keys().copied()
    }

    /// Sorted.
    pub fn visible_clusters(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.visible.iter().copied()
    }

    /// The clusters materialized by the last reconciliation, sorted.
    pub fn target_clusters(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.target.iter().copied()
    }

    /// Record indexes spanned by the visible clusters (first visible to last visible).
    pub fn visible_record_range(&self) -> Option<Range<usize>> {
        let first = *self.visible.first()?;
        let last = *self.visible.last()?;
        self.partition
            .records_of(first, last)
            .ok()
            .map(|r| r.indexes())
    }

    pub fn status(&self) -> Status {
        Status {
            total_clusters: self.partition.cluster_count(),
            visible_clusters: self.visible.iter().copied().collect(),
            loaded_clusters: self.loaded.keys().copied().collect(),
            attached: self.attached,
            navigating: self.jump.is_some(),
            reconcile_at_ms: self.reconcile.at_ms(),
        }
    }

    pub(crate) fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }
}

impl<S, R, T> core::fmt::Debug for ClusterList<S, R, T>
where
    S: RecordSource,
    R: RenderSurface<S::Record>,
    T: VisibilityTracker<R::Node>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClusterList")
            .field("options", &self.options)
            .field("partition", &self.partition)
            .field("reference_height", &self.heights.reference())
            .field("loaded", &self.loaded.keys().collect::<Vec<_>>())
            .field("visible", &self.visible)
            .field("attached", &self.attached)
            .field("suspend_depth", &self.suspend_depth)
            .field("jump", &self.jump)
            .finish_non_exhaustive()
    }
}
