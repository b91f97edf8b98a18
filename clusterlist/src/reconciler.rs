use alloc::collections::BTreeSet;
use alloc::format;
use alloc::vec::Vec;

use crate::diagnostics::DiagnosticKind;
use crate::{ClusterList, RecordSource, RenderSurface, VisibilityEntry, VisibilityTracker};

impl<S, R, T> ClusterList<S, R, T>
where
    S: RecordSource,
    R: RenderSurface<S::Record>,
    T: VisibilityTracker<R::Node>,
{
    /// Applies a batch of visibility transitions from the viewport tracker.
    ///
    /// The visible set is updated immediately; materialization is deferred until the
    /// debounce delay has passed without further changes. Returns `true` if the visible set
    /// changed (and the debounce was restarted).
    ///
    /// Entries are dropped when the tracker is detached, when their cluster is out of range,
    /// or when their node no longer occupies the cluster slot.
    pub fn on_visibility(
        &mut self,
        entries: impl IntoIterator<Item = VisibilityEntry<R::Node>>,
        now_ms: u64,
    ) -> bool {
        self.now_ms = now_ms;
        if !self.attached {
            ctrace!("visibility batch ignored while detached");
            return false;
        }

        let count = self.partition.cluster_count();
        let mut changed = false;
        for entry in entries {
            let cluster = entry.cluster;
            if cluster >= count {
                cwarn!(cluster, count, "visibility entry for unknown cluster");
                self.diagnostics.info(
                    now_ms,
                    format!("Ignored visibility change for unknown cluster {cluster}"),
                );
                continue;
            }
            if self.surface.find_node_for_cluster(cluster).as_ref() != Some(&entry.node) {
                ctrace!(cluster, "stale visibility entry for a replaced node");
                continue;
            }

            if entry.is_intersecting {
                if self.visible.insert(cluster) {
                    ctrace!(cluster, "cluster entered buffer zone");
                    self.diagnostics.push(
                        now_ms,
                        DiagnosticKind::Enter,
                        format!("Cluster {cluster} entered buffer zone"),
                    );
                    changed = true;
                }
            } else if self.visible.remove(&cluster) {
                ctrace!(cluster, "cluster left buffer zone");
                self.diagnostics.push(
                    now_ms,
                    DiagnosticKind::Exit,
                    format!("Cluster {cluster} left buffer zone"),
                );
                changed = true;
            }
        }

        if changed {
            self.reconcile.schedule(now_ms, self.options.debounce_ms);
        }
        changed
    }

    /// Clusters that should be materialized right now: the visible set plus the
    /// always-loaded clusters.
    pub fn desired_clusters(&self) -> BTreeSet<usize> {
        let count = self.partition.cluster_count();
        let mut target: BTreeSet<usize> = (0..self.options.always_loaded.min(count)).collect();
        target.extend(self.visible.iter().copied().filter(|&c| c < count));
        target
    }

    /// Converges the loaded set to [`Self::desired_clusters`] immediately.
    ///
    /// This is what the debounce timer runs; it observes the visible set as of now.
    pub fn reconcile_now(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        if !self.initialized {
            return;
        }
        self.reconcile.cancel();

        let target = self.desired_clusters();
        let mut loaded = 0usize;
        let mut unloaded = 0usize;

        for &cluster in &target {
            if self.loaded.contains_key(&cluster) {
                continue;
            }
            match self.materialize(cluster) {
                Ok(_) => loaded += 1,
                Err(err) => {
                    cwarn!(cluster, %err, "reconcile: materialize failed");
                    self.diagnostics
                        .info(now_ms, format!("Failed to load cluster {cluster}: {err}"));
                }
            }
        }

        let stale: Vec<usize> = self
            .loaded
            .keys()
            .copied()
            .filter(|c| !target.contains(c) && *c >= self.options.always_loaded)
            .collect();
        for cluster in stale {
            match self.placeholderize(cluster) {
                Ok(_) => unloaded += 1,
                Err(err) => {
                    cwarn!(cluster, %err, "reconcile: placeholderize failed");
                    self.diagnostics
                        .info(now_ms, format!("Failed to unload cluster {cluster}: {err}"));
                }
            }
        }

        cdebug!(
            loaded,
            unloaded,
            materialized = self.loaded.len(),
            "reconciled"
        );
        self.target = target;
        self.diagnostics.info(
            now_ms,
            format!(
                "Loaded clusters: {}/{}",
                self.loaded.len(),
                self.partition.cluster_count()
            ),
        );
    }

    /// Detaches the viewport tracker and cancels any pending reconciliation.
    ///
    /// Suspensions nest: tracking resumes once every `suspend` has been matched by a
    /// [`Self::resume`].
    pub fn suspend(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.suspend_depth = self.suspend_depth.saturating_add(1);
        if self.suspend_depth == 1 && self.attached {
            self.detach();
            self.diagnostics
                .info(now_ms, "Cluster observer disabled for navigation");
        }
        cdebug!(depth = self.suspend_depth, "suspend");
    }

    /// Releases one suspension; the last release re-attaches the tracker, re-registers every
    /// cluster node and schedules a reconciliation so clusters loaded while suspended are
    /// released again if they are not visible.
    pub fn resume(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        if self.suspend_depth == 0 {
            cwarn!("resume without a matching suspend");
            return;
        }
        self.suspend_depth -= 1;
        cdebug!(depth = self.suspend_depth, "resume");
        if self.suspend_depth == 0 && self.initialized && !self.attached {
            self.attach(now_ms);
            self.reconcile.schedule(now_ms, self.options.debounce_ms);
            self.diagnostics.info(now_ms, "Cluster observer re-enabled");
        }
    }
}
