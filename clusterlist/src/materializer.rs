use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{
    ClusterList, ClusterState, Error, RecordSource, RenderSurface, Result, VisibilityTracker,
};

impl<S, R, T> ClusterList<S, R, T>
where
    S: RecordSource,
    R: RenderSurface<S::Record>,
    T: VisibilityTracker<R::Node>,
{
    /// Swaps a cluster's placeholder for its full representation.
    ///
    /// Idempotent: an already materialized cluster is returned as is, without touching the
    /// render surface.
    pub fn materialize(&mut self, cluster: usize) -> Result<R::Node> {
        self.ensure_initialized()?;
        let range = self.partition.range_of(cluster)?;
        if let Some(node) = self.loaded.get(&cluster) {
            return Ok(node.clone());
        }

        let existing = self.occupant(cluster)?;
        if self.surface.node_state(&existing) == Some(ClusterState::Materialized) {
            ctrace!(cluster, "materialize: surface already holds a materialized node");
            self.loaded.insert(cluster, existing.clone());
            return Ok(existing);
        }

        let records: Vec<&S::Record> = range
            .indexes()
            .filter_map(|i| self.source.at(i))
            .collect();
        let node = self
            .surface
            .create_materialized_node(cluster, range.start_index, &records);
        self.swap(cluster, &existing, node.clone())?;
        self.loaded.insert(cluster, node.clone());
        cdebug!(cluster, rows = range.len(), "cluster materialized");
        self.diagnostics
            .info(self.now_ms, format!("Loaded cluster {cluster}"));
        Ok(node)
    }

    /// Swaps a cluster's full representation for a placeholder sized from the reference
    /// height.
    ///
    /// Idempotent like [`Self::materialize`]. The always-loaded clusters are refused.
    pub fn placeholderize(&mut self, cluster: usize) -> Result<R::Node> {
        self.ensure_initialized()?;
        self.partition.range_of(cluster)?;
        if cluster < self.options.always_loaded {
            return Err(Error::AlwaysLoaded { cluster });
        }

        let existing = self.occupant(cluster)?;
        if self.surface.node_state(&existing) == Some(ClusterState::Placeholder) {
            self.loaded.remove(&cluster);
            return Ok(existing);
        }

        let height = self
            .heights
            .estimate(&self.partition, cluster)
            .ok_or(Error::NotInitialized)?;
        let label = self.placeholder_label(cluster);
        let node = self.surface.create_placeholder_node(cluster, height, &label);
        self.swap(cluster, &existing, node.clone())?;
        self.loaded.remove(&cluster);
        cdebug!(cluster, height, "cluster replaced by placeholder");
        self.diagnostics
            .info(self.now_ms, format!("Unloaded cluster {cluster}"));
        Ok(node)
    }

    pub(crate) fn placeholder_label(&self, cluster: usize) -> String {
        let records = self.partition.len_of(cluster).unwrap_or(0);
        format!("Cluster {cluster} ({records} records) - Scroll to load")
    }

    fn occupant(&mut self, cluster: usize) -> Result<R::Node> {
        match self.surface.find_node_for_cluster(cluster) {
            Some(node) => Ok(node),
            None => {
                cwarn!(cluster, "no node occupies the cluster slot");
                self.diagnostics.info(
                    self.now_ms,
                    format!("Render surface has no node for cluster {cluster}"),
                );
                Err(Error::RenderSurfaceInconsistency {
                    cluster,
                    reason: "no node occupies the cluster slot",
                })
            }
        }
    }

    /// Replaces `old` with `new` and moves the tracker registration over to `new`.
    fn swap(&mut self, cluster: usize, old: &R::Node, new: R::Node) -> Result<()> {
        if !self.surface.replace(old, new.clone()) {
            cwarn!(cluster, "replace rejected by the render surface");
            self.diagnostics.info(
                self.now_ms,
                format!("Render surface rejected the swap for cluster {cluster}"),
            );
            return Err(Error::RenderSurfaceInconsistency {
                cluster,
                reason: "replace rejected by the render surface",
            });
        }
        if self.attached {
            self.tracker.unobserve(old);
            self.tracker.observe(cluster, &new);
        }
        Ok(())
    }
}
