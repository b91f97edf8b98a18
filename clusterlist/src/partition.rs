use crate::{ClusterRange, Error, Result};

/// Fixed-size partitioning of `[0, record_count)` into clusters.
///
/// Every record belongs to exactly one cluster; only the last cluster may be short.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partition {
    record_count: usize,
    cluster_size: usize,
}

impl Partition {
    /// `cluster_size` is clamped to at least 1.
    pub fn new(record_count: usize, cluster_size: usize) -> Self {
        Self {
            record_count,
            cluster_size: cluster_size.max(1),
        }
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn cluster_size(&self) -> usize {
        self.cluster_size
    }

    pub fn cluster_count(&self) -> usize {
        self.record_count.div_ceil(self.cluster_size)
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    pub fn cluster_of(&self, record_index: usize) -> Result<usize> {
        if record_index >= self.record_count {
            return Err(Error::OutOfRange {
                index: record_index,
                count: self.record_count,
            });
        }
        Ok(record_index / self.cluster_size)
    }

    pub fn range_of(&self, cluster: usize) -> Result<ClusterRange> {
        let count = self.cluster_count();
        if cluster >= count {
            return Err(Error::OutOfRange {
                index: cluster,
                count,
            });
        }
        let start_index = cluster * self.cluster_size;
        let end_index = start_index
            .saturating_add(self.cluster_size)
            .min(self.record_count);
        Ok(ClusterRange {
            cluster,
            start_index,
            end_index,
        })
    }

    pub fn len_of(&self, cluster: usize) -> Result<usize> {
        self.range_of(cluster).map(|r| r.len())
    }

    pub fn is_full(&self, cluster: usize) -> Result<bool> {
        Ok(self.len_of(cluster)? == self.cluster_size)
    }

    /// Record ranges covered by a contiguous run of clusters, clipped to the record count.
    pub fn records_of(&self, first_cluster: usize, last_cluster: usize) -> Result<ClusterRange> {
        let first = self.range_of(first_cluster)?;
        let last = self.range_of(last_cluster)?;
        Ok(ClusterRange {
            cluster: first.cluster,
            start_index: first.start_index,
            end_index: last.end_index.max(first.start_index),
        })
    }

    /// Clusters `[cluster - 1, cluster + 1]`, clamped to the valid range.
    pub fn neighborhood(&self, cluster: usize) -> core::ops::RangeInclusive<usize> {
        let last = self.cluster_count().saturating_sub(1);
        cluster.saturating_sub(1)..=cluster.saturating_add(1).min(last)
    }

    pub fn iter(&self) -> impl Iterator<Item = ClusterRange> + '_ {
        (0..self.cluster_count()).filter_map(|c| self.range_of(c).ok())
    }
}
