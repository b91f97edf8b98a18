use crate::Partition;

/// Placeholder height for a cluster holding `records_in_cluster` records.
///
/// Full clusters use `reference_height` unchanged; a short trailing cluster gets a height
/// proportional to its record count, rounded half up.
pub fn estimate_height(reference_height: u32, records_in_cluster: usize, cluster_size: usize) -> u32 {
    let cluster_size = cluster_size.max(1);
    if records_in_cluster >= cluster_size {
        return reference_height;
    }
    let scaled = reference_height as u128 * records_in_cluster as u128;
    let size = cluster_size as u128;
    ((scaled + size / 2) / size) as u32
}

/// Holds the reference height measured from the first materialized cluster.
///
/// The reference is captured once per render; placeholders are sized from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeightEstimator {
    reference: Option<u32>,
}

impl HeightEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference(&self) -> Option<u32> {
        self.reference
    }

    /// Records the reference height. Later captures are ignored.
    pub fn capture(&mut self, height: u32) -> u32 {
        match self.reference {
            Some(existing) => {
                cwarn!(existing, ignored = height, "reference height already captured");
                existing
            }
            None => {
                cdebug!(height, "reference height captured");
                self.reference = Some(height);
                height
            }
        }
    }

    pub fn reset(&mut self) {
        self.reference = None;
    }

    /// Returns `None` until a reference height has been captured, or for an unknown cluster.
    pub fn estimate(&self, partition: &Partition, cluster: usize) -> Option<u32> {
        let reference = self.reference;
        debug_assert!(
            reference.is_some(),
            "placeholder requested before the reference cluster was measured"
        );
        let records = partition.len_of(cluster).ok()?;
        Some(estimate_height(reference?, records, partition.cluster_size()))
    }
}
