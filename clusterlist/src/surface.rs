use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{Align, ClusterState, TrackerConfig};

/// An ordered, index-stable, read-only sequence of records.
pub trait RecordSource {
    type Record;

    fn count(&self) -> usize;

    fn at(&self, index: usize) -> Option<&Self::Record>;
}

impl<T> RecordSource for Vec<T> {
    type Record = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl<T> RecordSource for Arc<[T]> {
    type Record = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

impl<T> RecordSource for &[T] {
    type Record = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }
}

/// The container cluster nodes are rendered into.
///
/// The engine keeps exactly one node per cluster in the container, in cluster order, and
/// only ever swaps a node for another one in place. Nodes are cheap handles.
pub trait RenderSurface<R> {
    type Node: Clone + PartialEq + core::fmt::Debug;

    /// Removes every node from the container.
    fn clear(&mut self);

    /// Appends `node` after the last node in the container.
    fn append(&mut self, node: Self::Node);

    /// Builds the full representation of a cluster: one row per record, in index order.
    /// `records[0]` is the record at `first_index`.
    fn create_materialized_node(
        &mut self,
        cluster: usize,
        first_index: usize,
        records: &[&R],
    ) -> Self::Node;

    /// Builds a lightweight stand-in of the given height.
    fn create_placeholder_node(&mut self, cluster: usize, height: u32, label: &str) -> Self::Node;

    /// Replaces `old` by `new` at the same position. Returns `false` (and changes nothing)
    /// when `old` is not in the container.
    fn replace(&mut self, old: &Self::Node, new: Self::Node) -> bool;

    fn find_node_for_cluster(&self, cluster: usize) -> Option<Self::Node>;

    fn node_state(&self, node: &Self::Node) -> Option<ClusterState>;

    /// The row node at `offset` inside a materialized cluster node.
    fn find_row(&self, cluster_node: &Self::Node, offset: usize) -> Option<Self::Node>;

    fn measure_height(&self, node: &Self::Node) -> u32;

    fn scroll_into_view(&mut self, node: &Self::Node, align: Align);

    fn set_highlighted(&mut self, node: &Self::Node, highlighted: bool);
}

/// Registration side of a viewport visibility tracker.
///
/// Transitions are delivered by the host through [`crate::ClusterList::on_visibility`].
pub trait VisibilityTracker<N> {
    /// (Re)starts tracking with the given geometry. Previously observed nodes are dropped.
    fn connect(&mut self, config: &TrackerConfig);

    fn observe(&mut self, cluster: usize, node: &N);

    fn unobserve(&mut self, node: &N);

    fn disconnect_all(&mut self);
}
