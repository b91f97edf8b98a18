use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use clusterlist::{Align, ClusterState, RenderSurface};

use crate::StackLayout;

/// Handle of a node owned by a [`MemorySurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Materialized {
        cluster: usize,
        first_index: usize,
        rows: Vec<NodeId>,
        height: u32,
    },
    Placeholder {
        cluster: usize,
        height: u32,
        label: String,
    },
    Row {
        record_index: usize,
        parent: NodeId,
        /// Offset of the row inside its cluster.
        top: u32,
        height: u32,
    },
}

impl NodeKind {
    pub fn cluster(&self) -> Option<usize> {
        match self {
            Self::Materialized { cluster, .. } | Self::Placeholder { cluster, .. } => {
                Some(*cluster)
            }
            Self::Row { .. } => None,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Materialized { height, .. }
            | Self::Placeholder { height, .. }
            | Self::Row { height, .. } => *height,
        }
    }
}

/// Counters of mutating surface operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceOps {
    pub creates: usize,
    pub appends: usize,
    pub replaces: usize,
    pub clears: usize,
}

/// A scroll position requested through `scroll_into_view`, not applied yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollRequest {
    pub node: NodeId,
    pub align: Align,
    pub offset: u64,
}

type RowHeightFn = Arc<dyn Fn(usize) -> u32 + Send + Sync>;

/// An in-memory scroll container that stacks cluster nodes vertically.
///
/// Materialized clusters own one row node per record; their height is the sum of their row
/// heights. Nodes that are swapped out are dropped together with their rows.
#[derive(Clone)]
pub struct MemorySurface {
    row_height: RowHeightFn,
    next_id: u32,
    nodes: BTreeMap<NodeId, NodeKind>,
    slots: Vec<NodeId>,
    slot_of: BTreeMap<NodeId, usize>,
    by_cluster: BTreeMap<usize, NodeId>,
    layout: StackLayout,
    scroll_offset: u64,
    viewport_height: u32,
    scroll_request: Option<ScrollRequest>,
    highlighted: BTreeSet<NodeId>,
    ops: SurfaceOps,
}

impl MemorySurface {
    pub fn new(viewport_height: u32, row_height: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            row_height: Arc::new(row_height),
            next_id: 0,
            nodes: BTreeMap::new(),
            slots: Vec::new(),
            slot_of: BTreeMap::new(),
            by_cluster: BTreeMap::new(),
            layout: StackLayout::new(),
            scroll_offset: 0,
            viewport_height,
            scroll_request: None,
            highlighted: BTreeSet::new(),
            ops: SurfaceOps::default(),
        }
    }

    pub fn with_uniform_rows(viewport_height: u32, row_height: u32) -> Self {
        Self::new(viewport_height, move |_| row_height)
    }

    pub fn ops(&self) -> SurfaceOps {
        self.ops
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(&id)
    }

    /// Number of live nodes, rows included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot_node(&self, slot: usize) -> Option<NodeId> {
        self.slots.get(slot).copied()
    }

    pub fn layout(&self) -> &StackLayout {
        &self.layout
    }

    pub fn content_height(&self) -> u64 {
        self.layout.total()
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, viewport_height: u32) {
        self.viewport_height = viewport_height;
        self.scroll_offset = self.clamp_scroll_offset(self.scroll_offset);
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.content_height()
            .saturating_sub(u64::from(self.viewport_height))
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// Moves the scroll position; returns the applied (clamped) offset.
    pub fn set_scroll_offset(&mut self, offset: u64) -> u64 {
        self.scroll_offset = self.clamp_scroll_offset(offset);
        self.scroll_offset
    }

    pub fn scroll_request(&self) -> Option<ScrollRequest> {
        self.scroll_request
    }

    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll_request.take()
    }

    pub fn is_highlighted(&self, id: NodeId) -> bool {
        self.highlighted.contains(&id)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.highlighted.iter().copied()
    }

    /// Absolute top offset and height of a node currently in the container.
    pub fn bounds(&self, id: NodeId) -> Option<(u64, u32)> {
        match self.nodes.get(&id)? {
            NodeKind::Row {
                parent,
                top,
                height,
                ..
            } => {
                let slot = *self.slot_of.get(parent)?;
                Some((self.layout.offset_of(slot) + u64::from(*top), *height))
            }
            kind => {
                let slot = *self.slot_of.get(&id)?;
                Some((self.layout.offset_of(slot), kind.height()))
            }
        }
    }

    /// Clusters whose nodes overlap the viewport, top to bottom.
    pub fn clusters_in_viewport(&self) -> Vec<usize> {
        let Some(first) = self.layout.slot_at(self.scroll_offset) else {
            return Vec::new();
        };
        let bottom = self.scroll_offset + u64::from(self.viewport_height);
        (first..self.slots.len())
            .take_while(|&slot| self.layout.offset_of(slot) < bottom)
            .filter_map(|slot| self.nodes.get(&self.slots[slot])?.cluster())
            .collect()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(id, kind);
        id
    }

    fn drop_node(&mut self, id: NodeId) {
        if let Some(NodeKind::Materialized { rows, .. }) = self.nodes.remove(&id) {
            for row in rows {
                self.nodes.remove(&row);
                self.highlighted.remove(&row);
            }
        }
        self.highlighted.remove(&id);
    }

    fn scroll_target(&self, top: u64, height: u32, align: Align) -> u64 {
        let height = u64::from(height);
        let viewport = u64::from(self.viewport_height);
        let target = match align {
            Align::Start => top,
            Align::End => (top + height).saturating_sub(viewport),
            Align::Center => (top + height / 2).saturating_sub(viewport / 2),
            Align::Auto => {
                let current = self.scroll_offset;
                if top >= current && top + height <= current + viewport {
                    current
                } else if top < current {
                    top
                } else {
                    (top + height).saturating_sub(viewport)
                }
            }
        };
        self.clamp_scroll_offset(target)
    }
}

impl fmt::Debug for MemorySurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySurface")
            .field("slots", &self.slots.len())
            .field("nodes", &self.nodes.len())
            .field("content_height", &self.layout.total())
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport_height", &self.viewport_height)
            .field("scroll_request", &self.scroll_request)
            .field("ops", &self.ops)
            .finish_non_exhaustive()
    }
}

impl<R> RenderSurface<R> for MemorySurface {
    type Node = NodeId;

    fn clear(&mut self) {
        self.ops.clears += 1;
        self.nodes.clear();
        self.slots.clear();
        self.slot_of.clear();
        self.by_cluster.clear();
        self.layout.clear();
        self.highlighted.clear();
        self.scroll_request = None;
        self.scroll_offset = 0;
    }

    fn append(&mut self, node: NodeId) {
        let Some(kind) = self.nodes.get(&node) else {
            return;
        };
        self.ops.appends += 1;
        if let Some(cluster) = kind.cluster() {
            self.by_cluster.insert(cluster, node);
        }
        self.layout.push(kind.height());
        self.slot_of.insert(node, self.slots.len());
        self.slots.push(node);
    }

    fn create_materialized_node(
        &mut self,
        cluster: usize,
        first_index: usize,
        records: &[&R],
    ) -> NodeId {
        self.ops.creates += 1;
        let parent = self.alloc(NodeKind::Materialized {
            cluster,
            first_index,
            rows: Vec::new(),
            height: 0,
        });
        let mut rows = Vec::with_capacity(records.len());
        let mut top = 0u32;
        for record_index in first_index..first_index + records.len() {
            let height = (self.row_height)(record_index);
            rows.push(self.alloc(NodeKind::Row {
                record_index,
                parent,
                top,
                height,
            }));
            top = top.saturating_add(height);
        }
        if let Some(NodeKind::Materialized {
            rows: slot_rows,
            height,
            ..
        }) = self.nodes.get_mut(&parent)
        {
            *slot_rows = rows;
            *height = top;
        }
        parent
    }

    fn create_placeholder_node(&mut self, cluster: usize, height: u32, label: &str) -> NodeId {
        self.ops.creates += 1;
        self.alloc(NodeKind::Placeholder {
            cluster,
            height,
            label: String::from(label),
        })
    }

    fn replace(&mut self, old: &NodeId, new: NodeId) -> bool {
        let Some(&slot) = self.slot_of.get(old) else {
            return false;
        };
        let Some(kind) = self.nodes.get(&new) else {
            return false;
        };
        let (height, cluster) = (kind.height(), kind.cluster());

        self.ops.replaces += 1;
        self.slot_of.remove(old);
        self.slot_of.insert(new, slot);
        self.slots[slot] = new;
        self.layout.set(slot, height);
        if let Some(cluster) = cluster {
            self.by_cluster.insert(cluster, new);
        }
        self.drop_node(*old);
        true
    }

    fn find_node_for_cluster(&self, cluster: usize) -> Option<NodeId> {
        self.by_cluster.get(&cluster).copied()
    }

    fn node_state(&self, node: &NodeId) -> Option<ClusterState> {
        match self.nodes.get(node)? {
            NodeKind::Materialized { .. } => Some(ClusterState::Materialized),
            NodeKind::Placeholder { .. } => Some(ClusterState::Placeholder),
            NodeKind::Row { .. } => None,
        }
    }

    fn find_row(&self, cluster_node: &NodeId, offset: usize) -> Option<NodeId> {
        match self.nodes.get(cluster_node)? {
            NodeKind::Materialized { rows, .. } => rows.get(offset).copied(),
            _ => None,
        }
    }

    fn measure_height(&self, node: &NodeId) -> u32 {
        self.nodes.get(node).map_or(0, NodeKind::height)
    }

    fn scroll_into_view(&mut self, node: &NodeId, align: Align) {
        let Some((top, height)) = self.bounds(*node) else {
            return;
        };
        let offset = self.scroll_target(top, height, align);
        self.scroll_request = Some(ScrollRequest {
            node: *node,
            align,
            offset,
        });
    }

    fn set_highlighted(&mut self, node: &NodeId, highlighted: bool) {
        if !highlighted {
            self.highlighted.remove(node);
        } else if self.nodes.contains_key(node) {
            self.highlighted.insert(*node);
        }
    }
}
