use alloc::format;

use crate::timer::Deadline;
use crate::{ClusterList, Error, RecordSource, RenderSurface, Result, VisibilityTracker};

/// Progress of a programmatic jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JumpStage {
    /// Target clusters were force-loaded; waiting one render pass before locating the row.
    Settling,
    /// The row was scrolled into view; waiting for the scroll to finish.
    Scrolling,
    /// The row could not be located; waiting briefly before tracking resumes.
    Recovering,
}

#[derive(Clone, Debug)]
pub(crate) struct PendingJump {
    pub(crate) record_index: usize,
    pub(crate) cluster: usize,
    pub(crate) offset: usize,
    pub(crate) stage: JumpStage,
    pub(crate) deadline: Deadline,
}

#[derive(Clone, Debug)]
pub(crate) struct Highlight<N> {
    pub(crate) node: N,
    pub(crate) until: Deadline,
}

impl<S, R, T> ClusterList<S, R, T>
where
    S: RecordSource,
    R: RenderSurface<S::Record>,
    T: VisibilityTracker<R::Node>,
{
    /// Scrolls to an arbitrary record.
    ///
    /// Visibility tracking is suspended, the owning cluster and its direct neighbors are
    /// materialized, and after `load_settle_ms` the row is scrolled into view and
    /// highlighted. Tracking resumes when the host reports [`Self::scroll_settled`], or after
    /// `scroll_settle_ms` at the latest.
    ///
    /// A jump issued while another one is pending supersedes it; tracking is not resumed in
    /// between.
    ///
    /// Out-of-range targets fail with [`Error::InvalidIndex`] and change nothing.
    pub fn jump_to(&mut self, record_index: usize, now_ms: u64) -> Result<()> {
        let count = self.partition.record_count();
        if record_index >= count {
            return Err(Error::InvalidIndex {
                index: i64::try_from(record_index).unwrap_or(i64::MAX),
                count,
            });
        }
        self.ensure_initialized()?;
        self.now_ms = now_ms;

        let cluster = self.partition.cluster_of(record_index)?;
        let offset = record_index - cluster * self.partition.cluster_size();
        self.diagnostics.info(
            now_ms,
            format!("Jumping to row {record_index} (cluster {cluster}, row {offset})"),
        );
        cdebug!(record_index, cluster, offset, "jump_to");

        // Acquire before releasing a superseded jump so tracking never flickers back on.
        self.suspend(now_ms);
        if let Some(previous) = self.jump.take() {
            cdebug!(
                superseded = previous.record_index,
                "jump superseded before completion"
            );
            self.resume(now_ms);
        }

        for neighbor in self.partition.neighborhood(cluster) {
            if let Err(err) = self.materialize(neighbor) {
                cwarn!(cluster = neighbor, %err, "jump: force-load failed");
                self.diagnostics.info(
                    now_ms,
                    format!("Failed to load cluster {neighbor} for navigation: {err}"),
                );
            }
        }

        let mut deadline = Deadline::new();
        deadline.schedule(now_ms, self.options.load_settle_ms);
        self.jump = Some(PendingJump {
            record_index,
            cluster,
            offset,
            stage: JumpStage::Settling,
            deadline,
        });
        Ok(())
    }

    /// Signals that the scroll started by the pending jump has finished.
    ///
    /// Returns `true` if a scrolling jump was completed by this call.
    pub fn scroll_settled(&mut self, now_ms: u64) -> bool {
        self.now_ms = now_ms;
        let scrolling = self
            .jump
            .as_ref()
            .is_some_and(|j| j.stage == JumpStage::Scrolling);
        if scrolling {
            self.finish_jump(now_ms);
        }
        scrolling
    }

    pub(crate) fn advance_navigation(&mut self, now_ms: u64) {
        let Some(jump) = &mut self.jump else {
            return;
        };
        if !jump.deadline.fire(now_ms) {
            return;
        }
        let stage = jump.stage;
        match stage {
            JumpStage::Settling => self.locate_and_scroll(now_ms),
            JumpStage::Scrolling | JumpStage::Recovering => self.finish_jump(now_ms),
        }
    }

    fn locate_and_scroll(&mut self, now_ms: u64) {
        let Some(jump) = self.jump.clone() else {
            return;
        };
        let row = self
            .surface
            .find_node_for_cluster(jump.cluster)
            .and_then(|node| self.surface.find_row(&node, jump.offset));

        let (stage, delay) = match row {
            Some(row) => {
                self.surface.scroll_into_view(&row, self.options.scroll_align);
                self.highlight(row, now_ms);
                self.diagnostics.info(
                    now_ms,
                    format!("Successfully jumped to row {}", jump.record_index),
                );
                cdebug!(record_index = jump.record_index, "jump scrolled into view");
                (JumpStage::Scrolling, self.options.scroll_settle_ms)
            }
            None => {
                cwarn!(
                    record_index = jump.record_index,
                    cluster = jump.cluster,
                    "jump target row not found"
                );
                self.diagnostics
                    .info(now_ms, format!("Failed to find row {}", jump.record_index));
                (JumpStage::Recovering, self.options.failure_resume_ms)
            }
        };

        if let Some(pending) = &mut self.jump {
            pending.stage = stage;
            pending.deadline.schedule(now_ms, delay);
        }
    }

    fn finish_jump(&mut self, now_ms: u64) {
        if let Some(jump) = self.jump.take() {
            cdebug!(
                record_index = jump.record_index,
                stage = ?jump.stage,
                "jump finished"
            );
            self.resume(now_ms);
        }
    }

    fn highlight(&mut self, node: R::Node, now_ms: u64) {
        self.surface.set_highlighted(&node, true);
        let mut until = Deadline::new();
        until.schedule(now_ms, self.options.highlight_ms);
        match self.highlights.iter().position(|h| h.node == node) {
            Some(i) => self.highlights[i].until = until,
            None => self.highlights.push(Highlight { node, until }),
        }
    }

    pub(crate) fn expire_highlights(&mut self, now_ms: u64) {
        let surface = &mut self.surface;
        self.highlights.retain_mut(|h| {
            if h.until.fire(now_ms) {
                surface.set_highlighted(&h.node, false);
                false
            } else {
                true
            }
        });
    }

    /// Number of rows currently highlighted by jumps.
    pub fn highlighted_count(&self) -> usize {
        self.highlights.len()
    }
}
