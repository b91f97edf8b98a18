//! A headless clustered list virtualization engine.
//!
//! For a ready-made in-memory host (render surface, viewport tracker, smooth scrolling), see
//! the `clusterlist-adapter` crate.
//!
//! Records are grouped into fixed-size clusters. Only clusters near the viewport are
//! materialized; the rest are rendered as placeholders sized from one measured reference
//! cluster, which keeps the scroll height stable while the rendered node count stays small.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - an ordered record source ([`RecordSource`])
//! - a render surface that creates, swaps and measures nodes ([`RenderSurface`])
//! - a viewport visibility tracker that reports enter/leave transitions ([`VisibilityTracker`])
//! - a millisecond clock, passed into every time-dependent call
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod diagnostics;
mod engine;
mod error;
mod estimate;
mod materializer;
mod navigator;
mod options;
mod partition;
mod reconciler;
mod surface;
mod timer;
mod types;


pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use engine::ClusterList;
pub use error::{Error, Result};
pub use estimate::{HeightEstimator, estimate_height};
pub use navigator::JumpStage;
pub use options::ClusterListOptions;
pub use partition::Partition;
pub use surface::{RecordSource, RenderSurface, VisibilityTracker};
pub use timer::Deadline;
pub use types::{
    Align, ClusterRange, ClusterState, Level, LogRecord, Status, TrackerConfig, VisibilityEntry,
};
