//! Host utilities for the `clusterlist` crate.
//!
//! The `clusterlist` engine is UI-agnostic: it talks to a render surface and a visibility
//! tracker through traits. This crate provides framework-neutral implementations of both,
//! plus the pieces a host usually needs around them:
//!
//! - [`MemorySurface`]: an in-memory scroll container that stacks cluster nodes vertically
//! - [`ViewportTracker`]: geometric visibility tracking with a buffer margin and threshold
//! - [`ScrollTween`]: smooth scrolling for jump requests
//! - [`NavigationInput`]: the "jump to row" text field
//! - [`HeadlessHost`]: all of the above wired to a `ClusterList`, driven by virtual time
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod host;
mod input;
mod layout;
mod memory;
mod tween;
mod viewport;

#[cfg(test)]
mod tests;

pub use host::HeadlessHost;
pub use input::{InputError, NavigationInput};
pub use layout::StackLayout;
pub use memory::{MemorySurface, NodeId, NodeKind, ScrollRequest, SurfaceOps};
pub use tween::{Easing, ScrollTween};
pub use viewport::ViewportTracker;
