/// Errors reported by [`crate::ClusterList`] operations.
///
/// None of these are fatal: a failed operation leaves the partition, the always-loaded
/// clusters and the single pending reconciliation untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("index {index} is out of range (count {count})")]
    OutOfRange { index: usize, count: usize },

    #[error("invalid row index {index}: {count} records available")]
    InvalidIndex { index: i64, count: usize },

    #[error("render surface is inconsistent for cluster {cluster}: {reason}")]
    RenderSurfaceInconsistency { cluster: usize, reason: &'static str },

    #[error("cluster {cluster} is always loaded and cannot be replaced by a placeholder")]
    AlwaysLoaded { cluster: usize },

    #[error("the list has not been rendered yet")]
    NotInitialized,
}

impl Error {
    /// A message suitable for showing to whoever typed the jump target.
    pub fn user_message(&self) -> alloc::string::String {
        match self {
            Self::InvalidIndex { count: 0, .. } => {
                alloc::string::String::from("Invalid row index. The list is empty.")
            }
            Self::InvalidIndex { count, .. } => alloc::format!(
                "Invalid row index. Please enter a number between 0 and {}",
                count - 1
            ),
            other => alloc::format!("{other}"),
        }
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
