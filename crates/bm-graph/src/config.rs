//! Load-phase configuration.

/// What to do when a node id is declared a second time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DuplicateNodePolicy {
    /// Overwrite the coordinate and drop every edge recorded against the
    /// earlier declaration, on both endpoints.
    #[default]
    LastWriteWins,
    /// Keep the first declaration and report [`GraphError::DuplicateNode`].
    ///
    /// [`GraphError::DuplicateNode`]: crate::GraphError::DuplicateNode
    Reject,
}

/// Options for building a [`RoadGraph`](crate::RoadGraph).
///
/// Typically loaded from a TOML/JSON file by the application crate (with the
/// `serde` feature) and passed to the builder.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    pub duplicate_nodes: DuplicateNodePolicy,
}

impl GraphConfig {
    pub fn rejecting_duplicates() -> Self {
        Self { duplicate_nodes: DuplicateNodePolicy::Reject }
    }
}
