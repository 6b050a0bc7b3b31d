//! Strongly typed identifier wrappers.
//!
//! Two kinds of node identifier exist side by side:
//!
//! - [`NodeId`] is the stable external key carried by the map data (an OSM
//!   node id).  Sparse, signed, and the only id callers ever see in routes.
//! - [`NodeIdx`] is the dense slot a node occupies in a frozen graph's arrays.
//!   Search state is indexed by `NodeIdx` so the hot loop never hashes.
//!
//! Both are `Copy + Ord + Hash` so they work as map keys and sort keys
//! without ceremony.

use std::fmt;

/// External, stable node identifier (the OSM node id).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<i64> for NodeId {
    #[inline(always)]
    fn from(raw: i64) -> Self {
        NodeId(raw)
    }
}

/// Dense index of a node inside a frozen graph.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    /// Sentinel meaning "no node", e.g. an unset parent pointer.
    pub const INVALID: NodeIdx = NodeIdx(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for NodeIdx {
    /// Returns the `INVALID` sentinel so uninitialized slots are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIdx({})", self.0)
    }
}

impl From<NodeIdx> for usize {
    #[inline(always)]
    fn from(idx: NodeIdx) -> usize {
        idx.0 as usize
    }
}

impl TryFrom<usize> for NodeIdx {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<NodeIdx, Self::Error> {
        u32::try_from(n).map(NodeIdx)
    }
}
