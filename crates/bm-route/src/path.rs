//! Parent-pointer path reconstruction.

use bm_core::NodeIdx;

/// Walk `parent` pointers from `goal` back to `start` and return the path in
/// travel order.
///
/// Returns `None` if the walk hits an unset ([`NodeIdx::INVALID`]) or
/// out-of-range parent before reaching `start`, or if it would visit more
/// nodes than `parent` has slots (a cycle).
pub fn reconstruct(parent: &[NodeIdx], start: NodeIdx, goal: NodeIdx) -> Option<Vec<NodeIdx>> {
    let mut path = vec![goal];
    let mut cur = goal;
    while cur != start {
        if path.len() >= parent.len() {
            return None;
        }
        let prev = *parent.get(cur.index())?;
        if !prev.is_valid() {
            return None;
        }
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    Some(path)
}
