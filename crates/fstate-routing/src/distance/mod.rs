//! Distance Kernel (spec.md §4.2): turns a snapshot (or a window of them)
//! into the data structure each routing algorithm needs.

mod anchor;
mod apsp;

pub use anchor::{anchor_next_hop, composite_distance, AnchorData};
pub use apsp::DistanceMatrix;

use crate::snapshot::Snapshot;
use crate::types::NodeId;

/// All-pairs shortest paths over a single snapshot (spec.md §4.2.1, FREE-GS).
pub fn free_gs_distances(snapshot: &Snapshot) -> DistanceMatrix {
    apsp::all_pairs_shortest_paths(snapshot)
}

/// One APSP matrix per snapshot in the window (spec.md §4.2.2, NAIVE-LMSR).
/// Each call computes only the matrices it is given — incremental reuse of
/// matrices from prior timesteps is the caller's responsibility (the
/// controller keeps a ring and calls this once per newly-arrived snapshot).
pub fn naive_lmsr_distances(snapshots: &[&Snapshot]) -> Vec<DistanceMatrix> {
    snapshots.iter().map(|s| apsp::all_pairs_shortest_paths(s)).collect()
}

/// Multi-source Dijkstra from the anchor set (spec.md §4.2.3, ANCHOR-LMSR).
pub fn anchor_lmsr_data(snapshot: &Snapshot, anchors: &[NodeId]) -> AnchorData {
    anchor::compute_anchor_data(snapshot, anchors)
}
