//! Deterministic synthetic graph providers (SPEC_FULL.md §2 `graph_provider`
//! SUPPLEMENT): a `GraphProvider` that replays a fixed list of snapshots,
//! plus a couple of topology generators used by the demo CLI and by the
//! integration tests in place of real orbit propagation + visibility
//! computation. Distance-threshold visibility only — not a stand-in for the
//! excluded visibility subsystem (spec.md §1 "out of scope").

use std::collections::HashMap;

use crate::error::Result;
use crate::snapshot::{GraphProvider, Snapshot};
use crate::types::{GslCandidate, NodeId};

/// Replays a fixed sequence of pre-built snapshots, one per timestep index;
/// timesteps past the end clamp to the last snapshot. Used directly by
/// tests that need full control over per-timestep topology (spec.md §8
/// scenario C's "shortest path length varies by timestep" setup), and is
/// the backing provider for the generators below when the topology doesn't
/// change over time.
pub struct FixedSequenceProvider {
    snapshots: Vec<Snapshot>,
}

impl FixedSequenceProvider {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        assert!(
            !snapshots.is_empty(),
            "a FixedSequenceProvider needs at least one snapshot"
        );
        Self { snapshots }
    }
}

impl GraphProvider for FixedSequenceProvider {
    fn snapshot(&self, t: u64) -> Result<Snapshot> {
        let idx = (t as usize).min(self.snapshots.len() - 1);
        let mut snapshot = self.snapshots[idx].clone();
        snapshot.timestep = t;
        Ok(snapshot)
    }
}

/// Assign contiguous per-satellite interface indices in edge-list order —
/// each edge contributes the next free interface at both endpoints, which
/// is one valid provider policy among the ones spec.md §3 allows.
fn assign_interfaces(num_satellites: u32, edges: &[(NodeId, NodeId, f64)]) -> HashMap<(NodeId, NodeId), u32> {
    let mut next_if = vec![0u32; num_satellites as usize];
    let mut map = HashMap::with_capacity(edges.len() * 2);
    for &(u, v, _) in edges {
        let iu = next_if[u as usize];
        next_if[u as usize] += 1;
        map.insert((u, v), iu);

        let iv = next_if[v as usize];
        next_if[v as usize] += 1;
        map.insert((v, u), iv);
    }
    map
}

/// A time-invariant snapshot: same edges and GSL visibility at every
/// timestep. Convenience for scenarios where only the static topology
/// matters (spec.md §8 scenarios A, B, D, E).
pub fn static_topology(
    num_satellites: u32,
    num_ground_stations: u32,
    isl_edges: &[(NodeId, NodeId, f64)],
    gs_in_range: Vec<Vec<GslCandidate>>,
) -> Snapshot {
    let sat_neighbor_to_if = assign_interfaces(num_satellites, isl_edges);
    Snapshot::new(
        0,
        num_satellites,
        num_ground_stations,
        isl_edges,
        sat_neighbor_to_if,
        gs_in_range,
    )
    .expect("synthetic fixture topology must satisfy the snapshot invariants")
}

/// A path graph of `n` satellites (ids `0..n-1`) each separated by
/// `isl_weight_m`, with no ground stations (spec.md §8 scenario A uses this
/// shape with `n=2` plus one ground station layered on separately).
pub fn line_topology(n: u32, isl_weight_m: f64) -> Snapshot {
    let edges: Vec<(NodeId, NodeId, f64)> = (0..n.saturating_sub(1))
        .map(|i| (i, i + 1, isl_weight_m))
        .collect();
    static_topology(n, 0, &edges, Vec::new())
}

/// A `rows x cols` grid of satellites with edges to the right and down
/// neighbor (a "plus-grid" when every interior node has four neighbors),
/// weight `isl_weight_m` on every edge, no ground stations (spec.md §8
/// scenario B's base topology; GSL visibility is layered on by the caller).
pub fn grid_topology(rows: u32, cols: u32, isl_weight_m: f64) -> Snapshot {
    let id = |r: u32, c: u32| -> NodeId { r * cols + c };
    let mut edges = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                edges.push((id(r, c), id(r, c + 1), isl_weight_m));
            }
            if r + 1 < rows {
                edges.push((id(r, c), id(r + 1, c), isl_weight_m));
            }
        }
    }
    static_topology(rows * cols, 0, &edges, Vec::new())
}

/// Layer ground-station visibility onto an existing (ground-station-free)
/// snapshot, keeping its ISL graph and satellite count intact. `gs_in_range`
/// is indexed by ground-station id, the same shape `static_topology` takes.
pub fn with_ground_stations(mut base: Snapshot, gs_in_range: Vec<Vec<GslCandidate>>) -> Snapshot {
    base.num_ground_stations = gs_in_range.len() as u32;
    base.gs_in_range = gs_in_range;
    base
}
