//! Property-based coverage of the universal invariants (spec.md §8) across
//! randomly generated small topologies. Grounded in the teacher workspace's
//! `fuzz-harness` pattern (arbitrary small inputs, check invariants hold)
//! reimplemented directly against `proptest` rather than that crate's own
//! (finance-specific, unrelated) generators.

use proptest::collection::vec as pvec;
use proptest::prelude::*;

use fstate_routing::distance::free_gs_distances;
use fstate_routing::forwarding::{build_forwarding_table, WindowDistances};
use fstate_routing::snapshot::Snapshot;
use fstate_routing::types::GslCandidate;

const MAX_SATS: u32 = 6;

/// A random undirected graph over `n` satellites: each unordered pair gets
/// an edge independently with probability ~0.4, weight in `1.0..100.0`.
fn arb_snapshot(n: u32, num_gs: u32) -> impl Strategy<Value = Snapshot> {
    let pair_count = (n as usize * (n as usize - 1)) / 2;
    let edge_flags = pvec(prop::bool::weighted(0.4), pair_count.max(1));
    let weights = pvec(1.0f64..100.0, pair_count.max(1));
    let gs_candidates = pvec(pvec(0..n, 0..=n as usize), num_gs as usize);

    (edge_flags, weights, gs_candidates).prop_map(move |(flags, weights, gs_sats)| {
        let mut edges = Vec::new();
        let mut idx = 0;
        for u in 0..n {
            for v in (u + 1)..n {
                if flags[idx] {
                    edges.push((u, v, weights[idx]));
                }
                idx += 1;
            }
        }

        let mut sat_neighbor_to_if = std::collections::HashMap::new();
        let mut next_if = vec![0u32; n as usize];
        for &(u, v, _) in &edges {
            sat_neighbor_to_if.insert((u, v), next_if[u as usize]);
            next_if[u as usize] += 1;
            sat_neighbor_to_if.insert((v, u), next_if[v as usize]);
            next_if[v as usize] += 1;
        }

        let gs_in_range: Vec<Vec<GslCandidate>> = gs_sats
            .into_iter()
            .map(|sats| {
                sats.into_iter()
                    .map(|sat_id| GslCandidate { distance_m: 10.0, sat_id })
                    .collect()
            })
            .collect();

        Snapshot::new(0, n, num_gs, &edges, sat_neighbor_to_if, gs_in_range)
            .expect("generated topology satisfies the snapshot invariants by construction")
    })
}

/// `(num_satellites, num_ground_stations, snapshot)`, with the snapshot's
/// shape nested under the two size parameters via `prop_flat_map`.
fn arb_sized_snapshot() -> impl Strategy<Value = (u32, u32, Snapshot)> {
    (2u32..MAX_SATS, 0u32..3).prop_flat_map(|(n, num_gs)| {
        arb_snapshot(n, num_gs).prop_map(move |snapshot| (n, num_gs, snapshot))
    })
}

proptest! {
    /// Universal invariant 1: every non-drop entry's next hop is a current
    /// neighbor of its source, or the destination ground station itself.
    #[test]
    fn invariant_next_hop_always_adjacent((n, num_gs, snapshot) in arb_sized_snapshot()) {
        let matrix = free_gs_distances(&snapshot);
        let distances = WindowDistances::FreeGs(&matrix);
        let table = build_forwarding_table(&snapshot, &distances, false);

        for gid in 0..num_gs {
            let gs_node = n + gid;
            for s in 0..n {
                let entry = table[&(s, gs_node)];
                if entry.is_drop() {
                    continue;
                }
                let next_hop = entry.next_hop as u32;
                prop_assert!(
                    next_hop == gs_node || snapshot.edge_weight(s, next_hop).is_some(),
                    "sat {} routes to non-neighbor {}", s, next_hop
                );
            }
        }
    }

    /// Running the builder twice on the same snapshot and distance data
    /// yields byte-identical (here: field-identical) tables — no hidden
    /// nondeterminism from hash-map iteration order or tie-breaking.
    #[test]
    fn determinism_same_input_same_output((_n, _num_gs, snapshot) in arb_sized_snapshot()) {
        let matrix = free_gs_distances(&snapshot);
        let distances = WindowDistances::FreeGs(&matrix);
        let table_a = build_forwarding_table(&snapshot, &distances, false);
        let table_b = build_forwarding_table(&snapshot, &distances, false);

        prop_assert_eq!(table_a, table_b);
    }
}
