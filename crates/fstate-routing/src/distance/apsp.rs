//! Single-snapshot all-pairs shortest paths (spec.md §4.2.1).
//!
//! V×Dijkstra over the satellite-only ISL graph using a binary heap
//! (`petgraph::algo::dijkstra`, the same routine `orbital-glaf::ConstellationGraph`
//! uses for single-source lookups), one run per satellite. No path is
//! reconstructed here — next hops are derived later by scanning neighbors
//! (spec.md §4.3).

use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;

use crate::snapshot::Snapshot;
use crate::types::NodeId;

/// Dense symmetric distance matrix over satellites. `f64::INFINITY` marks
/// disconnected pairs.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    #[inline]
    pub fn get(&self, u: NodeId, v: NodeId) -> f64 {
        self.data[u as usize * self.n + v as usize]
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }
}

pub fn all_pairs_shortest_paths(snapshot: &Snapshot) -> DistanceMatrix {
    let n = snapshot.num_satellites as usize;
    let mut data = vec![f64::INFINITY; n * n];
    let graph = snapshot.isl_graph();

    for src in 0..n {
        let costs = dijkstra(graph, NodeIndex::new(src), None, |e| *e.weight());
        let row = &mut data[src * n..src * n + n];
        row[src] = 0.0;
        for (idx, dist) in costs {
            row[idx.index()] = dist;
        }
    }

    DistanceMatrix { n, data }
}
