//! Graph snapshot: the immutable per-timestep bundle of ISL topology + GSL
//! visibility that the rest of the engine consumes (spec.md §3, §6).
//!
//! A snapshot is built around a `petgraph::UnGraph` over satellites only —
//! node indices are assigned in id order (`NodeIndex::new(i) == satellite i`)
//! so the graph can be indexed directly without an extra lookup table, the
//! same convention `orbital-glaf`'s `ConstellationGraph` uses for its own
//! `node_index` map, just collapsed to an identity mapping since satellite
//! ids are already dense.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::{Result, RoutingError, TopologyError};
use crate::types::{GslCandidate, NodeId};

/// Immutable topology + visibility bundle for one timestep (spec.md §3 "Graph snapshot").
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub timestep: u64,
    pub num_satellites: u32,
    pub num_ground_stations: u32,
    isl: UnGraph<(), f64>,
    /// Number of ISL interfaces per satellite (also: the first GSL interface index).
    pub num_isls_per_sat: Vec<u32>,
    /// `(sat, neighbor) -> interface index on sat`, provider-assigned (spec.md §3).
    pub sat_neighbor_to_if: HashMap<(NodeId, NodeId), u32>,
    /// In-range satellites per ground station, indexed by gid (spec.md §3 "GSL candidate").
    pub gs_in_range: Vec<Vec<GslCandidate>>,
}

impl Snapshot {
    /// Build a snapshot from an edge list (undirected) and GSL visibility data.
    /// Validates the invariants from spec.md §3 / §7 (node count, no sat→gs
    /// edges leaking into the ISL graph).
    pub fn new(
        timestep: u64,
        num_satellites: u32,
        num_ground_stations: u32,
        isl_edges: &[(NodeId, NodeId, f64)],
        sat_neighbor_to_if: HashMap<(NodeId, NodeId), u32>,
        gs_in_range: Vec<Vec<GslCandidate>>,
    ) -> Result<Self> {
        let mut isl = UnGraph::<(), f64>::with_capacity(num_satellites as usize, isl_edges.len());
        for _ in 0..num_satellites {
            isl.add_node(());
        }

        for &(u, v, w) in isl_edges {
            if u >= num_satellites || v >= num_satellites {
                let bad = if u >= num_satellites { u } else { v };
                return Err(RoutingError::Topology(
                    TopologyError::SatelliteGraphContainsGroundStation(bad),
                ));
            }
            isl.update_edge(NodeIndex::new(u as usize), NodeIndex::new(v as usize), w);
        }

        if isl.node_count() != num_satellites as usize {
            return Err(RoutingError::Topology(TopologyError::NodeCountMismatch {
                found: isl.node_count(),
                expected: num_satellites as usize,
            }));
        }

        let mut num_isls_per_sat = vec![0u32; num_satellites as usize];
        for sat in 0..num_satellites {
            num_isls_per_sat[sat as usize] =
                isl.neighbors(NodeIndex::new(sat as usize)).count() as u32;
        }

        if gs_in_range.len() != num_ground_stations as usize {
            return Err(RoutingError::Topology(TopologyError::NodeCountMismatch {
                found: gs_in_range.len(),
                expected: num_ground_stations as usize,
            }));
        }

        Ok(Self {
            timestep,
            num_satellites,
            num_ground_stations,
            isl,
            num_isls_per_sat,
            sat_neighbor_to_if,
            gs_in_range,
        })
    }

    #[inline]
    pub fn isl_graph(&self) -> &UnGraph<(), f64> {
        &self.isl
    }

    #[inline]
    pub fn neighbors(&self, sat: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.isl
            .neighbors(NodeIndex::new(sat as usize))
            .map(|idx| idx.index() as NodeId)
    }

    #[inline]
    pub fn edge_weight(&self, u: NodeId, v: NodeId) -> Option<f64> {
        self.isl
            .find_edge(NodeIndex::new(u as usize), NodeIndex::new(v as usize))
            .map(|e| self.isl[e])
    }

    #[inline]
    pub fn gsl_interface_index(&self, sat: NodeId, gid: u32) -> u32 {
        self.num_isls_per_sat[sat as usize] + gid
    }
}

/// External interface supplying per-timestep topology (spec.md §6).
/// Must be a pure function of `t`: same `t` always yields the same snapshot.
pub trait GraphProvider {
    fn snapshot(&self, t: u64) -> Result<Snapshot>;
}
