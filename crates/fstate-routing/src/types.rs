//! Node identifiers, interfaces, and the forwarding-entry schema.
//!
//! Ids `0..num_satellites` are satellites, `num_satellites..num_satellites+num_ground_stations`
//! are ground stations (spec.md §3). Everything here is plain data — no graph traversal.

use serde::{Deserialize, Serialize};

pub type NodeId = u32;

/// Sentinel triple meaning "no route" (spec.md §3, §4.3 step 5).
pub const DROP_SENTINEL: ForwardingEntry = ForwardingEntry {
    next_hop: -1,
    out_iface: -1,
    in_iface: -1,
};

/// One row of a forwarding table: `(src, dst) -> (next_hop, out_iface, in_iface)`.
///
/// `next_hop == -1` is the drop sentinel; the two interface fields are then
/// also `-1` by convention so the triple compares equal across timesteps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingEntry {
    pub next_hop: i64,
    pub out_iface: i32,
    pub in_iface: i32,
}

impl ForwardingEntry {
    pub fn new(next_hop: NodeId, out_iface: u32, in_iface: u32) -> Self {
        Self {
            next_hop: next_hop as i64,
            out_iface: out_iface as i32,
            in_iface: in_iface as i32,
        }
    }

    pub fn is_drop(&self) -> bool {
        self.next_hop < 0
    }
}

impl Default for ForwardingEntry {
    fn default() -> Self {
        DROP_SENTINEL
    }
}

/// A candidate satellite a ground station can reach over its GSL, with the
/// link distance in meters (spec.md §3 "GSL candidate").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GslCandidate {
    pub distance_m: f64,
    pub sat_id: NodeId,
}

/// Complete forwarding table for one timestep, keyed by `(src, dst)`.
pub type ForwardingTable = std::collections::HashMap<(NodeId, NodeId), ForwardingEntry>;
