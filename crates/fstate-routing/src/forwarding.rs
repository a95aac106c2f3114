//! Forwarding Table Builder (spec.md §4.3): turns the distance kernel's
//! output into `(src, dst) -> (next_hop, out_iface, in_iface)` entries for
//! sat→gs, gs→gs, and (ANCHOR-LMSR only) sat→sat.
//!
//! The three algorithms share every structural rule here — which candidates
//! are considered, how ties break, which pass feeds which — differing only
//! in how a path's "cost across the window" is evaluated. That's captured
//! by [`WindowDistances`]; the three `*_entry` functions below never branch
//! on algorithm directly.

use std::collections::HashMap;

use crate::distance::{anchor_next_hop, composite_distance, AnchorData, DistanceMatrix};
use crate::snapshot::Snapshot;
use crate::types::{ForwardingEntry, ForwardingTable, NodeId, DROP_SENTINEL};

#[inline]
fn gs_node_id(num_satellites: u32, gid: u32) -> NodeId {
    num_satellites + gid
}

/// Per-algorithm distance data for the current look-ahead window, as
/// produced by the distance kernel (spec.md §4.2). `FreeGs` carries a
/// single matrix (current snapshot only); `NaiveLmsr`/`AnchorLmsr` carry one
/// entry per window snapshot, oldest/current first (matching
/// [`crate::window::LookaheadWindow::all`]'s order).
pub enum WindowDistances<'a> {
    FreeGs(&'a DistanceMatrix),
    NaiveLmsr(&'a [DistanceMatrix]),
    AnchorLmsr(&'a [AnchorData]),
}

impl WindowDistances<'_> {
    /// `max_over_window(dist_t[u][v])` (spec.md §4.3 steps 1 and 4).
    /// `+inf` as soon as any window snapshot can't reach `v` from `u`.
    fn max_dist(&self, u: NodeId, v: NodeId) -> f64 {
        if u == v {
            return 0.0;
        }
        match self {
            WindowDistances::FreeGs(m) => m.get(u, v),
            WindowDistances::NaiveLmsr(ms) => {
                let mut worst = f64::NEG_INFINITY;
                for m in ms.iter() {
                    worst = worst.max(m.get(u, v));
                }
                worst
            }
            WindowDistances::AnchorLmsr(ads) => {
                let mut worst = f64::NEG_INFINITY;
                for ad in ads.iter() {
                    match composite_distance(ad, u, v) {
                        Some(d) => worst = worst.max(d),
                        None => return f64::INFINITY,
                    }
                }
                worst
            }
        }
    }

    /// The current-timestep (logical window offset 0) anchor data, used for
    /// the sat→sat next-hop rule (spec.md §4.3 "sat → sat" step 2), which is
    /// evaluated only against the present snapshot, not the whole window.
    fn current_anchor_data(&self) -> Option<&AnchorData> {
        match self {
            WindowDistances::AnchorLmsr(ads) => ads.first(),
            _ => None,
        }
    }
}

/// Build the complete forwarding table for one timestep (spec.md §4.3).
/// `emit_sat_to_sat` gates the ANCHOR-LMSR-only sat→sat pass (spec.md §9
/// open question: the source always emits it; this crate makes it optional
/// because it multiplies output size by roughly the satellite count).
pub fn build_forwarding_table(
    snapshot: &Snapshot,
    distances: &WindowDistances,
    emit_sat_to_sat: bool,
) -> ForwardingTable {
    let s = snapshot.num_satellites;
    let g = snapshot.num_ground_stations;
    let mut table = ForwardingTable::with_capacity(s as usize * g as usize * 2);
    let mut dist_sat_to_gs: HashMap<(NodeId, NodeId), f64> = HashMap::new();

    for src in 0..s {
        for gid in 0..g {
            let dst = gs_node_id(s, gid);
            let entry = sat_to_gs_entry(snapshot, distances, src, gid, dst, &mut dist_sat_to_gs);
            table.insert((src, dst), entry);
        }
    }

    for src_gid in 0..g {
        for dst_gid in 0..g {
            if src_gid == dst_gid {
                continue;
            }
            let src = gs_node_id(s, src_gid);
            let dst = gs_node_id(s, dst_gid);
            let entry = gs_to_gs_entry(snapshot, src_gid, dst_gid, s, &dist_sat_to_gs);
            table.insert((src, dst), entry);
        }
    }

    if emit_sat_to_sat {
        if let Some(current_anchor) = distances.current_anchor_data() {
            for src in 0..s {
                for dst in 0..s {
                    if src == dst {
                        continue;
                    }
                    let entry = sat_to_sat_entry(snapshot, distances, current_anchor, src, dst);
                    table.insert((src, dst), entry);
                }
            }
        }
    }

    table
}

/// spec.md §4.3 "sat → gs", steps 1-5. Also fills `dist_sat_to_gs`, the
/// side-output the gs→gs pass needs.
fn sat_to_gs_entry(
    snapshot: &Snapshot,
    distances: &WindowDistances,
    s: NodeId,
    gid: u32,
    dst: NodeId,
    dist_sat_to_gs: &mut HashMap<(NodeId, NodeId), f64>,
) -> ForwardingEntry {
    let mut best: Option<(f64, NodeId)> = None;
    for candidate in &snapshot.gs_in_range[gid as usize] {
        let b = candidate.sat_id;
        let window_dist = distances.max_dist(s, b);
        if !window_dist.is_finite() {
            continue;
        }
        let total = window_dist + candidate.distance_m;
        best = Some(better(best, (total, b)));
    }

    let (total, b_star) = match best {
        Some(v) => v,
        None => return DROP_SENTINEL,
    };
    dist_sat_to_gs.insert((s, dst), total);

    if s == b_star {
        let gsl_if = snapshot.gsl_interface_index(s, gid);
        return ForwardingEntry::new(dst, gsl_if, 0);
    }

    let mut best_hop: Option<(f64, NodeId)> = None;
    for n in snapshot.neighbors(s) {
        let w = snapshot
            .edge_weight(s, n)
            .expect("neighbor iterator implies an edge weight exists");
        let cost = w + distances.max_dist(n, b_star);
        if !cost.is_finite() {
            continue;
        }
        best_hop = Some(better(best_hop, (cost, n)));
    }

    match best_hop {
        Some((_, n)) => {
            let out_if = snapshot.sat_neighbor_to_if[&(s, n)];
            let in_if = snapshot.sat_neighbor_to_if[&(n, s)];
            ForwardingEntry::new(n, out_if, in_if)
        }
        None => DROP_SENTINEL,
    }
}

/// spec.md §4.3 "gs → gs", steps 1-3.
fn gs_to_gs_entry(
    snapshot: &Snapshot,
    src_gid: u32,
    dst_gid: u32,
    num_satellites: u32,
    dist_sat_to_gs: &HashMap<(NodeId, NodeId), f64>,
) -> ForwardingEntry {
    let dst = gs_node_id(num_satellites, dst_gid);
    let mut best: Option<(f64, NodeId)> = None;
    for candidate in &snapshot.gs_in_range[src_gid as usize] {
        let a = candidate.sat_id;
        let d = match dist_sat_to_gs.get(&(a, dst)) {
            Some(&d) => d,
            None => continue,
        };
        let total = candidate.distance_m + d;
        best = Some(better(best, (total, a)));
    }

    match best {
        Some((_, a_star)) => {
            let in_if = snapshot.gsl_interface_index(a_star, src_gid);
            ForwardingEntry::new(a_star, 0, in_if)
        }
        None => DROP_SENTINEL,
    }
}

/// spec.md §4.3 "sat → sat" (ANCHOR-LMSR only), steps 1-3.
fn sat_to_sat_entry(
    snapshot: &Snapshot,
    distances: &WindowDistances,
    current_anchor: &AnchorData,
    s: NodeId,
    d: NodeId,
) -> ForwardingEntry {
    if !distances.max_dist(s, d).is_finite() {
        return DROP_SENTINEL;
    }

    let next_hop = match anchor_next_hop(current_anchor, s, d) {
        Some(n) => n,
        None => return DROP_SENTINEL,
    };

    if snapshot.edge_weight(s, next_hop).is_none() {
        return DROP_SENTINEL;
    }

    let out_if = snapshot.sat_neighbor_to_if[&(s, next_hop)];
    let in_if = snapshot.sat_neighbor_to_if[&(next_hop, s)];
    ForwardingEntry::new(next_hop, out_if, in_if)
}

/// Deterministic `(cost, id)` comparison: smaller cost wins, smaller id
/// breaks ties (spec.md §4.3 final paragraph, §5 ordering guarantees).
fn better(current: Option<(f64, NodeId)>, candidate: (f64, NodeId)) -> (f64, NodeId) {
    match current {
        None => candidate,
        Some(cur) => {
            if candidate.0 < cur.0 || (candidate.0 == cur.0 && candidate.1 < cur.1) {
                candidate
            } else {
                cur
            }
        }
    }
}
