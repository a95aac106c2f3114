//! Delta Writer (spec.md §4.4): per-timestep delta-encoded forwarding file,
//! plus the one-time t=0 interface-bandwidth file.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::snapshot::Snapshot;
use crate::types::{ForwardingTable, NodeId};

#[inline]
fn gs_node_id(num_satellites: u32, gid: u32) -> NodeId {
    num_satellites + gid
}

/// Keys in the fixed order spec.md §5 mandates: all sat→gs, then all gs→gs,
/// then (if `include_sat_to_sat`) all sat→sat. Iterated directly rather than
/// relying on `ForwardingTable`'s hash order.
fn ordered_keys(
    num_satellites: u32,
    num_ground_stations: u32,
    include_sat_to_sat: bool,
) -> impl Iterator<Item = (NodeId, NodeId)> {
    let s = num_satellites;
    let g = num_ground_stations;

    let sat_to_gs = (0..s).flat_map(move |src| (0..g).map(move |gid| (src, gs_node_id(s, gid))));

    let gs_to_gs = (0..g).flat_map(move |src_gid| {
        (0..g)
            .filter(move |&dst_gid| dst_gid != src_gid)
            .map(move |dst_gid| (gs_node_id(s, src_gid), gs_node_id(s, dst_gid)))
    });

    let sat_to_sat: Box<dyn Iterator<Item = (NodeId, NodeId)>> = if include_sat_to_sat {
        Box::new((0..s).flat_map(move |src| {
            (0..s)
                .filter(move |&dst| dst != src)
                .map(move |dst| (src, dst))
        }))
    } else {
        Box::new(std::iter::empty())
    };

    sat_to_gs.chain(gs_to_gs).chain(sat_to_sat)
}

/// Write `fstate_<time_since_epoch_ns>.txt`: one line per key whose triple
/// changed relative to `previous` (or every key, if there is no previous
/// table — spec.md §4.4). Keys absent from `current` are treated as the
/// drop sentinel, matching the invariant that the schema never deletes keys.
pub fn write_delta_file(
    output_dir: &Path,
    time_since_epoch_ns: u64,
    num_satellites: u32,
    num_ground_stations: u32,
    include_sat_to_sat: bool,
    current: &ForwardingTable,
    previous: Option<&ForwardingTable>,
) -> Result<()> {
    let path = output_dir.join(format!("fstate_{}.txt", time_since_epoch_ns));
    let mut out = String::new();

    for key @ (src, dst) in ordered_keys(num_satellites, num_ground_stations, include_sat_to_sat) {
        let entry = current.get(&key).copied().unwrap_or_default();
        let changed = match previous {
            None => true,
            Some(prev) => prev.get(&key).copied().unwrap_or_default() != entry,
        };
        if changed {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                src, dst, entry.next_hop, entry.out_iface, entry.in_iface
            ));
        }
    }

    fs::write(path, out)?;
    Ok(())
}

/// Write `gsl_if_bandwidth_0.txt` (spec.md §4.4, §6). Only ever called for
/// t=0: satellite GSL interfaces split `num_ground_stations` bandwidth
/// evenly across their `num_ground_stations` interfaces (one per ground
/// station), ground stations get their single interface at full bandwidth
/// 1.0 (spec.md §4.5 validation: this is the only configuration the
/// controller accepts).
pub fn write_bandwidth_file(output_dir: &Path, snapshot: &Snapshot) -> Result<()> {
    let path = output_dir.join("gsl_if_bandwidth_0.txt");
    let mut out = String::new();
    let g = snapshot.num_ground_stations;
    // aggregate_max_bandwidth for a satellite is fixed at num_ground_stations
    // (spec.md §4.5 validation), split evenly across its G GSL interfaces.
    let per_interface_bandwidth = 1.0_f64;

    for sat in 0..snapshot.num_satellites {
        let base = snapshot.num_isls_per_sat[sat as usize];
        for i in 0..g {
            out.push_str(&format!(
                "{},{},{:.6}\n",
                sat,
                base + i,
                per_interface_bandwidth
            ));
        }
    }

    for gid in 0..g {
        let node = gs_node_id(snapshot.num_satellites, gid);
        out.push_str(&format!("{},0,{:.6}\n", node, 1.0));
    }

    fs::write(path, out)?;
    Ok(())
}
