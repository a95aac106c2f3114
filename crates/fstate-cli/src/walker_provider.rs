//! [`GraphProvider`] backed by real orbital mechanics: the 12-satellite
//! Walker-Delta HALO constellation, SGP4-propagated per timestep, with GSL
//! visibility to the FSO ground-station network computed from straight-line
//! distance. Demonstrates wiring the routing engine to a live topology
//! source; not a reimplementation of the excluded visibility subsystem
//! (spec.md §1 "out of scope") — elevation masks, weather, and link budget
//! are all ignored in favor of a flat distance threshold.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use ground_stations::StationRegistry;
use orbital_mechanics::transforms::geodetic_to_eci;
use orbital_mechanics::walker::WalkerDelta;
use orbital_mechanics::{GeodeticPosition, Satellite};

use fstate_routing::error::Result;
use fstate_routing::snapshot::{GraphProvider, Snapshot};
use fstate_routing::types::{GslCandidate, NodeId};

/// Propagates the HALO constellation with SGP4 and re-derives ISL/GSL
/// topology from scratch at every timestep, so `snapshot(t)` stays a pure
/// function of `t` as [`GraphProvider`] requires.
pub struct WalkerGraphProvider {
    satellites: Vec<Satellite>,
    ground_stations: Vec<GeodeticPosition>,
    epoch: DateTime<Utc>,
    max_gsl_length_km: f64,
    max_isl_length_km: f64,
    time_step_ns: u64,
}

impl WalkerGraphProvider {
    pub fn new(max_gsl_length_m: f64, max_isl_length_m: f64, time_step_ns: u64) -> Self {
        let satellites = WalkerDelta::halo_constellation().generate_satellites();
        let ground_stations = StationRegistry::with_fso_network()
            .operational()
            .map(|gs| GeodeticPosition {
                latitude: gs.location.latitude,
                longitude: gs.location.longitude,
                altitude_km: gs.location.altitude_m / 1000.0,
            })
            .collect();

        Self {
            satellites,
            ground_stations,
            epoch: Utc::now(),
            max_gsl_length_km: max_gsl_length_m / 1000.0,
            max_isl_length_km: max_isl_length_m / 1000.0,
            time_step_ns,
        }
    }

    fn time_at(&self, t: u64) -> DateTime<Utc> {
        let elapsed_ns = t.saturating_mul(self.time_step_ns);
        self.epoch + Duration::nanoseconds(elapsed_ns as i64)
    }
}

impl GraphProvider for WalkerGraphProvider {
    fn snapshot(&self, t: u64) -> Result<Snapshot> {
        let time = self.time_at(t);
        let num_satellites = self.satellites.len() as u32;
        let num_ground_stations = self.ground_stations.len() as u32;

        let positions_km: Vec<(f64, f64, f64)> = self
            .satellites
            .iter()
            .map(|sat| {
                sat.propagate(time)
                    .map(|sv| (sv.position_x, sv.position_y, sv.position_z))
                    .unwrap_or((0.0, 0.0, 0.0))
            })
            .collect();

        let mut isl_edges = Vec::new();
        for i in 0..positions_km.len() {
            for j in (i + 1)..positions_km.len() {
                let d = distance_km(positions_km[i], positions_km[j]);
                if d <= self.max_isl_length_km {
                    isl_edges.push((i as NodeId, j as NodeId, d * 1000.0));
                }
            }
        }

        let mut next_if = vec![0u32; num_satellites as usize];
        let mut sat_neighbor_to_if = HashMap::with_capacity(isl_edges.len() * 2);
        for &(u, v, _) in &isl_edges {
            sat_neighbor_to_if.insert((u, v), next_if[u as usize]);
            next_if[u as usize] += 1;
            sat_neighbor_to_if.insert((v, u), next_if[v as usize]);
            next_if[v as usize] += 1;
        }

        let gs_in_range: Vec<Vec<GslCandidate>> = self
            .ground_stations
            .iter()
            .map(|gs| {
                let gs_pos = geodetic_to_eci(gs).unwrap_or((0.0, 0.0, 0.0));
                positions_km
                    .iter()
                    .enumerate()
                    .filter_map(|(sat_id, &sat_pos)| {
                        let d = distance_km(gs_pos, sat_pos);
                        (d <= self.max_gsl_length_km).then_some(GslCandidate {
                            distance_m: d * 1000.0,
                            sat_id: sat_id as NodeId,
                        })
                    })
                    .collect()
            })
            .collect();

        Snapshot::new(
            t,
            num_satellites,
            num_ground_stations,
            &isl_edges,
            sat_neighbor_to_if,
            gs_in_range,
        )
    }
}

fn distance_km(a: (f64, f64, f64), b: (f64, f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    let dz = a.2 - b.2;
    (dx * dx + dy * dy + dz * dz).sqrt()
}
