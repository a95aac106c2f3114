//! Error taxonomy (spec.md §7).
//!
//! `NoRouteCondition` deliberately has no variant here: it is recovered
//! locally as [`crate::types::DROP_SENTINEL`] and never propagated.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("anchor_lmsr requires a non-empty anchor set")]
    EmptyAnchorSet,
    #[error("anchor id {0} is not a satellite (must be < num_satellites={1})")]
    AnchorOutOfRange(NodeId, u32),
    #[error("num_satellites must be > 0")]
    ZeroSatellites,
    #[error("lookahead_steps must be >= 1")]
    ZeroLookahead,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    #[error("graph has {found} nodes, expected {expected} satellites")]
    NodeCountMismatch { found: usize, expected: usize },
    #[error("ISL graph contains an edge to non-satellite node {0}")]
    SatelliteGraphContainsGroundStation(NodeId),
    #[error(
        "satellite {sat} reports {claimed} GSL interfaces, expected {expected} (one per ground station)"
    )]
    GslInterfaceCountMismatch {
        sat: NodeId,
        claimed: u32,
        expected: u32,
    },
    #[error("ground station {0} must have exactly one interface")]
    GroundStationInterfaceCount(NodeId),
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot fetch failed for timestep {t}: {reason}")]
    SnapshotFetch { t: u64, reason: String },
}

pub type Result<T> = std::result::Result<T, RoutingError>;

use crate::types::NodeId;
