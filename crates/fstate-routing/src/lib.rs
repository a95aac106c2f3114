//! Jitter-minimized forwarding-state routing engine for time-varying LEO
//! constellation meshes: given a per-timestep graph snapshot provider, emits
//! a delta-encoded forwarding table for every satellite and ground station
//! under one of three algorithms — FREE-GS, NAIVE-LMSR, ANCHOR-LMSR — that
//! trade compute cost against a jitter-minimization objective (minimize the
//! worst-case path length across a look-ahead window of future topologies).
//!
//! The pipeline, leaves first:
//! [`snapshot::GraphProvider`] → [`window::LookaheadWindow`] →
//! [`distance`] → [`forwarding`] → [`delta`], orchestrated per-timestep by
//! [`controller::RouterController`].

pub mod config;
pub mod controller;
pub mod delta;
pub mod distance;
pub mod error;
pub mod forwarding;
pub mod snapshot;
pub mod synthetic;
pub mod types;
pub mod window;

pub use config::{Algorithm, RouterConfig};
pub use controller::RouterController;
pub use error::{ConfigError, RoutingError, TopologyError};
pub use forwarding::{build_forwarding_table, WindowDistances};
pub use snapshot::{GraphProvider, Snapshot};
pub use types::{ForwardingEntry, ForwardingTable, GslCandidate, NodeId, DROP_SENTINEL};
pub use window::LookaheadWindow;
