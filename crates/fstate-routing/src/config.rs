//! Typed run configuration (SPEC_FULL.md §6 SUPPLEMENT): everything
//! enumerated in spec.md §6's option table, loadable from JSON the way
//! `candidate-selector` loads its `ScorerConfig`, with the same
//! CLI-flags-override-file pattern left to the binary crate to apply.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::types::NodeId;

/// One of the three routing algorithms spec.md §1 and §4.2 describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    FreeGs,
    NaiveLmsr,
    AnchorLmsr,
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "free_gs" => Ok(Algorithm::FreeGs),
            "naive_lmsr" => Ok(Algorithm::NaiveLmsr),
            "anchor_lmsr" => Ok(Algorithm::AnchorLmsr),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Run configuration (spec.md §6 "Configuration"). Call [`RouterConfig::validate`]
/// after building one by hand (e.g. for a demo run) — [`RouterConfig::load_file`]
/// already does this before returning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    pub num_satellites: u32,
    pub num_ground_stations: u32,
    pub time_step_ns: u64,
    pub duration_s: u64,
    pub max_gsl_length_m: f64,
    pub max_isl_length_m: f64,
    pub algorithm: Algorithm,
    #[serde(default = "default_lookahead_steps")]
    pub lookahead_steps: u32,
    #[serde(default)]
    pub anchor_set: Vec<NodeId>,
    pub output_dir: String,
    /// Whether ANCHOR-LMSR also emits the sat→sat pass (spec.md §9 open
    /// question). Ignored by FREE-GS/NAIVE-LMSR.
    #[serde(default = "default_true")]
    pub emit_sat_to_sat: bool,
}

fn default_lookahead_steps() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

impl RouterConfig {
    /// Load from a JSON file (SPEC_FULL.md §6 schema).
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: RouterConfig = serde_json::from_str(&text)
            .map_err(|e| crate::error::RoutingError::SnapshotFetch {
                t: 0,
                reason: format!("malformed config file {}: {e}", path.display()),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the cross-field invariants spec.md §7 classifies as
    /// `ConfigError` (fatal, caught before the run starts).
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.num_satellites == 0 {
            return Err(ConfigError::ZeroSatellites);
        }
        if matches!(self.algorithm, Algorithm::NaiveLmsr | Algorithm::AnchorLmsr) && self.lookahead_steps == 0 {
            return Err(ConfigError::ZeroLookahead);
        }
        if self.algorithm == Algorithm::AnchorLmsr {
            if self.anchor_set.is_empty() {
                return Err(ConfigError::EmptyAnchorSet);
            }
            for &a in &self.anchor_set {
                if a >= self.num_satellites {
                    return Err(ConfigError::AnchorOutOfRange(a, self.num_satellites));
                }
            }
        }
        Ok(())
    }

    /// Effective window size: FREE-GS always uses K=1 regardless of the
    /// configured `lookahead_steps` (spec.md §4.1).
    pub fn effective_lookahead(&self) -> usize {
        match self.algorithm {
            Algorithm::FreeGs => 1,
            Algorithm::NaiveLmsr | Algorithm::AnchorLmsr => self.lookahead_steps as usize,
        }
    }

    /// Number of `step()` calls a full run makes.
    pub fn num_steps(&self) -> u64 {
        if self.time_step_ns == 0 {
            return 0;
        }
        (self.duration_s * 1_000_000_000) / self.time_step_ns
    }
}
