//! Look-ahead window: a ring of `K` consecutive snapshots (spec.md §4.1).

use std::collections::VecDeque;

use crate::error::Result;
use crate::snapshot::{GraphProvider, Snapshot};

/// Holds snapshots for timesteps `[t, t+1, .. t+K-1]` while processing
/// timestep `t`. `K=1` degenerates to "just the current snapshot", which is
/// how FREE-GS uses this type (spec.md §4.1).
pub struct LookaheadWindow {
    k: usize,
    ring: VecDeque<Snapshot>,
}

impl LookaheadWindow {
    /// Fetch snapshots for `t0..t0+k-1` from `provider`.
    pub fn init(provider: &dyn GraphProvider, t0: u64, k: usize) -> Result<Self> {
        assert!(k >= 1, "lookahead window size must be >= 1");
        let mut ring = VecDeque::with_capacity(k);
        for i in 0..k as u64 {
            ring.push_back(provider.snapshot(t0 + i)?);
        }
        Ok(Self { k, ring })
    }

    /// Evict the oldest snapshot and fetch the one for `t + K - 1`, where `t`
    /// is the new "current" timestep (the window now covers `t..t+K-1`).
    pub fn advance(&mut self, provider: &dyn GraphProvider, t: u64) -> Result<()> {
        let newest = provider.snapshot(t + self.k as u64 - 1)?;
        self.ring.pop_front();
        self.ring.push_back(newest);
        Ok(())
    }

    /// The snapshot used to decide routing for the current timestep (logical offset 0).
    #[inline]
    pub fn current(&self) -> &Snapshot {
        &self.ring[0]
    }

    /// All `K` snapshots in logical order (oldest/current first).
    #[inline]
    pub fn all(&self) -> impl Iterator<Item = &Snapshot> {
        self.ring.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}
