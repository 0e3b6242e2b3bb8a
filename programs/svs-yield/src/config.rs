use anchor_lang::prelude::*;

use crate::{
    constants::{
        DEFAULT_MAX_SNAPSHOTS, DEFAULT_MIN_SNAPSHOT_DELAY, DEFAULT_STALE_TIME,
        MAX_YIELD_POSITIONS, MIN_SEED_DEPOSIT,
    },
    error::VaultError,
};

/// Tunables fixed at vault initialization
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultConfig {
    /// Seconds that must elapse between two accepted price snapshots
    pub min_snapshot_delay: i64,
    /// Snapshots retained per position
    pub max_snapshots: u8,
    /// Snapshots older than this (seconds) are ignored for averaging
    pub stale_time: i64,
    /// Seed deposit required at initialization
    pub min_seed_deposit: u64,
    /// Upper bound on simultaneously registered yield positions
    pub max_positions: u16,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            min_snapshot_delay: DEFAULT_MIN_SNAPSHOT_DELAY,
            max_snapshots: DEFAULT_MAX_SNAPSHOTS,
            stale_time: DEFAULT_STALE_TIME,
            min_seed_deposit: MIN_SEED_DEPOSIT,
            max_positions: MAX_YIELD_POSITIONS,
        }
    }
}

impl VaultConfig {
    pub fn validate(&self) -> Result<()> {
        require!(self.min_snapshot_delay >= 0, VaultError::InvalidConfig);
        require!(self.max_snapshots > 0, VaultError::InvalidConfig);
        // A window shorter than the snapshot delay could never hold two samples
        require!(
            self.stale_time >= self.min_snapshot_delay,
            VaultError::InvalidConfig
        );
        require!(self.min_seed_deposit > 0, VaultError::InvalidConfig);
        require!(self.max_positions > 0, VaultError::InvalidConfig);
        Ok(())
    }
}
