/// Sentinel amount meaning "everything available"
pub const MAX_AMOUNT: u64 = u64::MAX;

/// Seed deposit required to initialize a vault (first-depositor inflation guard)
pub const MIN_SEED_DEPOSIT: u64 = 1000;

pub const MAX_YIELD_POSITIONS: u16 = 25;

pub const DEFAULT_MIN_SNAPSHOT_DELAY: i64 = 5 * 60;
pub const DEFAULT_MAX_SNAPSHOTS: u8 = 20;
pub const DEFAULT_STALE_TIME: i64 = 3 * 24 * 60 * 60;

pub const MAX_VAULT_TOKEN_DECIMALS: u8 = 18;
