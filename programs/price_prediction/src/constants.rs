// Centralized Protocol Constants

// Round Timing
// ============

/// Default length of one round phase (seconds). A round is open for one interval
/// and locked for one more before it can be closed.
pub const DEFAULT_INTERVAL_SECONDS: i64 = 300;

/// Default tolerance after lock/close time during which the operator may still
/// lock or close a round. Past it the round can only be refunded.
pub const DEFAULT_BUFFER_SECONDS: i64 = 30;

/// Default allowance for how far ahead of the current time an oracle update
/// may be stamped.
pub const DEFAULT_ORACLE_UPDATE_ALLOWANCE_SECONDS: i64 = 300;

// Rates
// =====

/// All rates are whole percentages of this base.
pub const PERCENT_BASE: u64 = 100;

/// Upper bound for the treasury rate (percent of every stake).
pub const MAX_TREASURY_RATE: u8 = 10;

/// Default treasury rate (percent).
pub const DEFAULT_TREASURY_RATE: u8 = 3;

/// Maximum number of entries in the staking tier bonus table (tier 0 included).
pub const MAX_STAKING_TIERS: usize = 8;

// Betting
// =======

/// Default minimum stake in base units (0.001 with 9 decimals).
pub const DEFAULT_MIN_BET_AMOUNT: u64 = 1_000_000;

/// Maximum number of epochs one `claim` call may settle.
pub const MAX_CLAIM_BATCH: usize = 16;

// Accounts
// ========

/// Initial version for account structures.
pub const INITIAL_VERSION: u16 = 1;

/// Anchor account discriminator length.
pub const DISCRIMINATOR_LEN: usize = 8;
