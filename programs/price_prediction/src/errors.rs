use anchor_lang::prelude::*;

#[error_code]
pub enum PredictionError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Market paused")]
    Paused,
    #[msg("Market not paused")]
    NotPaused,
    #[msg("Math overflow")]
    MathOverflow,

    // -----------------
    // Configuration
    // -----------------
    #[msg("Buffer must be positive and shorter than the interval")]
    InvalidTiming,
    #[msg("Minimum bet amount must be greater than 0")]
    InvalidMinBetAmount,
    #[msg("Treasury rate too high")]
    TreasuryRateTooHigh,
    #[msg("Referral and staking bonus rates exceed 100%")]
    BonusRatesTooHigh,
    #[msg("Invalid staking tier bonus table")]
    InvalidTierTable,
    #[msg("Oracle feed not set")]
    OracleNotSet,

    // -----------------
    // Sequence
    // -----------------
    #[msg("Genesis open already done")]
    GenesisOpenAlreadyDone,
    #[msg("Genesis open not done")]
    GenesisOpenNotDone,
    #[msg("Genesis lock already done")]
    GenesisLockAlreadyDone,
    #[msg("Genesis lock not done")]
    GenesisLockNotDone,
    #[msg("Previous rounds not closed yet")]
    PreviousRoundNotClosed,
    #[msg("Round not started")]
    RoundNotStarted,
    #[msg("Round already started")]
    RoundAlreadyStarted,
    #[msg("Round not locked")]
    RoundNotLocked,
    #[msg("Round already locked")]
    RoundAlreadyLocked,
    #[msg("Round not resolved")]
    RoundNotResolved,
    #[msg("Round already resolved")]
    RoundAlreadyResolved,
    #[msg("Round epoch mismatch")]
    EpochMismatch,

    // -----------------
    // Window
    // -----------------
    #[msg("Round not bettable")]
    RoundNotBettable,
    #[msg("Bet amount below minimum")]
    BetBelowMinimum,
    #[msg("Too early to lock round")]
    LockTooEarly,
    #[msg("Lock buffer exceeded")]
    LockBufferExceeded,
    #[msg("Too early to close round")]
    CloseTooEarly,
    #[msg("Close buffer exceeded")]
    CloseBufferExceeded,
    #[msg("Round has not ended")]
    RoundNotEnded,

    // -----------------
    // Oracle
    // -----------------
    #[msg("Oracle round id did not advance")]
    OracleRoundNotAdvanced,
    #[msg("Oracle update beyond allowance")]
    OracleUpdateBeyondAllowance,
    #[msg("Oracle feed data malformed")]
    OracleFeedMalformed,

    // -----------------
    // Duplicate action
    // -----------------
    #[msg("Already bet in this round")]
    AlreadyBet,
    #[msg("Already claimed")]
    AlreadyClaimed,
    #[msg("Rewards already calculated")]
    RewardsAlreadyCalculated,

    // -----------------
    // Entitlement
    // -----------------
    #[msg("Not eligible for claim")]
    NotClaimable,
    #[msg("Not eligible for refund")]
    NotRefundable,
    #[msg("Nothing to claim")]
    NothingToClaim,

    // -----------------
    // Accounts
    // -----------------
    #[msg("Too many epochs in claim")]
    TooManyEpochs,
    #[msg("Missing claim accounts")]
    MissingClaimAccounts,
    #[msg("Round PDA mismatch")]
    RoundPdaMismatch,
    #[msg("Bet PDA mismatch")]
    BetPdaMismatch,
    #[msg("Referral accrual PDA mismatch")]
    AccrualPdaMismatch,
    #[msg("Registry record PDA mismatch")]
    RegistryRecordMismatch,
    #[msg("Registry record data malformed")]
    RegistryRecordMalformed,
    #[msg("Registry program account missing")]
    RegistryProgramMissing,
    #[msg("Failed to borrow account data")]
    AccountBorrowFailed,
}
