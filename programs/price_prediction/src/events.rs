use anchor_lang::prelude::*;

use crate::state::Position;

// --- ADMIN ---
#[event]
pub struct MarketCreated {
    pub market: Pubkey,
    pub market_id: u64,
    pub token_mint: Pubkey,
    pub oracle_feed: Pubkey,
}

#[event]
pub struct RolesUpdated {
    pub admin: Pubkey,
    pub operator: Pubkey,
}

#[event]
pub struct PauseChanged {
    pub market: Pubkey,
    pub epoch: u64,
    pub paused: bool,
}

#[event]
pub struct ConfigUpdated {
    pub market: Pubkey,
    pub interval_seconds: i64,
    pub buffer_seconds: i64,
    pub min_bet_amount: u64,
    pub oracle_feed: Pubkey,
    pub oracle_update_allowance: i64,
    pub treasury_rate: u8,
    pub referrer_rate: u8,
    pub referee_rate: u8,
    pub staking_tier_bonus: Vec<u8>,
}

#[event]
pub struct TreasuryClaimed {
    pub market: Pubkey,
    pub amount: u64,
}

// --- LIFECYCLE ---
#[event]
pub struct RoundStarted {
    pub market: Pubkey,
    pub epoch: u64,
    pub start_time: i64,
    pub lock_time: i64,
    pub close_time: i64,
}

#[event]
pub struct RoundLocked {
    pub market: Pubkey,
    pub epoch: u64,
    pub oracle_round_id: u64,
    pub price: i64,
}

#[event]
pub struct RoundClosed {
    pub market: Pubkey,
    pub epoch: u64,
    pub oracle_round_id: u64,
    pub price: i64,
}

#[event]
pub struct RewardsCalculated {
    pub market: Pubkey,
    pub epoch: u64,
    pub reward_base_amount: u64,
    pub reward_amount: u64,
    pub treasury_amount: u64,
}

// --- BETTING ---
#[event]
pub struct BetPlaced {
    pub market: Pubkey,
    pub epoch: u64,
    pub participant: Pubkey,
    pub position: Position,
    pub amount: u64,
    pub treasury_carve: u64,
    pub bonus_reserved: u64,
}

// --- CLAIMS ---
#[event]
pub struct Claimed {
    pub market: Pubkey,
    pub epoch: u64,
    pub participant: Pubkey,
    pub amount: u64,
    pub refund: bool,
}

#[event]
pub struct ReferrerCredited {
    pub market: Pubkey,
    pub epoch: u64,
    pub referrer: Pubkey,
    pub referee: Pubkey,
    pub amount: u64,
}

#[event]
pub struct ReferralBonusClaimed {
    pub market: Pubkey,
    pub referrer: Pubkey,
    pub amount: u64,
}
