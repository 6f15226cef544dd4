use anchor_lang::prelude::*;

use crate::constants::MAX_STAKING_TIERS;

/// Role registry consulted by every privileged instruction.
#[account]
#[derive(InitSpace, Default)]
pub struct AccessControl {
    pub owner: Pubkey,
    pub admin: Pubkey,
    pub operator: Pubkey,
    pub bump: u8,
    pub version: u16,
}

impl AccessControl {
    pub fn is_admin(&self, key: &Pubkey) -> bool {
        self.admin == *key
    }

    pub fn is_operator(&self, key: &Pubkey) -> bool {
        self.operator == *key
    }
}

#[account]
#[derive(InitSpace, Default)]
pub struct Market {
    pub market_id: u64,
    pub bump: u8,

    // SPL plumbing: stakes of every round sit in one vault owned by this PDA
    pub token_mint: Pubkey,
    pub vault: Pubkey,
    pub vault_bump: u8,

    // Oracle feed account and the last feed round consumed by a tick
    pub oracle_feed: Pubkey,
    pub oracle_update_allowance: i64,
    pub oracle_latest_round_id: u64,

    // Collaborator registries (Pubkey::default() = not configured)
    pub staking_registry: Pubkey,
    pub referral_registry: Pubkey,

    pub interval_seconds: i64,
    pub buffer_seconds: i64,
    pub min_bet_amount: u64,

    /// Percent of every stake carved for treasury and bonuses.
    pub treasury_rate: u8,
    /// Percent of the carve reserved for the referrer.
    pub referrer_rate: u8,
    /// Percent of the carve reserved for the referred bettor.
    pub referee_rate: u8,
    /// Percent of the carve reserved per staking tier. Index 0 is always 0.
    #[max_len(MAX_STAKING_TIERS)]
    pub staking_tier_bonus: Vec<u8>,

    /// Settled protocol fees not yet withdrawn.
    pub treasury_amount: u64,
    pub current_epoch: u64,

    pub genesis_open_done: bool,
    pub genesis_lock_done: bool,
    pub paused: bool,

    pub version: u16,
}

impl Market {
    pub fn next_epoch(&self) -> u64 {
        self.current_epoch.saturating_add(1)
    }

    pub fn previous_epoch(&self) -> u64 {
        self.current_epoch.saturating_sub(1)
    }

    /// Highest configured staking tier bonus (0 when the table is empty).
    pub fn max_tier_bonus(&self) -> u8 {
        self.staking_tier_bonus.last().copied().unwrap_or(0)
    }

    pub fn tier_bonus(&self, tier: u8) -> u8 {
        self.staking_tier_bonus
            .get(tier as usize)
            .copied()
            .unwrap_or(0)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    #[default]
    Bull,
    Bear,
}

/// Phase of a round, derived from time and the resolved flag only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    Scheduled,
    Open,
    Locked,
    Resolved,
    /// Never closed and past close + buffer: every stake is refundable.
    Expired,
}

#[account]
#[derive(InitSpace, Default)]
pub struct Round {
    pub market: Pubkey,
    pub epoch: u64,
    pub bump: u8,

    pub start_time: i64,
    pub lock_time: i64,
    pub close_time: i64,

    pub lock_price: i64,
    pub close_price: i64,
    pub lock_oracle_id: u64,
    pub close_oracle_id: u64,
    pub resolved: bool,

    pub bull_amount: u64,
    pub bear_amount: u64,
    pub bull_bonus_amount: u64,
    pub bear_bonus_amount: u64,

    /// Gross carve until settlement, final protocol take afterwards.
    pub treasury_amount: u64,
    pub reward_base_amount: u64,
    pub reward_amount: u64,
    pub settled: bool,
}

impl Round {
    /// Close time is strictly positive once opened, even for a round opened at t=0.
    pub fn started(&self) -> bool {
        self.close_time != 0
    }

    /// Accepted feed ids are strictly above the initial high-water mark of 0.
    pub fn locked(&self) -> bool {
        self.lock_oracle_id != 0
    }

    pub fn phase(&self, now: i64, buffer_seconds: i64) -> RoundPhase {
        if self.resolved {
            return RoundPhase::Resolved;
        }
        if !self.started() || now < self.start_time {
            return RoundPhase::Scheduled;
        }
        if now < self.lock_time {
            return RoundPhase::Open;
        }
        if now > self.close_time.saturating_add(buffer_seconds) {
            return RoundPhase::Expired;
        }
        RoundPhase::Locked
    }

    pub fn total_amount(&self) -> Option<u64> {
        self.bull_amount.checked_add(self.bear_amount)
    }

    /// Winning side, `None` on a tie or before resolution.
    pub fn winner(&self) -> Option<Position> {
        if !self.resolved {
            return None;
        }
        match self.close_price.cmp(&self.lock_price) {
            std::cmp::Ordering::Greater => Some(Position::Bull),
            std::cmp::Ordering::Less => Some(Position::Bear),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[account]
#[derive(InitSpace, Default)]
pub struct BetEntry {
    pub market: Pubkey,
    pub epoch: u64,
    pub participant: Pubkey,
    pub bump: u8,

    pub position: Position,
    pub amount: u64,

    // bonus reservations taken out of the treasury carve at bet time
    pub referee_amount: u64,
    pub referrer_amount: u64,
    pub staking_amount: u64,
    pub referrer: Pubkey,

    pub claimed: bool,
    pub placed_at: i64,
}

impl BetEntry {
    pub fn exists(&self) -> bool {
        self.amount != 0
    }
}

#[account]
#[derive(InitSpace, Default)]
pub struct ReferralAccrual {
    pub market: Pubkey,
    pub referrer: Pubkey,
    pub bump: u8,

    pub pending: u64,
    pub total: u64,
}
