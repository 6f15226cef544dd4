use anchor_lang::prelude::*;

use crate::{
    constants::{
        DEFAULT_BUFFER_SECONDS, DEFAULT_INTERVAL_SECONDS, DEFAULT_MIN_BET_AMOUNT,
        DEFAULT_ORACLE_UPDATE_ALLOWANCE_SECONDS, DEFAULT_TREASURY_RATE, MAX_STAKING_TIERS,
        MAX_TREASURY_RATE, PERCENT_BASE,
    },
    errors::PredictionError,
    state::Market,
};

/// Initial configuration of a market.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MarketParams {
    pub interval_seconds: i64,
    pub buffer_seconds: i64,
    pub min_bet_amount: u64,
    pub oracle_update_allowance: i64,
    pub treasury_rate: u8,
    pub referrer_rate: u8,
    pub referee_rate: u8,
    pub staking_tier_bonus: Vec<u8>,
    pub staking_registry: Pubkey,
    pub referral_registry: Pubkey,
}

/// Five-minute rounds, no referral or staking bonuses, no registries.
impl Default for MarketParams {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            buffer_seconds: DEFAULT_BUFFER_SECONDS,
            min_bet_amount: DEFAULT_MIN_BET_AMOUNT,
            oracle_update_allowance: DEFAULT_ORACLE_UPDATE_ALLOWANCE_SECONDS,
            treasury_rate: DEFAULT_TREASURY_RATE,
            referrer_rate: 0,
            referee_rate: 0,
            staking_tier_bonus: vec![0],
            staking_registry: Pubkey::default(),
            referral_registry: Pubkey::default(),
        }
    }
}

impl MarketParams {
    pub fn validate(&self) -> Result<()> {
        validate_timing(self.buffer_seconds, self.interval_seconds)?;
        validate_min_bet(self.min_bet_amount)?;
        validate_allowance(self.oracle_update_allowance)?;
        validate_treasury_rate(self.treasury_rate)?;
        validate_bonus_rates(self.referrer_rate, self.referee_rate, &self.staking_tier_bonus)
    }

    pub fn apply(self, market: &mut Market) {
        market.interval_seconds = self.interval_seconds;
        market.buffer_seconds = self.buffer_seconds;
        market.min_bet_amount = self.min_bet_amount;
        market.oracle_update_allowance = self.oracle_update_allowance;
        market.treasury_rate = self.treasury_rate;
        market.referrer_rate = self.referrer_rate;
        market.referee_rate = self.referee_rate;
        market.staking_tier_bonus = self.staking_tier_bonus;
        market.staking_registry = self.staking_registry;
        market.referral_registry = self.referral_registry;
    }
}

pub fn validate_timing(buffer_seconds: i64, interval_seconds: i64) -> Result<()> {
    require!(
        buffer_seconds > 0 && interval_seconds > 0 && buffer_seconds < interval_seconds,
        PredictionError::InvalidTiming
    );
    Ok(())
}

pub fn validate_min_bet(amount: u64) -> Result<()> {
    require!(amount > 0, PredictionError::InvalidMinBetAmount);
    Ok(())
}

pub fn validate_allowance(allowance: i64) -> Result<()> {
    require!(allowance >= 0, PredictionError::InvalidTiming);
    Ok(())
}

pub fn validate_treasury_rate(rate: u8) -> Result<()> {
    require!(rate <= MAX_TREASURY_RATE, PredictionError::TreasuryRateTooHigh);
    Ok(())
}

/// Tier table: non-empty, at most `MAX_STAKING_TIERS`, tier 0 pays nothing,
/// non-decreasing. Referral rates plus the top tier must fit in the carve.
pub fn validate_bonus_rates(referrer_rate: u8, referee_rate: u8, tiers: &[u8]) -> Result<()> {
    require!(
        !tiers.is_empty() && tiers.len() <= MAX_STAKING_TIERS && tiers[0] == 0,
        PredictionError::InvalidTierTable
    );
    require!(
        tiers.windows(2).all(|w| w[0] <= w[1]),
        PredictionError::InvalidTierTable
    );

    let top = tiers.last().copied().unwrap_or(0);
    let sum = referrer_rate as u64 + referee_rate as u64 + top as u64;
    require!(sum <= PERCENT_BASE, PredictionError::BonusRatesTooHigh);
    Ok(())
}
