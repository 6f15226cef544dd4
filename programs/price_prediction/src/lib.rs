use anchor_lang::prelude::*;

pub mod constants;
pub mod contexts;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod interfaces;
pub mod state;
pub mod utils;

pub use constants::*;
pub use contexts::*;
pub use errors::*;
pub use instructions::*;
pub use state::*;
pub use utils::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    // Required fields
    name: "Price Prediction",
    project_url: "https://github.com/price-prediction/price-prediction",
    contacts: "link:https://github.com/price-prediction/price-prediction/security/advisories/new",
    policy: "https://github.com/price-prediction/price-prediction/blob/main/SECURITY.md",

    // Optional fields
    preferred_languages: "en",
    source_code: "https://github.com/price-prediction/price-prediction"
}

declare_id!("JBaWDDfNBQGLJYmKYx51XsFpBUM2nKREfTrForje6dRd");

#[program]
pub mod price_prediction {
    use super::*;
    use crate::instructions::{admin, bet, claim, lifecycle};

    // ----------------------------
    // Roles
    // ----------------------------
    pub fn initialize_access_control(
        ctx: Context<InitializeAccessControl>,
        admin: Pubkey,
        operator: Pubkey,
    ) -> Result<()> {
        admin::initialize_access_control(ctx, admin, operator)
    }

    pub fn set_roles(ctx: Context<SetRoles>, admin: Option<Pubkey>, operator: Option<Pubkey>) -> Result<()> {
        admin::set_roles(ctx, admin, operator)
    }

    // ----------------------------
    // Market admin
    // ----------------------------
    pub fn create_market(ctx: Context<CreateMarket>, market_id: u64, params: MarketParams) -> Result<()> {
        admin::create_market(ctx, market_id, params)
    }

    pub fn set_buffer_and_interval(
        ctx: Context<UpdateMarket>,
        buffer_seconds: i64,
        interval_seconds: i64,
    ) -> Result<()> {
        admin::set_buffer_and_interval(ctx, buffer_seconds, interval_seconds)
    }

    pub fn set_min_bet_amount(ctx: Context<UpdateMarket>, min_bet_amount: u64) -> Result<()> {
        admin::set_min_bet_amount(ctx, min_bet_amount)
    }

    pub fn set_oracle(ctx: Context<SetOracle>, oracle_update_allowance: i64) -> Result<()> {
        admin::set_oracle(ctx, oracle_update_allowance)
    }

    pub fn set_treasury_rate(ctx: Context<UpdateMarket>, treasury_rate: u8) -> Result<()> {
        admin::set_treasury_rate(ctx, treasury_rate)
    }

    pub fn set_referral_rates(ctx: Context<UpdateMarket>, referrer_rate: u8, referee_rate: u8) -> Result<()> {
        admin::set_referral_rates(ctx, referrer_rate, referee_rate)
    }

    pub fn set_staking_tier_bonuses(ctx: Context<UpdateMarket>, staking_tier_bonus: Vec<u8>) -> Result<()> {
        admin::set_staking_tier_bonuses(ctx, staking_tier_bonus)
    }

    pub fn set_registries(
        ctx: Context<UpdateMarket>,
        staking_registry: Pubkey,
        referral_registry: Pubkey,
    ) -> Result<()> {
        admin::set_registries(ctx, staking_registry, referral_registry)
    }

    pub fn pause(ctx: Context<Pause>) -> Result<()> {
        admin::pause(ctx)
    }

    pub fn unpause(ctx: Context<UpdateMarket>) -> Result<()> {
        admin::unpause(ctx)
    }

    pub fn claim_treasury(ctx: Context<ClaimTreasury>) -> Result<()> {
        admin::claim_treasury(ctx)
    }

    // ----------------------------
    // Operator
    // ----------------------------
    pub fn genesis_open(ctx: Context<GenesisOpen>) -> Result<()> {
        lifecycle::genesis_open(ctx)
    }

    pub fn genesis_lock(ctx: Context<GenesisLock>) -> Result<()> {
        lifecycle::genesis_lock(ctx)
    }

    pub fn advance(ctx: Context<Advance>) -> Result<()> {
        lifecycle::advance(ctx)
    }

    // ----------------------------
    // Participants
    // ----------------------------
    pub fn place_bet(ctx: Context<PlaceBet>, epoch: u64, position: Position, amount: u64) -> Result<()> {
        bet::place_bet(ctx, epoch, position, amount)
    }

    pub fn claim<'info>(
        ctx: Context<'_, '_, 'info, 'info, Claim<'info>>,
        epochs: Vec<u64>,
    ) -> Result<()> {
        claim::claim(ctx, epochs)
    }

    pub fn claim_referral_bonus(ctx: Context<ClaimReferralBonus>) -> Result<()> {
        claim::claim_referral_bonus(ctx)
    }
}
