use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::constants::INITIAL_VERSION;
use crate::errors::PredictionError;
use crate::events::{ConfigUpdated, MarketCreated, PauseChanged, RolesUpdated, TreasuryClaimed};
use crate::state::{AccessControl, Market};
use crate::utils::{
    pause_market, unpause_market, validate_allowance, validate_bonus_rates, validate_min_bet,
    validate_timing, validate_treasury_rate, MarketParams, MARKET_SEED,
};
use crate::{
    ClaimTreasury, CreateMarket, InitializeAccessControl, Pause, SetOracle, SetRoles, UpdateMarket,
};

// ----------------------------
// Roles
// ----------------------------

pub fn initialize_access_control(
    ctx: Context<InitializeAccessControl>,
    admin: Pubkey,
    operator: Pubkey,
) -> Result<()> {
    let ac = &mut ctx.accounts.access_control;
    ac.owner = ctx.accounts.owner.key();
    ac.admin = admin;
    ac.operator = operator;
    ac.bump = ctx.bumps.access_control;
    ac.version = INITIAL_VERSION;

    emit!(RolesUpdated { admin, operator });
    Ok(())
}

pub fn set_roles(ctx: Context<SetRoles>, admin: Option<Pubkey>, operator: Option<Pubkey>) -> Result<()> {
    let ac = &mut ctx.accounts.access_control;
    require_keys_eq!(ac.owner, ctx.accounts.owner.key(), PredictionError::Unauthorized);

    if let Some(admin) = admin {
        ac.admin = admin;
    }
    if let Some(operator) = operator {
        ac.operator = operator;
    }

    emit!(RolesUpdated { admin: ac.admin, operator: ac.operator });
    Ok(())
}

fn require_admin(ac: &AccessControl, signer: &Pubkey) -> Result<()> {
    require!(ac.is_admin(signer), PredictionError::Unauthorized);
    Ok(())
}

/// Configuration only changes while ticks and bets are halted.
fn require_admin_paused(ac: &AccessControl, signer: &Pubkey, market: &Market) -> Result<()> {
    require_admin(ac, signer)?;
    require!(market.paused, PredictionError::NotPaused);
    Ok(())
}

fn emit_config(market_key: Pubkey, m: &Market) {
    emit!(ConfigUpdated {
        market: market_key,
        interval_seconds: m.interval_seconds,
        buffer_seconds: m.buffer_seconds,
        min_bet_amount: m.min_bet_amount,
        oracle_feed: m.oracle_feed,
        oracle_update_allowance: m.oracle_update_allowance,
        treasury_rate: m.treasury_rate,
        referrer_rate: m.referrer_rate,
        referee_rate: m.referee_rate,
        staking_tier_bonus: m.staking_tier_bonus.clone(),
    });
}

// ----------------------------
// Market
// ----------------------------

pub fn create_market(ctx: Context<CreateMarket>, market_id: u64, params: MarketParams) -> Result<()> {
    require_admin(&ctx.accounts.access_control, &ctx.accounts.admin.key())?;
    params.validate()?;

    let market_key = ctx.accounts.market.key();
    let m = &mut ctx.accounts.market;

    m.market_id = market_id;
    m.bump = ctx.bumps.market;

    m.token_mint = ctx.accounts.token_mint.key();
    m.vault = ctx.accounts.vault.key();
    m.vault_bump = ctx.bumps.vault;

    m.oracle_feed = ctx.accounts.oracle_feed.key();
    m.oracle_latest_round_id = 0;
    params.apply(m);

    m.treasury_amount = 0;
    m.current_epoch = 0;
    m.genesis_open_done = false;
    m.genesis_lock_done = false;
    m.paused = false;
    m.version = INITIAL_VERSION;

    emit!(MarketCreated {
        market: market_key,
        market_id,
        token_mint: m.token_mint,
        oracle_feed: m.oracle_feed,
    });
    emit_config(market_key, m);
    Ok(())
}

pub fn set_buffer_and_interval(
    ctx: Context<UpdateMarket>,
    buffer_seconds: i64,
    interval_seconds: i64,
) -> Result<()> {
    require_admin_paused(&ctx.accounts.access_control, &ctx.accounts.admin.key(), &ctx.accounts.market)?;
    validate_timing(buffer_seconds, interval_seconds)?;

    let market_key = ctx.accounts.market.key();
    let m = &mut ctx.accounts.market;
    m.buffer_seconds = buffer_seconds;
    m.interval_seconds = interval_seconds;

    emit_config(market_key, m);
    Ok(())
}

pub fn set_min_bet_amount(ctx: Context<UpdateMarket>, min_bet_amount: u64) -> Result<()> {
    require_admin_paused(&ctx.accounts.access_control, &ctx.accounts.admin.key(), &ctx.accounts.market)?;
    validate_min_bet(min_bet_amount)?;

    let market_key = ctx.accounts.market.key();
    let m = &mut ctx.accounts.market;
    m.min_bet_amount = min_bet_amount;

    emit_config(market_key, m);
    Ok(())
}

/// A new feed has its own round-id space, so the high-water mark starts over.
pub fn set_oracle(ctx: Context<SetOracle>, oracle_update_allowance: i64) -> Result<()> {
    require_admin_paused(&ctx.accounts.access_control, &ctx.accounts.admin.key(), &ctx.accounts.market)?;
    validate_allowance(oracle_update_allowance)?;

    let feed = ctx.accounts.oracle_feed.key();
    require!(feed != Pubkey::default(), PredictionError::OracleNotSet);

    let market_key = ctx.accounts.market.key();
    let m = &mut ctx.accounts.market;
    m.oracle_feed = feed;
    m.oracle_update_allowance = oracle_update_allowance;
    m.oracle_latest_round_id = 0;

    msg!("oracle feed set to {} (allowance {}s)", feed, oracle_update_allowance);
    emit_config(market_key, m);
    Ok(())
}

pub fn set_treasury_rate(ctx: Context<UpdateMarket>, treasury_rate: u8) -> Result<()> {
    require_admin_paused(&ctx.accounts.access_control, &ctx.accounts.admin.key(), &ctx.accounts.market)?;
    validate_treasury_rate(treasury_rate)?;

    let market_key = ctx.accounts.market.key();
    let m = &mut ctx.accounts.market;
    m.treasury_rate = treasury_rate;

    emit_config(market_key, m);
    Ok(())
}

pub fn set_referral_rates(ctx: Context<UpdateMarket>, referrer_rate: u8, referee_rate: u8) -> Result<()> {
    require_admin_paused(&ctx.accounts.access_control, &ctx.accounts.admin.key(), &ctx.accounts.market)?;
    validate_bonus_rates(referrer_rate, referee_rate, &ctx.accounts.market.staking_tier_bonus)?;

    let market_key = ctx.accounts.market.key();
    let m = &mut ctx.accounts.market;
    m.referrer_rate = referrer_rate;
    m.referee_rate = referee_rate;

    emit_config(market_key, m);
    Ok(())
}

pub fn set_staking_tier_bonuses(ctx: Context<UpdateMarket>, staking_tier_bonus: Vec<u8>) -> Result<()> {
    require_admin_paused(&ctx.accounts.access_control, &ctx.accounts.admin.key(), &ctx.accounts.market)?;
    let m = &ctx.accounts.market;
    validate_bonus_rates(m.referrer_rate, m.referee_rate, &staking_tier_bonus)?;

    let market_key = ctx.accounts.market.key();
    let m = &mut ctx.accounts.market;
    m.staking_tier_bonus = staking_tier_bonus;

    emit_config(market_key, m);
    Ok(())
}

pub fn set_registries(
    ctx: Context<UpdateMarket>,
    staking_registry: Pubkey,
    referral_registry: Pubkey,
) -> Result<()> {
    require_admin_paused(&ctx.accounts.access_control, &ctx.accounts.admin.key(), &ctx.accounts.market)?;

    let m = &mut ctx.accounts.market;
    m.staking_registry = staking_registry;
    m.referral_registry = referral_registry;

    msg!("registries: staking={} referral={}", staking_registry, referral_registry);
    Ok(())
}

// ----------------------------
// Pause
// ----------------------------

pub fn pause(ctx: Context<Pause>) -> Result<()> {
    let ac = &ctx.accounts.access_control;
    let who = ctx.accounts.authority.key();
    require!(ac.is_admin(&who) || ac.is_operator(&who), PredictionError::Unauthorized);

    let market_key = ctx.accounts.market.key();
    let m = &mut ctx.accounts.market;
    pause_market(m)?;

    msg!("market {} paused at epoch {}", m.market_id, m.current_epoch);
    emit!(PauseChanged { market: market_key, epoch: m.current_epoch, paused: true });
    Ok(())
}

pub fn unpause(ctx: Context<UpdateMarket>) -> Result<()> {
    require_admin(&ctx.accounts.access_control, &ctx.accounts.admin.key())?;

    let market_key = ctx.accounts.market.key();
    let m = &mut ctx.accounts.market;
    unpause_market(m)?;

    emit!(PauseChanged { market: market_key, epoch: m.current_epoch, paused: false });
    Ok(())
}

// ----------------------------
// Treasury
// ----------------------------

pub fn claim_treasury(ctx: Context<ClaimTreasury>) -> Result<()> {
    require_admin(&ctx.accounts.access_control, &ctx.accounts.admin.key())?;

    let amount = ctx.accounts.market.treasury_amount;
    require!(amount > 0, PredictionError::NothingToClaim);

    // zero before the transfer
    ctx.accounts.market.treasury_amount = 0;

    let m = &ctx.accounts.market;
    let id_le = m.market_id.to_le_bytes();
    let signer_seeds: &[&[&[u8]]] = &[&[MARKET_SEED, &id_le, &[m.bump]]];

    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault.to_account_info(),
                to: ctx.accounts.treasury_token_account.to_account_info(),
                authority: ctx.accounts.market.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    emit!(TreasuryClaimed { market: ctx.accounts.market.key(), amount });
    Ok(())
}
