use anchor_lang::prelude::*;

use crate::errors::PredictionError;
use crate::events::{RewardsCalculated, RoundClosed, RoundLocked, RoundStarted};
use crate::interfaces::{FeedAccount, PriceOracle};
use crate::state::{AccessControl, Market, Round};
use crate::utils::{self, OracleReading};
use crate::{Advance, GenesisLock, GenesisOpen};

fn require_operator(ac: &AccessControl, signer: &Pubkey) -> Result<()> {
    require!(ac.is_operator(signer), PredictionError::Unauthorized);
    Ok(())
}

fn read_feed(market: &Market, feed: &AccountInfo) -> Result<OracleReading> {
    require!(market.oracle_feed != Pubkey::default(), PredictionError::OracleNotSet);
    FeedAccount { info: feed }.latest()
}

fn emit_started(market: Pubkey, round: &Round) {
    emit!(RoundStarted {
        market,
        epoch: round.epoch,
        start_time: round.start_time,
        lock_time: round.lock_time,
        close_time: round.close_time,
    });
}

pub fn genesis_open(ctx: Context<GenesisOpen>) -> Result<()> {
    require_operator(&ctx.accounts.access_control, &ctx.accounts.operator.key())?;

    let now = Clock::get()?.unix_timestamp;
    let market_key = ctx.accounts.market.key();

    let round = &mut ctx.accounts.round;
    round.bump = ctx.bumps.round;
    utils::open_genesis_round(&mut ctx.accounts.market, market_key, round, now)?;

    msg!("genesis open: epoch {}", round.epoch);
    emit_started(market_key, round);
    Ok(())
}

pub fn genesis_lock(ctx: Context<GenesisLock>) -> Result<()> {
    require_operator(&ctx.accounts.access_control, &ctx.accounts.operator.key())?;

    let now = Clock::get()?.unix_timestamp;
    let market_key = ctx.accounts.market.key();
    let feed = ctx.accounts.oracle_feed.to_account_info();
    let reading = read_feed(&ctx.accounts.market, &feed)?;

    let current = &mut ctx.accounts.current_round;
    let next = &mut ctx.accounts.next_round;
    next.bump = ctx.bumps.next_round;

    utils::lock_genesis_round(&mut ctx.accounts.market, market_key, current, next, &reading, now)?;

    msg!("genesis lock: epoch {} at {} (oracle round {})", current.epoch, reading.price, reading.round_id);
    emit!(RoundLocked {
        market: market_key,
        epoch: current.epoch,
        oracle_round_id: reading.round_id,
        price: reading.price,
    });
    emit_started(market_key, next);
    Ok(())
}

pub fn advance(ctx: Context<Advance>) -> Result<()> {
    require_operator(&ctx.accounts.access_control, &ctx.accounts.operator.key())?;

    let now = Clock::get()?.unix_timestamp;
    let market_key = ctx.accounts.market.key();
    let feed = ctx.accounts.oracle_feed.to_account_info();
    let reading = read_feed(&ctx.accounts.market, &feed)?;

    let locking = &mut ctx.accounts.locking_round;
    let closing = &mut ctx.accounts.closing_round;
    let next = &mut ctx.accounts.next_round;
    next.bump = ctx.bumps.next_round;

    let tick = utils::advance_market(
        &mut ctx.accounts.market,
        market_key,
        locking,
        closing,
        next,
        &reading,
        now,
    )?;

    msg!(
        "advance: locked {} closed {} opened {} at {} (oracle round {})",
        tick.locked_epoch,
        tick.closed_epoch,
        tick.opened_epoch,
        reading.price,
        reading.round_id
    );

    emit!(RoundLocked {
        market: market_key,
        epoch: tick.locked_epoch,
        oracle_round_id: reading.round_id,
        price: reading.price,
    });
    emit!(RoundClosed {
        market: market_key,
        epoch: tick.closed_epoch,
        oracle_round_id: reading.round_id,
        price: reading.price,
    });
    emit!(RewardsCalculated {
        market: market_key,
        epoch: tick.closed_epoch,
        reward_base_amount: closing.reward_base_amount,
        reward_amount: closing.reward_amount,
        treasury_amount: tick.treasury,
    });
    emit_started(market_key, next);
    Ok(())
}
