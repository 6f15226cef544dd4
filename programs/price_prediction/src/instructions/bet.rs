use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::events::BetPlaced;
use crate::interfaces::{ReferralLookup, ReferralRegistry, StakingRegistry, StakingTierLookup};
use crate::state::Position;
use crate::utils::{record_bet, reserve_bonuses, MARKET_SEED};
use crate::PlaceBet;

pub fn place_bet(ctx: Context<PlaceBet>, epoch: u64, position: Position, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let participant = ctx.accounts.participant.key();
    let market_key = ctx.accounts.market.key();
    let market = &ctx.accounts.market;

    // --- collaborator lookups ---
    let staking = StakingRegistry {
        registry: market.staking_registry,
        record: ctx.accounts.staking_record.as_deref(),
    };
    let referral = ReferralRegistry {
        registry: market.referral_registry,
        record: ctx.accounts.referral_record.as_deref(),
        program: ctx.accounts.referral_program.as_deref(),
        authority: market.to_account_info(),
    };

    let tier = staking.tier(&participant)?;
    let referrer = referral.referrer(&participant)?;
    let reservation = reserve_bonuses(market, amount, referrer, tier)?;

    // --- ledger ---
    let bet = &mut ctx.accounts.bet;
    bet.bump = ctx.bumps.bet;
    record_bet(
        market,
        &mut ctx.accounts.round,
        bet,
        participant,
        position,
        amount,
        &reservation,
        now,
    )?;

    // --- stake into vault ---
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.participant_token_account.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.participant.to_account_info(),
            },
        ),
        amount,
    )?;

    // first bet freezes the referral binding
    if !referral.is_locked(&participant)? {
        let id_le = market.market_id.to_le_bytes();
        let signer_seeds: &[&[&[u8]]] = &[&[MARKET_SEED, &id_le, &[market.bump]]];
        referral.lock_address(&participant, signer_seeds)?;
    }

    emit!(BetPlaced {
        market: market_key,
        epoch,
        participant,
        position,
        amount,
        treasury_carve: reservation.treasury_carve,
        bonus_reserved: reservation.total()?,
    });
    Ok(())
}
