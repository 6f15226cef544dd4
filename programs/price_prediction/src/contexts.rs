// programs/price_prediction/src/contexts.rs

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::state::{AccessControl, BetEntry, Market, ReferralAccrual, Round};
use crate::utils::{
    ACCESS_CONTROL_SEED, BET_SEED, MARKET_SEED, REFERRAL_ACCRUAL_SEED, ROUND_SEED, VAULT_SEED,
};

// ----------------------------
// Roles
// ----------------------------

#[derive(Accounts)]
pub struct InitializeAccessControl<'info> {
    #[account(
        init,
        payer = owner,
        space = 8 + AccessControl::INIT_SPACE,
        seeds = [ACCESS_CONTROL_SEED],
        bump
    )]
    pub access_control: Account<'info, AccessControl>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct SetRoles<'info> {
    #[account(
        mut,
        seeds = [ACCESS_CONTROL_SEED],
        bump = access_control.bump
    )]
    pub access_control: Account<'info, AccessControl>,

    pub owner: Signer<'info>,
}

// ----------------------------
// Market administration
// ----------------------------

#[derive(Accounts)]
#[instruction(market_id: u64)]
pub struct CreateMarket<'info> {
    #[account(
        seeds = [ACCESS_CONTROL_SEED],
        bump = access_control.bump
    )]
    pub access_control: Account<'info, AccessControl>,

    #[account(
        init,
        payer = admin,
        space = 8 + Market::INIT_SPACE,
        seeds = [MARKET_SEED, market_id.to_le_bytes().as_ref()],
        bump
    )]
    pub market: Account<'info, Market>,

    pub token_mint: Account<'info, Mint>,

    /// Holds every stake of the market; the market PDA is its authority.
    #[account(
        init,
        payer = admin,
        token::mint = token_mint,
        token::authority = market,
        seeds = [VAULT_SEED, market.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    /// CHECK: price feed, only read when a round locks or closes. Layout checked on read.
    pub oracle_feed: UncheckedAccount<'info>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

/// Shared by every admin setter and `unpause`.
#[derive(Accounts)]
pub struct UpdateMarket<'info> {
    #[account(
        seeds = [ACCESS_CONTROL_SEED],
        bump = access_control.bump
    )]
    pub access_control: Account<'info, AccessControl>,

    #[account(
        mut,
        seeds = [MARKET_SEED, market.market_id.to_le_bytes().as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct SetOracle<'info> {
    #[account(
        seeds = [ACCESS_CONTROL_SEED],
        bump = access_control.bump
    )]
    pub access_control: Account<'info, AccessControl>,

    #[account(
        mut,
        seeds = [MARKET_SEED, market.market_id.to_le_bytes().as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    /// CHECK: new price feed, layout checked on read.
    pub oracle_feed: UncheckedAccount<'info>,

    pub admin: Signer<'info>,
}

/// Admin or operator.
#[derive(Accounts)]
pub struct Pause<'info> {
    #[account(
        seeds = [ACCESS_CONTROL_SEED],
        bump = access_control.bump
    )]
    pub access_control: Account<'info, AccessControl>,

    #[account(
        mut,
        seeds = [MARKET_SEED, market.market_id.to_le_bytes().as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct ClaimTreasury<'info> {
    #[account(
        seeds = [ACCESS_CONTROL_SEED],
        bump = access_control.bump
    )]
    pub access_control: Account<'info, AccessControl>,

    #[account(
        mut,
        seeds = [MARKET_SEED, market.market_id.to_le_bytes().as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        mut,
        seeds = [VAULT_SEED, market.key().as_ref()],
        bump = market.vault_bump,
        address = market.vault
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = market.token_mint
    )]
    pub treasury_token_account: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

// ----------------------------
// Operator lifecycle
// ----------------------------

#[derive(Accounts)]
pub struct GenesisOpen<'info> {
    #[account(
        seeds = [ACCESS_CONTROL_SEED],
        bump = access_control.bump
    )]
    pub access_control: Account<'info, AccessControl>,

    #[account(
        mut,
        seeds = [MARKET_SEED, market.market_id.to_le_bytes().as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        init,
        payer = operator,
        space = 8 + Round::INIT_SPACE,
        seeds = [ROUND_SEED, market.key().as_ref(), market.next_epoch().to_le_bytes().as_ref()],
        bump
    )]
    pub round: Account<'info, Round>,

    #[account(mut)]
    pub operator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct GenesisLock<'info> {
    #[account(
        seeds = [ACCESS_CONTROL_SEED],
        bump = access_control.bump
    )]
    pub access_control: Account<'info, AccessControl>,

    #[account(
        mut,
        seeds = [MARKET_SEED, market.market_id.to_le_bytes().as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        mut,
        seeds = [ROUND_SEED, market.key().as_ref(), market.current_epoch.to_le_bytes().as_ref()],
        bump = current_round.bump
    )]
    pub current_round: Account<'info, Round>,

    #[account(
        init,
        payer = operator,
        space = 8 + Round::INIT_SPACE,
        seeds = [ROUND_SEED, market.key().as_ref(), market.next_epoch().to_le_bytes().as_ref()],
        bump
    )]
    pub next_round: Account<'info, Round>,

    /// CHECK: must be the configured feed; layout checked on read.
    #[account(address = market.oracle_feed)]
    pub oracle_feed: UncheckedAccount<'info>,

    #[account(mut)]
    pub operator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Advance<'info> {
    #[account(
        seeds = [ACCESS_CONTROL_SEED],
        bump = access_control.bump
    )]
    pub access_control: Account<'info, AccessControl>,

    #[account(
        mut,
        seeds = [MARKET_SEED, market.market_id.to_le_bytes().as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    /// Current epoch, locked by this tick.
    #[account(
        mut,
        seeds = [ROUND_SEED, market.key().as_ref(), market.current_epoch.to_le_bytes().as_ref()],
        bump = locking_round.bump
    )]
    pub locking_round: Account<'info, Round>,

    /// Previous epoch, closed and settled by this tick.
    #[account(
        mut,
        seeds = [ROUND_SEED, market.key().as_ref(), market.previous_epoch().to_le_bytes().as_ref()],
        bump = closing_round.bump
    )]
    pub closing_round: Account<'info, Round>,

    #[account(
        init,
        payer = operator,
        space = 8 + Round::INIT_SPACE,
        seeds = [ROUND_SEED, market.key().as_ref(), market.next_epoch().to_le_bytes().as_ref()],
        bump
    )]
    pub next_round: Account<'info, Round>,

    /// CHECK: must be the configured feed; layout checked on read.
    #[account(address = market.oracle_feed)]
    pub oracle_feed: UncheckedAccount<'info>,

    #[account(mut)]
    pub operator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

// ----------------------------
// Participants
// ----------------------------

#[derive(Accounts)]
#[instruction(epoch: u64)]
pub struct PlaceBet<'info> {
    #[account(
        seeds = [MARKET_SEED, market.market_id.to_le_bytes().as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        mut,
        seeds = [ROUND_SEED, market.key().as_ref(), epoch.to_le_bytes().as_ref()],
        bump = round.bump
    )]
    pub round: Account<'info, Round>,

    // init_if_needed so a repeat bet fails with AlreadyBet rather than an allocation error
    #[account(
        init_if_needed,
        payer = participant,
        space = 8 + BetEntry::INIT_SPACE,
        seeds = [
            BET_SEED,
            market.key().as_ref(),
            epoch.to_le_bytes().as_ref(),
            participant.key().as_ref()
        ],
        bump
    )]
    pub bet: Account<'info, BetEntry>,

    #[account(
        mut,
        seeds = [VAULT_SEED, market.key().as_ref()],
        bump = market.vault_bump,
        address = market.vault
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = market.token_mint,
        token::authority = participant
    )]
    pub participant_token_account: Account<'info, TokenAccount>,

    /// CHECK: staking tier record, verified against the configured registry.
    pub staking_record: Option<UncheckedAccount<'info>>,

    /// CHECK: referral record, verified against the configured registry.
    #[account(mut)]
    pub referral_record: Option<UncheckedAccount<'info>>,

    /// CHECK: referral registry program, key checked before the lock CPI.
    pub referral_program: Option<UncheckedAccount<'info>>,

    #[account(mut)]
    pub participant: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Remaining accounts per epoch: `[round, bet]`, then the referrer's accrual PDA
/// when the bet carries a referrer reservation.
#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(
        seeds = [MARKET_SEED, market.market_id.to_le_bytes().as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        mut,
        seeds = [VAULT_SEED, market.key().as_ref()],
        bump = market.vault_bump,
        address = market.vault
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = market.token_mint,
        token::authority = participant
    )]
    pub participant_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub participant: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ClaimReferralBonus<'info> {
    #[account(
        seeds = [MARKET_SEED, market.market_id.to_le_bytes().as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        mut,
        seeds = [REFERRAL_ACCRUAL_SEED, market.key().as_ref(), referrer.key().as_ref()],
        bump = accrual.bump
    )]
    pub accrual: Account<'info, ReferralAccrual>,

    #[account(
        mut,
        seeds = [VAULT_SEED, market.key().as_ref()],
        bump = market.vault_bump,
        address = market.vault
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = market.token_mint,
        token::authority = referrer
    )]
    pub referrer_token_account: Account<'info, TokenAccount>,

    pub referrer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}
