use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    program::{invoke, invoke_signed},
    system_instruction,
};
use anchor_spl::token::{self, Transfer};

use crate::constants::MAX_CLAIM_BATCH;
use crate::errors::PredictionError;
use crate::events::{Claimed, ReferralBonusClaimed, ReferrerCredited};
use crate::state::{BetEntry, ReferralAccrual, Round};
use crate::utils::{
    accrual_address, add, bet_address, credit_referrer, resolve_claim, round_address,
    take_referral_bonus, MARKET_SEED, REFERRAL_ACCRUAL_SEED,
};
use crate::{Claim, ClaimReferralBonus};

/// Claims every listed epoch of one market in a single payout. Any failing epoch
/// fails the whole batch.
pub fn claim<'info>(
    ctx: Context<'_, '_, 'info, 'info, Claim<'info>>,
    epochs: Vec<u64>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let market_key = ctx.accounts.market.key();
    let buffer = ctx.accounts.market.buffer_seconds;
    let participant = ctx.accounts.participant.key();

    let payer = ctx.accounts.participant.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();

    let total = process_claims(
        ctx.program_id,
        &market_key,
        &participant,
        &epochs,
        ctx.remaining_accounts,
        now,
        buffer,
        |accrual, referrer, bump| {
            provision_accrual(
                &payer,
                &system_program,
                accrual,
                ctx.program_id,
                &market_key,
                referrer,
                bump,
            )
        },
    )?;

    // every entry is marked claimed before funds leave the vault
    if total > 0 {
        let m = &ctx.accounts.market;
        let id_le = m.market_id.to_le_bytes();
        let signer_seeds: &[&[&[u8]]] = &[&[MARKET_SEED, &id_le, &[m.bump]]];

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.vault.to_account_info(),
                    to: ctx.accounts.participant_token_account.to_account_info(),
                    authority: ctx.accounts.market.to_account_info(),
                },
                signer_seeds,
            ),
            total,
        )?;
    }

    msg!("claim: {} paid {}", participant, total);
    Ok(())
}

/// Walks `[round, bet]` (plus the referrer's accrual when the bet carries a
/// referrer reservation) per epoch, persists every claimed entry and accrual,
/// and returns the total owed to the participant.
///
/// `provision` must leave a system-owned accrual PDA owned by `program_id`
/// with room for a `ReferralAccrual`.
#[allow(clippy::too_many_arguments)]
pub fn process_claims<'info, F>(
    program_id: &Pubkey,
    market_key: &Pubkey,
    participant: &Pubkey,
    epochs: &[u64],
    remaining: &'info [AccountInfo<'info>],
    now: i64,
    buffer_seconds: i64,
    mut provision: F,
) -> Result<u64>
where
    F: FnMut(&'info AccountInfo<'info>, &Pubkey, u8) -> Result<()>,
{
    require!(!epochs.is_empty(), PredictionError::NothingToClaim);
    require!(epochs.len() <= MAX_CLAIM_BATCH, PredictionError::TooManyEpochs);

    let mut accounts = remaining.iter();
    let mut total: u64 = 0;

    for &epoch in epochs {
        let round_ai = accounts.next().ok_or_else(|| error!(PredictionError::MissingClaimAccounts))?;
        let bet_ai = accounts.next().ok_or_else(|| error!(PredictionError::MissingClaimAccounts))?;

        let (expected_round, _) = round_address(program_id, market_key, epoch);
        require_keys_eq!(expected_round, round_ai.key(), PredictionError::RoundPdaMismatch);
        let (expected_bet, _) = bet_address(program_id, market_key, epoch, participant);
        require_keys_eq!(expected_bet, bet_ai.key(), PredictionError::BetPdaMismatch);

        let round = Account::<Round>::try_from(round_ai)?;
        let mut bet = Account::<BetEntry>::try_from(bet_ai)?;

        let outcome = resolve_claim(&round, &mut bet, participant, now, buffer_seconds)?;
        // persisted now so a repeated epoch later in the list sees claimed = true
        bet.exit(program_id)?;

        if let Some((referrer, amount)) = outcome.referrer_credit {
            let accrual_ai = accounts.next().ok_or_else(|| error!(PredictionError::MissingClaimAccounts))?;
            credit_accrual(program_id, accrual_ai, market_key, &referrer, amount, &mut provision)?;

            emit!(ReferrerCredited {
                market: *market_key,
                epoch,
                referrer,
                referee: *participant,
                amount,
            });
        }

        total = add(total, outcome.payout)?;
        emit!(Claimed {
            market: *market_key,
            epoch,
            participant: *participant,
            amount: outcome.payout,
            refund: outcome.refund,
        });
    }

    Ok(total)
}

/// Credits the referrer's accrual PDA, provisioning it on first credit.
fn credit_accrual<'info, F>(
    program_id: &Pubkey,
    accrual_ai: &'info AccountInfo<'info>,
    market_key: &Pubkey,
    referrer: &Pubkey,
    amount: u64,
    provision: &mut F,
) -> Result<()>
where
    F: FnMut(&'info AccountInfo<'info>, &Pubkey, u8) -> Result<()>,
{
    let (expected, bump) = accrual_address(program_id, market_key, referrer);
    require_keys_eq!(expected, accrual_ai.key(), PredictionError::AccrualPdaMismatch);

    // only this program can sign for the PDA, so a foreign owner means never provisioned
    if accrual_ai.owner != program_id {
        provision(accrual_ai, referrer, bump)?;
        require_keys_eq!(*accrual_ai.owner, *program_id, PredictionError::AccrualPdaMismatch);

        let mut accrual = ReferralAccrual {
            market: *market_key,
            referrer: *referrer,
            bump,
            pending: 0,
            total: 0,
        };
        credit_referrer(&mut accrual, amount)?;

        let mut data = accrual_ai
            .try_borrow_mut_data()
            .map_err(|_| error!(PredictionError::AccountBorrowFailed))?;
        let mut w = std::io::Cursor::new(&mut data[..]);
        accrual.try_serialize(&mut w)?;
        return Ok(());
    }

    let mut accrual = Account::<ReferralAccrual>::try_from(accrual_ai)?;
    credit_referrer(&mut accrual, amount)?;
    accrual.exit(program_id)
}

/// How a system-owned accrual PDA gets its rent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccrualFunding {
    /// No lamports yet: a single `create_account`.
    Create { lamports: u64 },
    /// Already holds lamports, so `create_account` would fail. Top up, then
    /// allocate and assign.
    Adopt { top_up: u64 },
}

pub fn plan_accrual_funding(current_lamports: u64, rent_exempt: u64) -> AccrualFunding {
    if current_lamports == 0 {
        AccrualFunding::Create { lamports: rent_exempt }
    } else {
        AccrualFunding::Adopt { top_up: rent_exempt.saturating_sub(current_lamports) }
    }
}

/// Creates the accrual PDA with the claimant as payer. Works whether or not
/// someone already sent lamports to the address.
fn provision_accrual<'info>(
    payer: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    accrual: &AccountInfo<'info>,
    program_id: &Pubkey,
    market_key: &Pubkey,
    referrer: &Pubkey,
    bump: u8,
) -> Result<()> {
    let space = 8 + ReferralAccrual::INIT_SPACE;
    let rent_exempt = Rent::get()?.minimum_balance(space);
    let accrual_signer: &[&[&[u8]]] = &[&[
        REFERRAL_ACCRUAL_SEED,
        market_key.as_ref(),
        referrer.as_ref(),
        &[bump],
    ]];

    match plan_accrual_funding(accrual.lamports(), rent_exempt) {
        AccrualFunding::Create { lamports } => {
            let ix = system_instruction::create_account(
                payer.key,
                accrual.key,
                lamports,
                space as u64,
                program_id,
            );
            invoke_signed(
                &ix,
                &[payer.clone(), accrual.clone(), system_program.clone()],
                accrual_signer,
            )?;
        }
        AccrualFunding::Adopt { top_up } => {
            if top_up > 0 {
                let ix = system_instruction::transfer(payer.key, accrual.key, top_up);
                invoke(&ix, &[payer.clone(), accrual.clone(), system_program.clone()])?;
            }
            let ix = system_instruction::allocate(accrual.key, space as u64);
            invoke_signed(&ix, &[accrual.clone(), system_program.clone()], accrual_signer)?;
            let ix = system_instruction::assign(accrual.key, program_id);
            invoke_signed(&ix, &[accrual.clone(), system_program.clone()], accrual_signer)?;
        }
    }
    Ok(())
}

pub fn claim_referral_bonus(ctx: Context<ClaimReferralBonus>) -> Result<()> {
    let amount = take_referral_bonus(&mut ctx.accounts.accrual)?;

    let m = &ctx.accounts.market;
    let id_le = m.market_id.to_le_bytes();
    let signer_seeds: &[&[&[u8]]] = &[&[MARKET_SEED, &id_le, &[m.bump]]];

    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault.to_account_info(),
                to: ctx.accounts.referrer_token_account.to_account_info(),
                authority: ctx.accounts.market.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    emit!(ReferralBonusClaimed {
        market: ctx.accounts.market.key(),
        referrer: ctx.accounts.referrer.key(),
        amount,
    });
    Ok(())
}
