use anchor_lang::prelude::*;

use crate::{
    errors::PredictionError,
    state::{BetEntry, ReferralAccrual, Round},
    utils::{add, mul_div},
};

/// A winning, still unclaimed bet in a settled, decisive round.
pub fn claimable(round: &Round, entry: &BetEntry) -> bool {
    round.resolved
        && round.settled
        && entry.exists()
        && !entry.claimed
        && round.winner() == Some(entry.position)
}

/// An unclaimed bet in a round that never closed within its buffer.
pub fn refundable(round: &Round, entry: &BetEntry, now: i64, buffer_seconds: i64) -> bool {
    !round.resolved
        && round.started()
        && !entry.claimed
        && now > round.close_time.saturating_add(buffer_seconds)
        && entry.exists()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub payout: u64,
    pub refund: bool,
    /// Referrer reservation deferred to the referrer's accrual.
    pub referrer_credit: Option<(Pubkey, u64)>,
}

/// Resolves one (round, entry) claim and marks the entry claimed.
/// The caller pays out only after every entry of the batch went through here.
pub fn resolve_claim(
    round: &Round,
    entry: &mut BetEntry,
    participant: &Pubkey,
    now: i64,
    buffer_seconds: i64,
) -> Result<ClaimOutcome> {
    require!(round.started(), PredictionError::RoundNotStarted);
    require!(now > round.close_time, PredictionError::RoundNotEnded);
    require!(entry.epoch == round.epoch, PredictionError::EpochMismatch);
    require_keys_eq!(entry.participant, *participant, PredictionError::Unauthorized);
    require!(!entry.claimed, PredictionError::AlreadyClaimed);

    let outcome = if round.resolved {
        require!(claimable(round, entry), PredictionError::NotClaimable);

        let share = mul_div(entry.amount, round.reward_amount, round.reward_base_amount)?;
        let payout = add(add(share, entry.referee_amount)?, entry.staking_amount)?;
        let referrer_credit = (entry.referrer_amount > 0 && entry.referrer != Pubkey::default())
            .then_some((entry.referrer, entry.referrer_amount));

        ClaimOutcome { payout, refund: false, referrer_credit }
    } else {
        require!(
            refundable(round, entry, now, buffer_seconds),
            PredictionError::NotRefundable
        );
        ClaimOutcome { payout: entry.amount, refund: true, referrer_credit: None }
    };

    entry.claimed = true;
    Ok(outcome)
}

pub fn credit_referrer(accrual: &mut ReferralAccrual, amount: u64) -> Result<()> {
    let pending = add(accrual.pending, amount)?;
    let total = add(accrual.total, amount)?;
    accrual.pending = pending;
    accrual.total = total;
    Ok(())
}

/// Zeroes the pending referral balance and returns what is owed.
pub fn take_referral_bonus(accrual: &mut ReferralAccrual) -> Result<u64> {
    require!(accrual.pending > 0, PredictionError::NothingToClaim);
    let amount = accrual.pending;
    accrual.pending = 0;
    Ok(amount)
}
