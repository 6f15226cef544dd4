use anchor_lang::prelude::*;

use crate::{
    errors::PredictionError,
    state::{Market, Position, Round},
    utils::{add, sub},
};

/// Computes reward base, reward pool and final treasury of a closed round.
/// Returns the final treasury take; the caller books it on the market.
///
/// - decisive: the winning side's stakes form the base, the pool is everything minus
///   the gross carve, and the winning side's bonus reservations come out of the carve.
/// - tie, or nobody on the winning side: the whole round goes to treasury.
pub fn calculate_rewards(round: &mut Round) -> Result<u64> {
    require!(round.resolved, PredictionError::RoundNotResolved);
    require!(
        !round.settled && round.reward_base_amount == 0 && round.reward_amount == 0,
        PredictionError::RewardsAlreadyCalculated
    );

    let total = round
        .total_amount()
        .ok_or_else(|| error!(PredictionError::MathOverflow))?;

    let (base, side_bonus) = match round.winner() {
        Some(Position::Bull) => (round.bull_amount, round.bull_bonus_amount),
        Some(Position::Bear) => (round.bear_amount, round.bear_bonus_amount),
        None => (0, 0),
    };

    let (reward_base_amount, reward_amount, treasury) = if base == 0 {
        (0, 0, total)
    } else {
        (
            base,
            sub(total, round.treasury_amount)?,
            sub(round.treasury_amount, side_bonus)?,
        )
    };

    round.reward_base_amount = reward_base_amount;
    round.reward_amount = reward_amount;
    round.treasury_amount = treasury;
    round.settled = true;

    Ok(treasury)
}

/// Settles `round` and books its final treasury on the market.
pub fn settle_round(market: &mut Market, round: &mut Round) -> Result<u64> {
    let treasury = calculate_rewards(round)?;
    market.treasury_amount = add(market.treasury_amount, treasury)?;
    Ok(treasury)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_support::assert_err;

    fn closed(lock: i64, close: i64) -> Round {
        Round {
            epoch: 3,
            lock_oracle_id: 1,
            resolved: true,
            lock_price: lock,
            close_price: close,
            bull_amount: 700,
            bear_amount: 300,
            bull_bonus_amount: 4,
            bear_bonus_amount: 2,
            treasury_amount: 30,
            ..Default::default()
        }
    }

    #[test]
    fn bull_win_pays_pool_net_of_carve() {
        let mut round = closed(100, 120);
        let mut market = Market::default();

        let treasury = settle_round(&mut market, &mut round).unwrap();

        assert_eq!(round.reward_base_amount, 700);
        assert_eq!(round.reward_amount, 970);
        assert_eq!(treasury, 26);
        assert_eq!(round.treasury_amount, 26);
        assert_eq!(market.treasury_amount, 26);
        // conservation
        assert_eq!(
            round.bull_amount + round.bear_amount,
            round.reward_amount + round.treasury_amount + round.bull_bonus_amount
        );
    }

    #[test]
    fn bear_win_is_symmetric() {
        let mut round = closed(100, 80);
        calculate_rewards(&mut round).unwrap();

        assert_eq!(round.reward_base_amount, 300);
        assert_eq!(round.reward_amount, 970);
        assert_eq!(round.treasury_amount, 28);
        assert_eq!(1000, round.reward_amount + round.treasury_amount + round.bear_bonus_amount);
    }

    #[test]
    fn tie_forfeits_everything_to_treasury() {
        let mut round = closed(100, 100);
        let mut market = Market { treasury_amount: 5, ..Default::default() };

        settle_round(&mut market, &mut round).unwrap();

        assert_eq!(round.reward_base_amount, 0);
        assert_eq!(round.reward_amount, 0);
        assert_eq!(round.treasury_amount, 1000);
        assert_eq!(market.treasury_amount, 1005);
    }

    #[test]
    fn empty_winning_side_goes_to_treasury() {
        let mut round = Round {
            bull_amount: 0,
            bull_bonus_amount: 0,
            ..closed(100, 120)
        };
        calculate_rewards(&mut round).unwrap();

        assert_eq!(round.reward_base_amount, 0);
        assert_eq!(round.reward_amount, 0);
        assert_eq!(round.treasury_amount, 300);
    }

    #[test]
    fn settles_exactly_once() {
        let mut market = Market::default();
        let mut round = closed(100, 120);
        settle_round(&mut market, &mut round).unwrap();
        assert_err(
            settle_round(&mut market, &mut round),
            PredictionError::RewardsAlreadyCalculated,
        );
        assert_eq!(market.treasury_amount, 26);

        // tie rounds keep zero reward fields and still refuse a second pass
        let mut tie = closed(100, 100);
        settle_round(&mut market, &mut tie).unwrap();
        assert_err(settle_round(&mut market, &mut tie), PredictionError::RewardsAlreadyCalculated);
        assert_eq!(market.treasury_amount, 1026);
    }

    #[test]
    fn unresolved_round_cannot_settle() {
        let mut round = Round { resolved: false, ..closed(100, 120) };
        assert_err(calculate_rewards(&mut round), PredictionError::RoundNotResolved);
        assert_eq!(round.treasury_amount, 30);
    }
}
