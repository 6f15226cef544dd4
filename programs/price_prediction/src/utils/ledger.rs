use anchor_lang::prelude::*;

use crate::{
    errors::PredictionError,
    state::{BetEntry, Market, Position, Round},
    utils::{add, BonusReservation},
};

/// Open-window check for new bets.
pub fn bettable(round: &Round, now: i64) -> bool {
    round.started() && now > round.start_time && now < round.lock_time
}

/// Records one bet in `round` and writes the participant's entry.
/// All checks run before the first write.
#[allow(clippy::too_many_arguments)]
pub fn record_bet(
    market: &Market,
    round: &mut Round,
    entry: &mut BetEntry,
    participant: Pubkey,
    position: Position,
    amount: u64,
    reservation: &BonusReservation,
    now: i64,
) -> Result<()> {
    require!(!market.paused, PredictionError::Paused);
    require!(round.epoch == market.current_epoch, PredictionError::RoundNotBettable);
    require!(bettable(round, now), PredictionError::RoundNotBettable);
    require!(amount >= market.min_bet_amount, PredictionError::BetBelowMinimum);
    require!(!entry.exists(), PredictionError::AlreadyBet);

    let bonus = reservation.total()?;
    let (side_amount, side_bonus) = match position {
        Position::Bull => (
            add(round.bull_amount, amount)?,
            add(round.bull_bonus_amount, bonus)?,
        ),
        Position::Bear => (
            add(round.bear_amount, amount)?,
            add(round.bear_bonus_amount, bonus)?,
        ),
    };
    let treasury = add(round.treasury_amount, reservation.treasury_carve)?;

    match position {
        Position::Bull => {
            round.bull_amount = side_amount;
            round.bull_bonus_amount = side_bonus;
        }
        Position::Bear => {
            round.bear_amount = side_amount;
            round.bear_bonus_amount = side_bonus;
        }
    }
    round.treasury_amount = treasury;

    entry.market = round.market;
    entry.epoch = round.epoch;
    entry.participant = participant;
    entry.position = position;
    entry.amount = amount;
    entry.referee_amount = reservation.referee_amount;
    entry.referrer_amount = reservation.referrer_amount;
    entry.staking_amount = reservation.staking_amount;
    entry.referrer = reservation.referrer.unwrap_or_default();
    entry.claimed = false;
    entry.placed_at = now;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{reserve_bonuses, test_support::assert_err};

    fn market() -> Market {
        Market {
            current_epoch: 2,
            min_bet_amount: 10,
            treasury_rate: 3,
            referrer_rate: 10,
            referee_rate: 5,
            staking_tier_bonus: vec![0, 10],
            ..Default::default()
        }
    }

    fn round2() -> Round {
        Round {
            epoch: 2,
            start_time: 305,
            lock_time: 605,
            close_time: 905,
            ..Default::default()
        }
    }

    #[test]
    fn bull_bet_updates_side_totals() {
        let m = market();
        let mut round = round2();
        let mut entry = BetEntry::default();
        let alice = Pubkey::new_unique();
        let res = reserve_bonuses(&m, 100, None, 0).unwrap();

        record_bet(&m, &mut round, &mut entry, alice, Position::Bull, 100, &res, 310).unwrap();

        assert_eq!(round.bull_amount, 100);
        assert_eq!(round.bear_amount, 0);
        assert_eq!(round.treasury_amount, 3);
        assert_eq!(entry.amount, 100);
        assert_eq!(entry.participant, alice);
        assert_eq!(entry.epoch, 2);
        assert!(!entry.claimed);
    }

    #[test]
    fn referral_reservation_lands_on_bet_side() {
        let m = market();
        let mut round = round2();
        let mut entry = BetEntry::default();
        let referrer = Pubkey::new_unique();
        let res = reserve_bonuses(&m, 1000, Some(referrer), 0).unwrap();

        record_bet(&m, &mut round, &mut entry, Pubkey::new_unique(), Position::Bear, 1000, &res, 400)
            .unwrap();

        assert_eq!(round.bear_amount, 1000);
        assert_eq!(round.bear_bonus_amount, 4);
        assert_eq!(round.bull_bonus_amount, 0);
        assert_eq!(round.treasury_amount, 30);
        assert_eq!(entry.referee_amount, 1);
        assert_eq!(entry.referrer_amount, 3);
        assert_eq!(entry.referrer, referrer);
    }

    #[test]
    fn second_bet_in_same_round_fails_without_mutation() {
        let m = market();
        let mut round = round2();
        let mut entry = BetEntry::default();
        let alice = Pubkey::new_unique();
        let res = reserve_bonuses(&m, 100, None, 0).unwrap();
        record_bet(&m, &mut round, &mut entry, alice, Position::Bull, 100, &res, 310).unwrap();

        assert_err(
            record_bet(&m, &mut round, &mut entry, alice, Position::Bear, 100, &res, 311),
            PredictionError::AlreadyBet,
        );
        assert_eq!(round.bull_amount, 100);
        assert_eq!(round.bear_amount, 0);
        assert_eq!(entry.position, Position::Bull);
    }

    #[test]
    fn bet_outside_open_window_fails() {
        let m = market();
        let res = reserve_bonuses(&m, 100, None, 0).unwrap();
        for now in [305, 605, 700] {
            let mut round = round2();
            assert_err(
                record_bet(&m, &mut round, &mut BetEntry::default(), Pubkey::new_unique(), Position::Bull, 100, &res, now),
                PredictionError::RoundNotBettable,
            );
        }
    }

    #[test]
    fn bet_rejected_when_paused_stale_epoch_or_too_small() {
        let res = BonusReservation::default();
        let alice = Pubkey::new_unique();

        let paused = Market { paused: true, ..market() };
        assert_err(
            record_bet(&paused, &mut round2(), &mut BetEntry::default(), alice, Position::Bull, 100, &res, 310),
            PredictionError::Paused,
        );

        let moved_on = Market { current_epoch: 3, ..market() };
        assert_err(
            record_bet(&moved_on, &mut round2(), &mut BetEntry::default(), alice, Position::Bull, 100, &res, 310),
            PredictionError::RoundNotBettable,
        );

        assert_err(
            record_bet(&market(), &mut round2(), &mut BetEntry::default(), alice, Position::Bull, 9, &res, 310),
            PredictionError::BetBelowMinimum,
        );
    }
}
