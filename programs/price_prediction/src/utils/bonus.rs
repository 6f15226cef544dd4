use anchor_lang::prelude::*;

use crate::{state::Market, utils::percent_of};

/// Amounts reserved out of one stake's treasury carve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BonusReservation {
    pub treasury_carve: u64,
    pub referee_amount: u64,
    pub referrer_amount: u64,
    pub staking_amount: u64,
    pub referrer: Option<Pubkey>,
}

impl BonusReservation {
    /// Everything reserved for bonuses; added to the bet side's accumulator.
    pub fn total(&self) -> Result<u64> {
        crate::utils::add(
            crate::utils::add(self.referee_amount, self.referrer_amount)?,
            self.staking_amount,
        )
    }
}

/// Splits the treasury carve of `stake` into referral and staking reservations.
/// The bettor's principal is never touched; bonuses only come out of the carve.
pub fn reserve_bonuses(
    market: &Market,
    stake: u64,
    referrer: Option<Pubkey>,
    tier: u8,
) -> Result<BonusReservation> {
    let treasury_carve = percent_of(stake, market.treasury_rate)?;
    let mut reservation = BonusReservation {
        treasury_carve,
        ..Default::default()
    };

    if let Some(referrer) = referrer {
        reservation.referee_amount = percent_of(treasury_carve, market.referee_rate)?;
        reservation.referrer_amount = percent_of(treasury_carve, market.referrer_rate)?;
        reservation.referrer = Some(referrer);
    }

    if tier > 0 {
        reservation.staking_amount = percent_of(treasury_carve, market.tier_bonus(tier))?;
    }

    Ok(reservation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> Market {
        Market {
            treasury_rate: 3,
            referrer_rate: 10,
            referee_rate: 5,
            staking_tier_bonus: vec![0, 10, 20],
            ..Default::default()
        }
    }

    #[test]
    fn referral_split_from_carve() {
        let referrer = Pubkey::new_unique();
        let r = reserve_bonuses(&market(), 1000, Some(referrer), 0).unwrap();

        assert_eq!(r.treasury_carve, 30);
        assert_eq!(r.referee_amount, 1);
        assert_eq!(r.referrer_amount, 3);
        assert_eq!(r.staking_amount, 0);
        assert_eq!(r.referrer, Some(referrer));
        assert_eq!(r.total().unwrap(), 4);
    }

    #[test]
    fn staking_bonus_is_additive_with_referral() {
        let r = reserve_bonuses(&market(), 1000, Some(Pubkey::new_unique()), 2).unwrap();
        assert_eq!(r.staking_amount, 6);
        assert_eq!(r.total().unwrap(), 10);
        assert!(r.total().unwrap() <= r.treasury_carve);
    }

    #[test]
    fn no_referrer_and_tier_zero_reserves_nothing() {
        let r = reserve_bonuses(&market(), 1000, None, 0).unwrap();
        assert_eq!(r.treasury_carve, 30);
        assert_eq!(r.total().unwrap(), 0);
        assert_eq!(r.referrer, None);
    }

    #[test]
    fn unconfigured_tier_gets_no_bonus() {
        let r = reserve_bonuses(&market(), 1000, None, 5).unwrap();
        assert_eq!(r.staking_amount, 0);
    }

    #[test]
    fn large_stake_carves_without_overflow() {
        let m = Market { treasury_rate: 10, ..market() };
        let stake = u64::MAX / 5;
        let r = reserve_bonuses(&m, stake, Some(Pubkey::new_unique()), 2).unwrap();
        assert_eq!(r.treasury_carve, stake / 10);
        assert_eq!(r.staking_amount, r.treasury_carve / 5);
        assert!(r.total().unwrap() <= r.treasury_carve);
    }
}
