use anchor_lang::prelude::*;

use crate::{errors::PredictionError, state::Market};

/// One answer of the price feed.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct OracleReading {
    pub round_id: u64,
    pub price: i64,
    pub updated_at: i64,
}

/// Checks a reading against the market's high-water mark and allowance.
/// Nothing is consumed here; the caller records `round_id` once the whole tick succeeded.
pub fn accept_reading(market: &Market, reading: &OracleReading, now: i64) -> Result<()> {
    require!(
        reading.round_id > market.oracle_latest_round_id,
        PredictionError::OracleRoundNotAdvanced
    );

    let latest_allowed = now
        .checked_add(market.oracle_update_allowance)
        .ok_or_else(|| error!(PredictionError::MathOverflow))?;
    require!(
        reading.updated_at <= latest_allowed,
        PredictionError::OracleUpdateBeyondAllowance
    );

    Ok(())
}

pub fn consume_reading(market: &mut Market, reading: &OracleReading) {
    market.oracle_latest_round_id = reading.round_id;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_support::assert_err;

    fn market() -> Market {
        Market {
            oracle_update_allowance: 300,
            oracle_latest_round_id: 10,
            ..Default::default()
        }
    }

    #[test]
    fn rejects_non_increasing_round_id() {
        let m = market();
        let stale = OracleReading { round_id: 10, price: 1, updated_at: 0 };
        assert_err(accept_reading(&m, &stale, 100), PredictionError::OracleRoundNotAdvanced);

        let fresh = OracleReading { round_id: 11, ..stale };
        assert!(accept_reading(&m, &fresh, 100).is_ok());
    }

    #[test]
    fn rejects_update_past_allowance() {
        let m = market();
        let edge = OracleReading { round_id: 11, price: 1, updated_at: 400 };
        assert!(accept_reading(&m, &edge, 100).is_ok());

        let ahead = OracleReading { updated_at: 401, ..edge };
        assert_err(
            accept_reading(&m, &ahead, 100),
            PredictionError::OracleUpdateBeyondAllowance
        );
    }

    #[test]
    fn consume_moves_high_water_mark() {
        let mut m = market();
        consume_reading(&mut m, &OracleReading { round_id: 42, price: 0, updated_at: 0 });
        assert_eq!(m.oracle_latest_round_id, 42);
    }
}
