use anchor_lang::prelude::*;

use crate::{constants::PERCENT_BASE, errors::PredictionError};

pub mod bonus;
pub mod config;
pub mod entitlement;
pub mod ledger;
pub mod oracle;
pub mod rounds;
pub mod settlement;


pub use bonus::*;
pub use config::*;
pub use entitlement::*;
pub use ledger::*;
pub use oracle::*;
pub use rounds::*;
pub use settlement::*;

// -----------------
// Seeds / constants
// -----------------
pub const ACCESS_CONTROL_SEED: &[u8] = b"access_control_v1";
pub const MARKET_SEED: &[u8] = b"market_v1";
pub const VAULT_SEED: &[u8] = b"vault_v1";
pub const ROUND_SEED: &[u8] = b"round_v1";
pub const BET_SEED: &[u8] = b"bet_v1";
pub const REFERRAL_ACCRUAL_SEED: &[u8] = b"referral_accrual_v1";

// Seeds of records owned by the external registries
pub const STAKING_RECORD_SEED: &[u8] = b"staking";
pub const REFERRAL_RECORD_SEED: &[u8] = b"referral";

// -------------------------
// PDA derivation
// -------------------------
pub fn round_address(program_id: &Pubkey, market: &Pubkey, epoch: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[ROUND_SEED, market.as_ref(), epoch.to_le_bytes().as_ref()],
        program_id,
    )
}

pub fn bet_address(
    program_id: &Pubkey,
    market: &Pubkey,
    epoch: u64,
    participant: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            BET_SEED,
            market.as_ref(),
            epoch.to_le_bytes().as_ref(),
            participant.as_ref(),
        ],
        program_id,
    )
}

pub fn accrual_address(program_id: &Pubkey, market: &Pubkey, referrer: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[REFERRAL_ACCRUAL_SEED, market.as_ref(), referrer.as_ref()],
        program_id,
    )
}

// -------------------------
// Fixed-point helpers
// -------------------------

/// `amount * rate / 100`, truncating.
pub fn percent_of(amount: u64, rate: u8) -> Result<u64> {
    mul_div(amount, rate as u64, PERCENT_BASE)
}

/// `amount * numerator / denominator` through u128, truncating.
pub fn mul_div(amount: u64, numerator: u64, denominator: u64) -> Result<u64> {
    require!(denominator != 0, PredictionError::MathOverflow);
    let v = (amount as u128)
        .checked_mul(numerator as u128)
        .ok_or_else(|| error!(PredictionError::MathOverflow))?
        / denominator as u128;
    u64::try_from(v).map_err(|_| error!(PredictionError::MathOverflow))
}

pub fn add(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b)
        .ok_or_else(|| error!(PredictionError::MathOverflow))
}

pub fn sub(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b)
        .ok_or_else(|| error!(PredictionError::MathOverflow))
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::assert_err;

    #[test]
    fn percent_of_truncates() {
        assert_eq!(percent_of(1000, 3).unwrap(), 30);
        assert_eq!(percent_of(30, 5).unwrap(), 1);
        assert_eq!(percent_of(99, 1).unwrap(), 0);
        assert_eq!(percent_of(u64::MAX, 10).unwrap(), u64::MAX / 10);
        assert_eq!(percent_of(u64::MAX, 100).unwrap(), u64::MAX);
        assert_err(percent_of(u64::MAX, 200), PredictionError::MathOverflow);
    }

    #[test]
    fn mul_div_uses_wide_intermediate() {
        assert_eq!(mul_div(350, 970, 700).unwrap(), 485);
        assert_eq!(mul_div(u64::MAX, 2, 4).unwrap(), u64::MAX / 2);
        assert_err(mul_div(1, 1, 0), PredictionError::MathOverflow);
    }

    #[test]
    fn pdas_are_distinct_per_epoch_and_participant() {
        let program = crate::ID;
        let market = Pubkey::new_unique();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        assert_ne!(round_address(&program, &market, 1).0, round_address(&program, &market, 2).0);
        assert_ne!(
            bet_address(&program, &market, 1, &alice).0,
            bet_address(&program, &market, 1, &bob).0
        );
        assert_ne!(
            accrual_address(&program, &market, &alice).0,
            bet_address(&program, &market, 1, &alice).0
        );
    }
}
