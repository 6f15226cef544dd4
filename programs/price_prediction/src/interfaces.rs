use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::invoke_signed,
};
use solana_sha256_hasher::hashv;

use crate::{
    constants::DISCRIMINATOR_LEN,
    errors::PredictionError,
    utils::{OracleReading, REFERRAL_RECORD_SEED, STAKING_RECORD_SEED},
};

// -------------------------
// Collaborator contracts
// -------------------------

pub trait PriceOracle {
    fn latest(&self) -> Result<OracleReading>;
}

pub trait StakingTierLookup {
    /// Tier 0 means no bonus.
    fn tier(&self, participant: &Pubkey) -> Result<u8>;
}

pub trait ReferralLookup {
    fn referrer(&self, participant: &Pubkey) -> Result<Option<Pubkey>>;
    fn is_locked(&self, participant: &Pubkey) -> Result<bool>;
    /// Freezes the participant's referrer binding.
    fn lock_address(&self, participant: &Pubkey, signer_seeds: &[&[&[u8]]]) -> Result<()>;
}

// -------------------------
// Foreign account layouts
// -------------------------

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakingRecord {
    pub participant: Pubkey,
    pub tier: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralRecord {
    pub participant: Pubkey,
    pub referrer: Pubkey,
    pub locked: bool,
}

fn body<T: AnchorDeserialize>(data: &[u8], err: PredictionError) -> Result<T> {
    let mut slice = data.get(DISCRIMINATOR_LEN..).ok_or_else(|| error!(err))?;
    T::deserialize(&mut slice).map_err(|_| error!(err))
}

pub fn parse_feed(data: &[u8]) -> Result<OracleReading> {
    body(data, PredictionError::OracleFeedMalformed)
}

pub fn parse_staking_record(data: &[u8]) -> Result<StakingRecord> {
    body(data, PredictionError::RegistryRecordMalformed)
}

pub fn parse_referral_record(data: &[u8]) -> Result<ReferralRecord> {
    body(data, PredictionError::RegistryRecordMalformed)
}

/// Anchor instruction discriminator: first 8 bytes of sha256("global:<name>").
pub fn instruction_sighash(name: &str) -> [u8; 8] {
    let h = hashv(&[b"global:".as_ref(), name.as_bytes()]).to_bytes();
    let mut out = [0u8; 8];
    out.copy_from_slice(&h[..8]);
    out
}

pub fn staking_record_address(registry: &Pubkey, participant: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[STAKING_RECORD_SEED, participant.as_ref()], registry).0
}

pub fn referral_record_address(registry: &Pubkey, participant: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[REFERRAL_RECORD_SEED, participant.as_ref()], registry).0
}

// -------------------------
// On-chain adapters
// -------------------------

/// Price feed account configured on the market.
pub struct FeedAccount<'a, 'info> {
    pub info: &'a AccountInfo<'info>,
}

impl PriceOracle for FeedAccount<'_, '_> {
    fn latest(&self) -> Result<OracleReading> {
        let data = self
            .info
            .try_borrow_data()
            .map_err(|_| error!(PredictionError::AccountBorrowFailed))?;
        parse_feed(&data)
    }
}

/// Reads a registry record if it was created by `registry`; `None` when the
/// participant never registered.
fn read_record<T: AnchorDeserialize>(
    registry: &Pubkey,
    expected: Pubkey,
    record: &AccountInfo,
) -> Result<Option<T>> {
    require_keys_eq!(expected, record.key(), PredictionError::RegistryRecordMismatch);
    if record.owner != registry || record.data_is_empty() {
        return Ok(None);
    }
    let data = record
        .try_borrow_data()
        .map_err(|_| error!(PredictionError::AccountBorrowFailed))?;
    body(&data, PredictionError::RegistryRecordMalformed).map(Some)
}

pub struct StakingRegistry<'a, 'info> {
    /// `Pubkey::default()` when the market has no staking registry.
    pub registry: Pubkey,
    pub record: Option<&'a AccountInfo<'info>>,
}

impl StakingTierLookup for StakingRegistry<'_, '_> {
    fn tier(&self, participant: &Pubkey) -> Result<u8> {
        if self.registry == Pubkey::default() {
            return Ok(0);
        }
        let Some(record) = self.record else {
            return Ok(0);
        };

        let expected = staking_record_address(&self.registry, participant);
        let found: Option<StakingRecord> = read_record(&self.registry, expected, record)?;
        match found {
            Some(r) => {
                require_keys_eq!(r.participant, *participant, PredictionError::RegistryRecordMismatch);
                Ok(r.tier)
            }
            None => Ok(0),
        }
    }
}

pub struct ReferralRegistry<'a, 'info> {
    /// `Pubkey::default()` when the market has no referral registry.
    pub registry: Pubkey,
    pub record: Option<&'a AccountInfo<'info>>,
    pub program: Option<&'a AccountInfo<'info>>,
    /// Market PDA, signs the lock CPI.
    pub authority: AccountInfo<'info>,
}

impl ReferralRegistry<'_, '_> {
    fn enabled(&self) -> bool {
        self.registry != Pubkey::default()
    }

    fn lookup(&self, participant: &Pubkey) -> Result<Option<ReferralRecord>> {
        if !self.enabled() {
            return Ok(None);
        }
        let record = self.record.ok_or_else(|| error!(PredictionError::RegistryRecordMismatch))?;
        let expected = referral_record_address(&self.registry, participant);
        let found: Option<ReferralRecord> = read_record(&self.registry, expected, record)?;
        if let Some(r) = &found {
            require_keys_eq!(r.participant, *participant, PredictionError::RegistryRecordMismatch);
        }
        Ok(found)
    }
}

impl ReferralLookup for ReferralRegistry<'_, '_> {
    fn referrer(&self, participant: &Pubkey) -> Result<Option<Pubkey>> {
        Ok(self
            .lookup(participant)?
            .map(|r| r.referrer)
            .filter(|k| *k != Pubkey::default()))
    }

    fn is_locked(&self, participant: &Pubkey) -> Result<bool> {
        Ok(self.lookup(participant)?.is_some_and(|r| r.locked))
    }

    fn lock_address(&self, participant: &Pubkey, signer_seeds: &[&[&[u8]]]) -> Result<()> {
        // nothing bound, nothing to freeze
        if self.lookup(participant)?.is_none() {
            return Ok(());
        }
        let record = self.record.ok_or_else(|| error!(PredictionError::RegistryRecordMismatch))?;
        let program = self.program.ok_or_else(|| error!(PredictionError::RegistryProgramMissing))?;
        require_keys_eq!(program.key(), self.registry, PredictionError::RegistryProgramMissing);

        let ix = Instruction {
            program_id: self.registry,
            accounts: vec![
                AccountMeta::new(record.key(), false),
                AccountMeta::new_readonly(self.authority.key(), true),
            ],
            data: instruction_sighash("lock_address").to_vec(),
        };

        invoke_signed(
            &ix,
            &[record.clone(), self.authority.clone(), program.clone()],
            signer_seeds,
        )?;
        Ok(())
    }
}
