use anchor_lang::prelude::*;

use crate::{
    errors::PredictionError,
    state::{Market, Round},
    utils::{accept_reading, consume_reading, settle_round, OracleReading},
};

// -------------------------
// Single-round transitions
// -------------------------

/// Writes the timing of a fresh round: open now, lock after one interval, close after two.
pub fn open_round(market: &Market, market_key: Pubkey, round: &mut Round, epoch: u64, now: i64) -> Result<()> {
    require!(!round.started(), PredictionError::RoundAlreadyStarted);
    require!(market.interval_seconds > 0, PredictionError::InvalidTiming);

    let lock_time = now
        .checked_add(market.interval_seconds)
        .ok_or_else(|| error!(PredictionError::MathOverflow))?;
    let close_time = lock_time
        .checked_add(market.interval_seconds)
        .ok_or_else(|| error!(PredictionError::MathOverflow))?;

    round.market = market_key;
    round.epoch = epoch;
    round.start_time = now;
    round.lock_time = lock_time;
    round.close_time = close_time;
    Ok(())
}

/// Steady-state open guard: the round two epochs back must have reached its close time.
pub fn check_openable(two_back: &Round, now: i64) -> Result<()> {
    require!(
        two_back.started() && now >= two_back.close_time,
        PredictionError::PreviousRoundNotClosed
    );
    Ok(())
}

pub fn check_lockable(round: &Round, now: i64, buffer_seconds: i64) -> Result<()> {
    require!(round.started(), PredictionError::RoundNotStarted);
    require!(!round.locked(), PredictionError::RoundAlreadyLocked);
    require!(now >= round.lock_time, PredictionError::LockTooEarly);
    require!(
        now <= round.lock_time.saturating_add(buffer_seconds),
        PredictionError::LockBufferExceeded
    );
    Ok(())
}

pub fn check_closable(round: &Round, now: i64, buffer_seconds: i64) -> Result<()> {
    require!(round.locked(), PredictionError::RoundNotLocked);
    require!(!round.resolved, PredictionError::RoundAlreadyResolved);
    require!(now >= round.close_time, PredictionError::CloseTooEarly);
    require!(
        now <= round.close_time.saturating_add(buffer_seconds),
        PredictionError::CloseBufferExceeded
    );
    Ok(())
}

fn apply_lock(round: &mut Round, reading: &OracleReading) {
    round.lock_price = reading.price;
    round.lock_oracle_id = reading.round_id;
}

fn apply_close(round: &mut Round, reading: &OracleReading) {
    round.close_price = reading.price;
    round.close_oracle_id = reading.round_id;
    round.resolved = true;
}

// -------------------------
// Market-level sequence
// -------------------------

/// First bootstrap step: opens `current_epoch + 1` (epoch 1 on a fresh market).
pub fn open_genesis_round(market: &mut Market, market_key: Pubkey, round: &mut Round, now: i64) -> Result<()> {
    require!(!market.paused, PredictionError::Paused);
    require!(!market.genesis_open_done, PredictionError::GenesisOpenAlreadyDone);

    let epoch = market.next_epoch();
    open_round(market, market_key, round, epoch, now)?;

    market.current_epoch = epoch;
    market.genesis_open_done = true;
    Ok(())
}

/// Second bootstrap step: locks the genesis round and opens the one after it.
pub fn lock_genesis_round(
    market: &mut Market,
    market_key: Pubkey,
    current: &mut Round,
    next: &mut Round,
    reading: &OracleReading,
    now: i64,
) -> Result<()> {
    require!(!market.paused, PredictionError::Paused);
    require!(market.genesis_open_done, PredictionError::GenesisOpenNotDone);
    require!(!market.genesis_lock_done, PredictionError::GenesisLockAlreadyDone);
    require!(current.epoch == market.current_epoch, PredictionError::EpochMismatch);

    accept_reading(market, reading, now)?;
    check_lockable(current, now, market.buffer_seconds)?;

    let mut opened = next.clone();
    open_round(market, market_key, &mut opened, market.next_epoch(), now)?;

    apply_lock(current, reading);
    *next = opened;
    consume_reading(market, reading);
    market.current_epoch = market.next_epoch();
    market.genesis_lock_done = true;
    Ok(())
}

/// Outcome of one steady-state tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub locked_epoch: u64,
    pub closed_epoch: u64,
    pub opened_epoch: u64,
    pub treasury: u64,
}

/// Steady-state tick: one oracle price locks the current round and closes the previous
/// one, the closed round is settled and the next round opens. Either every write lands
/// or none does.
pub fn advance_market(
    market: &mut Market,
    market_key: Pubkey,
    locking: &mut Round,
    closing: &mut Round,
    next: &mut Round,
    reading: &OracleReading,
    now: i64,
) -> Result<Tick> {
    require!(!market.paused, PredictionError::Paused);
    require!(
        market.genesis_open_done && market.genesis_lock_done,
        PredictionError::GenesisLockNotDone
    );
    require!(locking.epoch == market.current_epoch, PredictionError::EpochMismatch);
    require!(closing.epoch == market.previous_epoch(), PredictionError::EpochMismatch);

    accept_reading(market, reading, now)?;
    check_lockable(locking, now, market.buffer_seconds)?;
    check_closable(closing, now, market.buffer_seconds)?;

    let mut staged_market = market.clone();
    let mut staged_locking = locking.clone();
    let mut staged_closing = closing.clone();
    let mut staged_next = next.clone();

    apply_lock(&mut staged_locking, reading);
    apply_close(&mut staged_closing, reading);
    let treasury = settle_round(&mut staged_market, &mut staged_closing)?;

    check_openable(&staged_closing, now)?;
    let opened_epoch = staged_market.next_epoch();
    open_round(&staged_market, market_key, &mut staged_next, opened_epoch, now)?;

    consume_reading(&mut staged_market, reading);
    staged_market.current_epoch = opened_epoch;

    *market = staged_market;
    *locking = staged_locking;
    *closing = staged_closing;
    *next = staged_next;

    Ok(Tick {
        locked_epoch: locking.epoch,
        closed_epoch: closing.epoch,
        opened_epoch,
        treasury,
    })
}

/// Halts ticks and bets. Rounds in flight can no longer close and fall back to refunds.
pub fn pause_market(market: &mut Market) -> Result<()> {
    require!(!market.paused, PredictionError::Paused);
    market.paused = true;
    market.genesis_open_done = false;
    market.genesis_lock_done = false;
    Ok(())
}

/// Resumes the market; the operator replays genesis open and lock.
pub fn unpause_market(market: &mut Market) -> Result<()> {
    require!(market.paused, PredictionError::NotPaused);
    market.paused = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::RoundPhase,
        utils::test_support::assert_err,
    };
    use std::collections::BTreeMap;

    const INTERVAL: i64 = 300;
    const BUFFER: i64 = 30;

    struct Book {
        key: Pubkey,
        market: Market,
        rounds: BTreeMap<u64, Round>,
        feed_id: u64,
    }

    impl Book {
        fn new() -> Self {
            Book {
                key: Pubkey::new_unique(),
                market: Market {
                    interval_seconds: INTERVAL,
                    buffer_seconds: BUFFER,
                    oracle_update_allowance: 300,
                    ..Default::default()
                },
                rounds: BTreeMap::new(),
                feed_id: 0,
            }
        }

        fn reading(&mut self, price: i64, now: i64) -> OracleReading {
            self.feed_id += 1;
            OracleReading { round_id: self.feed_id, price, updated_at: now }
        }

        fn take(&mut self, epoch: u64) -> Round {
            self.rounds.remove(&epoch).unwrap_or_default()
        }

        fn put(&mut self, round: Round) {
            if round.started() {
                self.rounds.insert(round.epoch, round);
            }
        }

        fn genesis_open(&mut self, now: i64) -> Result<()> {
            let epoch = self.market.next_epoch();
            let mut round = self.take(epoch);
            let res = open_genesis_round(&mut self.market, self.key, &mut round, now);
            self.put(round);
            res
        }

        fn genesis_lock(&mut self, price: i64, now: i64) -> Result<()> {
            let reading = self.reading(price, now);
            let current_epoch = self.market.current_epoch;
            let mut current = self.take(current_epoch);
            let mut next = Round::default();
            let res = lock_genesis_round(&mut self.market, self.key, &mut current, &mut next, &reading, now);
            self.put(current);
            self.put(next);
            res
        }

        fn advance(&mut self, price: i64, now: i64) -> Result<Tick> {
            let reading = self.reading(price, now);
            self.advance_with(&reading, now)
        }

        fn advance_with(&mut self, reading: &OracleReading, now: i64) -> Result<Tick> {
            let current_epoch = self.market.current_epoch;
            let mut locking = self.take(current_epoch);
            let mut closing = self.take(current_epoch.saturating_sub(1));
            let mut next = Round::default();
            let res = advance_market(
                &mut self.market,
                self.key,
                &mut locking,
                &mut closing,
                &mut next,
                reading,
                now,
            );
            self.put(locking);
            self.put(closing);
            self.put(next);
            res
        }

        fn unresolved(&self) -> usize {
            self.rounds.values().filter(|r| !r.resolved).count()
        }
    }

    #[test]
    fn genesis_sequence_matches_schedule() {
        let mut book = Book::new();
        book.genesis_open(0).unwrap();

        let r1 = &book.rounds[&1];
        assert_eq!((r1.start_time, r1.lock_time, r1.close_time), (0, 300, 600));
        assert_eq!(book.market.current_epoch, 1);
        assert_eq!(r1.phase(10, BUFFER), RoundPhase::Open);

        book.genesis_lock(1_000, 305).unwrap();

        let r1 = &book.rounds[&1];
        assert_eq!(r1.lock_price, 1_000);
        assert!(r1.locked() && !r1.resolved);
        let r2 = &book.rounds[&2];
        assert_eq!((r2.start_time, r2.lock_time, r2.close_time), (305, 605, 905));
        assert_eq!(book.market.current_epoch, 2);
        assert_eq!(book.market.oracle_latest_round_id, 1);
    }

    #[test]
    fn genesis_steps_are_one_shot_and_ordered() {
        let mut book = Book::new();
        assert_err(book.genesis_lock(1, 300), PredictionError::GenesisOpenNotDone);
        assert_err(book.advance(1, 300), PredictionError::GenesisLockNotDone);

        book.genesis_open(0).unwrap();
        assert_err(book.genesis_open(1), PredictionError::GenesisOpenAlreadyDone);
        assert_err(book.advance(1, 300), PredictionError::GenesisLockNotDone);

        book.genesis_lock(1, 300).unwrap();
        assert_err(book.genesis_lock(1, 301), PredictionError::GenesisLockAlreadyDone);
    }

    #[test]
    fn genesis_lock_respects_window() {
        let mut book = Book::new();
        book.genesis_open(0).unwrap();

        assert_err(book.genesis_lock(1, 299), PredictionError::LockTooEarly);
        assert_err(book.genesis_lock(1, 331), PredictionError::LockBufferExceeded);
        assert!(!book.market.genesis_lock_done);
        assert!(!book.rounds[&1].locked());
        assert_eq!(book.market.current_epoch, 1);

        book.genesis_lock(1, 330).unwrap();
    }

    #[test]
    fn advance_shares_boundary_price_and_settles() {
        let mut book = Book::new();
        book.genesis_open(0).unwrap();
        book.genesis_lock(100, 305).unwrap();

        let tick = book.advance(120, 610).unwrap();
        assert_eq!(
            tick,
            Tick { locked_epoch: 2, closed_epoch: 1, opened_epoch: 3, treasury: 0 }
        );

        let r1 = &book.rounds[&1];
        let r2 = &book.rounds[&2];
        let r3 = &book.rounds[&3];
        assert!(r1.resolved && r1.settled);
        assert_eq!(r1.close_price, 120);
        assert_eq!(r2.lock_price, 120);
        assert_eq!(r1.close_oracle_id, r2.lock_oracle_id);
        assert_eq!((r3.start_time, r3.lock_time, r3.close_time), (610, 910, 1210));
        assert_eq!(book.market.current_epoch, 3);
    }

    #[test]
    fn window_arithmetic_holds_for_every_round() {
        let mut book = Book::new();
        book.genesis_open(0).unwrap();
        book.genesis_lock(100, 300).unwrap();
        let mut now = 600;
        for i in 0..20 {
            book.advance(100 + i, now).unwrap();
            now += INTERVAL + 7;
        }
        for r in book.rounds.values() {
            assert!(r.start_time < r.lock_time && r.lock_time < r.close_time);
            assert_eq!(r.lock_time - r.start_time, INTERVAL);
            assert_eq!(r.close_time - r.lock_time, INTERVAL);
        }
    }

    #[test]
    fn sliding_window_keeps_two_rounds_unresolved() {
        let mut book = Book::new();
        book.genesis_open(0).unwrap();
        book.genesis_lock(100, 300).unwrap();
        assert_eq!(book.rounds.len(), 2);

        let mut now = 600;
        for n in 1..=25u64 {
            book.advance(100, now).unwrap();
            assert_eq!(book.rounds.len() as u64, n + 2);
            assert!(book.unresolved() <= 2);
            // each tick resolves the round two epochs behind the one it opens
            let opened = book.market.current_epoch;
            assert!(book.rounds[&(opened - 2)].resolved);
            assert!(!book.rounds[&(opened - 1)].resolved);
            now += INTERVAL;
        }
    }

    #[test]
    fn oracle_failure_leaves_state_untouched() {
        let mut book = Book::new();
        book.genesis_open(0).unwrap();
        book.genesis_lock(100, 305).unwrap();
        let before_market = book.market.clone();
        let before_r1 = book.rounds[&1].clone();

        let replay = OracleReading { round_id: 1, price: 50, updated_at: 610 };
        assert_err(book.advance_with(&replay, 610), PredictionError::OracleRoundNotAdvanced);

        let future = OracleReading { round_id: 9, price: 50, updated_at: 610 + 301 };
        assert_err(book.advance_with(&future, 610), PredictionError::OracleUpdateBeyondAllowance);

        assert_eq!(book.market.oracle_latest_round_id, before_market.oracle_latest_round_id);
        assert_eq!(book.market.current_epoch, before_market.current_epoch);
        assert!(!book.rounds[&1].resolved);
        assert_eq!(book.rounds[&1].close_price, before_r1.close_price);
        assert!(!book.rounds[&2].locked());
        assert!(!book.rounds.contains_key(&3));

        // the operator re-issues the tick with a good reading
        book.advance(50, 610).unwrap();
        assert_eq!(book.market.oracle_latest_round_id, 2);
    }

    #[test]
    fn late_tick_fails_and_round_expires() {
        let mut book = Book::new();
        book.genesis_open(0).unwrap();
        book.genesis_lock(100, 305).unwrap();

        // round 1 closes in [600, 630], round 2 locks in [605, 635]
        assert_err(book.advance(100, 631), PredictionError::CloseBufferExceeded);
        assert_err(book.advance(100, 604), PredictionError::LockTooEarly);
        assert_eq!(book.rounds[&1].phase(631, BUFFER), RoundPhase::Expired);
        assert_eq!(book.market.current_epoch, 2);
    }

    #[test]
    fn pause_resets_genesis_and_replay_opens_next_epoch() {
        let mut book = Book::new();
        book.genesis_open(0).unwrap();
        book.genesis_lock(100, 305).unwrap();
        book.advance(100, 610).unwrap();

        pause_market(&mut book.market).unwrap();
        assert_err(pause_market(&mut book.market), PredictionError::Paused);
        assert!(!book.market.genesis_open_done && !book.market.genesis_lock_done);
        assert_err(book.advance(100, 910), PredictionError::Paused);
        assert_err(book.genesis_open(2000), PredictionError::Paused);

        unpause_market(&mut book.market).unwrap();
        assert_err(unpause_market(&mut book.market), PredictionError::NotPaused);

        book.genesis_open(5_000).unwrap();
        assert_eq!(book.market.current_epoch, 4);
        book.genesis_lock(100, 5_300).unwrap();
        assert_eq!(book.market.current_epoch, 5);
        book.advance(100, 5_600).unwrap();

        // rounds abandoned by the pause are past their buffer and stay unresolved
        assert_eq!(book.rounds[&2].phase(5_600, BUFFER), RoundPhase::Expired);
        assert_eq!(book.rounds[&3].phase(5_600, BUFFER), RoundPhase::Expired);
        assert!(book.rounds[&4].resolved);
    }

    #[test]
    fn open_requires_two_back_closed() {
        let two_back = Round { start_time: 0, lock_time: 300, close_time: 600, ..Default::default() };
        assert_err(check_openable(&two_back, 599), PredictionError::PreviousRoundNotClosed);
        assert!(check_openable(&two_back, 600).is_ok());
        assert_err(check_openable(&Round::default(), 600), PredictionError::PreviousRoundNotClosed);
    }

    #[test]
    fn close_requires_lock_first() {
        let round = Round { start_time: 0, lock_time: 300, close_time: 600, ..Default::default() };
        assert_err(check_closable(&round, 600, BUFFER), PredictionError::RoundNotLocked);
    }
}
