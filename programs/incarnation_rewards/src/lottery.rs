//! Airdrop lottery: interval gating, upkeep decisions and winner selection.
//!
//! Per stream: Idle -> RandomnessRequested -> AwaitingExecution -> Idle.
//! A request leaves Idle when `perform_upkeep` issues it, becomes
//! AwaitingExecution once the oracle fulfills it (tracked in
//! `AirdropState::pending`) and returns to Idle once every winner of its
//! drop has been credited, which may take several execute calls.

use std::ops::Range;

use anchor_lang::prelude::*;

use crate::{
    constants::{
        BPS_DENOMINATOR, DIRECT_WINNERS, MAX_DROP_CHUNK, MAX_NATIVE_DROP_RATIO_BPS,
        MAX_RAFFLE_WINNERS, RAFFLE_CANDIDATES, SECONDS_PER_HOUR,
    },
    errors::RewardsError,
    state::{AirdropConf, AirdropState, RankedView, RewardKind},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpkeepAction {
    None,
    RequestToken,
    RequestNative,
    ExecuteToken { request_id: u64 },
    ExecuteNative { request_id: u64 },
}

impl UpkeepAction {
    pub fn kind(&self) -> Option<RewardKind> {
        match self {
            UpkeepAction::None => None,
            UpkeepAction::RequestToken | UpkeepAction::ExecuteToken { .. } => Some(RewardKind::Token),
            UpkeepAction::RequestNative | UpkeepAction::ExecuteNative { .. } => Some(RewardKind::Native),
        }
    }

    pub fn execute(request_id: u64, kind: RewardKind) -> Self {
        match kind {
            RewardKind::Token => UpkeepAction::ExecuteToken { request_id },
            RewardKind::Native => UpkeepAction::ExecuteNative { request_id },
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub due: bool,
    pub action: UpkeepAction,
}

impl UpkeepCheck {
    fn idle() -> Self {
        UpkeepCheck { due: false, action: UpkeepAction::None }
    }

    fn due(action: UpkeepAction) -> Self {
        UpkeepCheck { due: true, action }
    }
}

/// Start of the hour containing `ts`.
pub fn hour_floor(ts: i64) -> i64 {
    ts - ts.rem_euclid(SECONDS_PER_HOUR)
}

pub fn is_due(last_update: i64, interval: i64, now: i64) -> bool {
    now > last_update.saturating_add(interval)
}

/// What the periodic trigger should do next. Fulfilled requests run first,
/// and a drop keeps the head of the tracker until its last chunk; otherwise the token stream is checked before the native stream and at
/// most one request is issued per poll.
pub fn check_upkeep(state: &AirdropState, now: i64) -> UpkeepCheck {
    let conf = &state.conf;
    if !conf.enabled {
        return UpkeepCheck::idle();
    }

    if let Some(p) = state.pending_at(0) {
        return UpkeepCheck::due(UpkeepAction::execute(p.request_id, p.kind));
    }

    if is_due(conf.token_last_update, conf.token_interval, now) {
        return UpkeepCheck::due(UpkeepAction::RequestToken);
    }
    if is_due(conf.native_last_update, conf.native_interval, now) {
        return UpkeepCheck::due(UpkeepAction::RequestNative);
    }

    UpkeepCheck::idle()
}

pub fn validate_conf(conf: &AirdropConf) -> Result<()> {
    require!(conf.token_interval > 0, RewardsError::InvalidInterval);
    require!(conf.native_interval > 0, RewardsError::InvalidInterval);
    require!(
        conf.native_ratio_bps as u64 <= MAX_NATIVE_DROP_RATIO_BPS,
        RewardsError::NativeRatioTooHigh
    );
    Ok(())
}

/// Records that a request for `kind` went out at `now`.
pub fn mark_requested(conf: &mut AirdropConf, kind: RewardKind, now: i64) {
    let floored = hour_floor(now);
    match kind {
        RewardKind::Token => conf.token_last_update = floored,
        RewardKind::Native => conf.native_last_update = floored,
    }
}

/// Raffle band slot chosen by each word; at most `MAX_RAFFLE_WINNERS` draws.
pub fn raffle_indices(words: &[u64]) -> Vec<usize> {
    words
        .iter()
        .take(MAX_RAFFLE_WINNERS)
        .map(|w| (w % RAFFLE_CANDIDATES as u64) as usize)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DropWinners {
    pub direct: Vec<u64>,
    pub raffle: Vec<u64>,
}

impl DropWinners {
    /// Direct winners followed by raffle winners, duplicates kept.
    pub fn all(&self) -> Vec<u64> {
        self.direct.iter().chain(self.raffle.iter()).copied().collect()
    }
}

/// Top `DIRECT_WINNERS` pools by value, plus one raffle pick per word from
/// ranks 11..=100. Empty raffle slots and zero-value pools are skipped.
pub fn select_winners(by_value: &RankedView, words: &[u64]) -> DropWinners {
    let mut winners = DropWinners::default();

    for e in by_value.top(DIRECT_WINNERS) {
        // descending order: nothing after a zero entry can be larger
        if e.pool_id == 0 || e.score == 0 {
            break;
        }
        winners.direct.push(e.pool_id);
    }

    let band = by_value.range(DIRECT_WINNERS, RAFFLE_CANDIDATES);
    for idx in raffle_indices(words) {
        match band.get(idx) {
            Some(e) if e.pool_id != 0 && e.score != 0 => winners.raffle.push(e.pool_id),
            _ => {}
        }
    }

    winners
}

/// Winners covered by an execute call that starts at `cursor` and carries
/// `accounts` remaining accounts (three per winner). A drop without winners
/// completes with an empty chunk.
pub fn drop_chunk(cursor: usize, winners: usize, accounts: usize) -> Result<Range<usize>> {
    require!(accounts % 3 == 0, RewardsError::WinnerAccountsMismatch);
    let n = accounts / 3;
    let left = winners.saturating_sub(cursor);

    require!(n <= left, RewardsError::InvalidDropChunk);
    require!(n <= MAX_DROP_CHUNK, RewardsError::InvalidDropChunk);
    require!(n > 0 || left == 0, RewardsError::InvalidDropChunk);

    Ok(cursor..cursor + n)
}

/// Takes up to `amount` from `budget`.
pub fn take_budget(budget: &mut u64, amount: u64) -> u64 {
    let taken = amount.min(*budget);
    *budget -= taken;
    taken
}

/// Native balance not already promised to stakers.
pub fn free_native_balance(lamports: u64, rent_minimum: u64, committed: u64) -> u64 {
    lamports.saturating_sub(rent_minimum).saturating_sub(committed)
}

/// Per-winner drop for an execution of `kind`.
pub fn drop_amount(conf: &AirdropConf, kind: RewardKind, free_native: u64) -> u64 {
    match kind {
        RewardKind::Token => conf.token_amount,
        RewardKind::Native => {
            (free_native as u128 * conf.native_ratio_bps as u128 / BPS_DENOMINATOR as u128) as u64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_DROP_WINNERS;
    use crate::state::PendingRequest;

    const HOUR: i64 = SECONDS_PER_HOUR;
    const DAY: i64 = 24 * HOUR;

    fn state(enabled: bool) -> AirdropState {
        AirdropState {
            bump: 255,
            conf: AirdropConf {
                enabled,
                token_interval: DAY,
                native_interval: 7 * DAY,
                token_last_update: 0,
                native_last_update: 0,
                native_ratio_bps: 50,
                token_amount: 100,
            },
            next_request_id: 1,
            native_committed: 0,
            pending: Vec::new(),
            version: 1,
        }
    }

    fn ranked(n: u64) -> RankedView {
        let mut v = RankedView::default();
        for id in 1..=n {
            v.upsert(id, 10_000 - id);
        }
        v
    }

    #[test]
    fn hour_floor_rounds_down() {
        assert_eq!(hour_floor(0), 0);
        assert_eq!(hour_floor(HOUR - 1), 0);
        assert_eq!(hour_floor(5 * HOUR + 17), 5 * HOUR);
    }

    #[test]
    fn disabled_lottery_is_never_due() {
        let s = state(false);
        assert_eq!(check_upkeep(&s, 100 * DAY), UpkeepCheck::idle());
    }

    #[test]
    fn token_stream_has_priority() {
        let s = state(true);
        let check = check_upkeep(&s, 30 * DAY);
        assert!(check.due);
        assert_eq!(check.action, UpkeepAction::RequestToken);
    }

    #[test]
    fn native_requested_when_token_not_due() {
        let mut s = state(true);
        mark_requested(&mut s.conf, RewardKind::Token, 30 * DAY);
        assert_eq!(check_upkeep(&s, 30 * DAY + 10).action, UpkeepAction::RequestNative);
    }

    #[test]
    fn interval_gates_repeat_requests() {
        let mut s = state(true);
        let start = 10 * DAY + 25 * 60;
        mark_requested(&mut s.conf, RewardKind::Token, start);
        mark_requested(&mut s.conf, RewardKind::Native, start);
        assert_eq!(s.conf.token_last_update, 10 * DAY);

        // polled every 400ms-ish slot for a day: nothing due until the interval elapses
        let mut t = start;
        while t <= 11 * DAY {
            assert!(!check_upkeep(&s, t).due, "due too early at {}", t);
            t += 37;
        }
        assert_eq!(check_upkeep(&s, 11 * DAY + 1).action, UpkeepAction::RequestToken);
    }

    #[test]
    fn fulfilled_requests_execute_first() {
        let mut s = state(true);
        s.insert_pending(PendingRequest { request_id: 9, kind: RewardKind::Native }).unwrap();

        let check = check_upkeep(&s, 30 * DAY);
        assert_eq!(check.action, UpkeepAction::ExecuteNative { request_id: 9 });
        assert_eq!(check.action.kind(), Some(RewardKind::Native));
    }

    #[test]
    fn raffle_indices_are_bounded() {
        let words: Vec<u64> = vec![0, 89, 90, 179, u64::MAX, 12_345, 7, 91, 1 << 40, 3];
        let idx = raffle_indices(&words);
        assert_eq!(idx.len(), 10);
        assert!(idx.iter().all(|i| *i < RAFFLE_CANDIDATES));
        assert_eq!(&idx[..4], &[0, 89, 0, 89]);
    }

    #[test]
    fn at_most_ten_draws() {
        let words: Vec<u64> = (0..25).collect();
        assert_eq!(raffle_indices(&words).len(), MAX_RAFFLE_WINNERS);
        assert_eq!(raffle_indices(&words[..3]).len(), 3);
    }

    #[test]
    fn winners_are_top_ten_plus_raffle_picks() {
        let board = ranked(100);
        let words = [0u64, 5, 89, 5];

        let w = select_winners(&board, &words);

        assert_eq!(w.direct, (1..=10).collect::<Vec<u64>>());
        // band slot i holds rank 11 + i, i.e. pool id 11 + i
        assert_eq!(w.raffle, vec![11, 16, 100, 16]);
        assert_eq!(w.all().len(), 14);
    }

    #[test]
    fn empty_raffle_slots_are_skipped() {
        let board = ranked(15);
        let w = select_winners(&board, &[2, 40, 4, 60]);

        assert_eq!(w.direct.len(), 10);
        assert_eq!(w.raffle, vec![13, 15]);
    }

    #[test]
    fn small_board_has_no_raffle() {
        let board = ranked(3);
        let w = select_winners(&board, &[1, 2, 3]);
        assert_eq!(w.direct, vec![1, 2, 3]);
        assert!(w.raffle.is_empty());
    }

    #[test]
    fn drop_amount_depends_on_stream() {
        let s = state(true);
        assert_eq!(drop_amount(&s.conf, RewardKind::Token, 0), 100);
        // 0.5% of 1 SOL
        assert_eq!(drop_amount(&s.conf, RewardKind::Native, 1_000_000_000), 5_000_000);
    }

    #[test]
    fn native_ratio_is_capped_for_a_full_drop() {
        let mut conf = state(true).conf;
        conf.native_ratio_bps = 1_000;
        assert!(validate_conf(&conf).is_err());

        conf.native_ratio_bps = MAX_NATIVE_DROP_RATIO_BPS as u16;
        assert!(validate_conf(&conf).is_ok());

        // twenty winners at the cap spend at most the free balance
        let free = 1_000_000;
        let per_winner = drop_amount(&conf, RewardKind::Native, free);
        assert_eq!(per_winner, 50_000);
        assert!(per_winner * MAX_DROP_WINNERS as u64 <= free);

        conf.token_interval = 0;
        assert!(validate_conf(&conf).is_err());
    }

    #[test]
    fn budget_bounds_total_native_credit() {
        // a ratio that slipped past validation still cannot overcommit
        let free = 1_000_000u64;
        let per_winner = free / 10;
        let mut budget = free;

        let total: u64 = (0..MAX_DROP_WINNERS)
            .map(|_| take_budget(&mut budget, per_winner))
            .sum();

        assert_eq!(total, free);
        assert_eq!(budget, 0);
        assert_eq!(take_budget(&mut budget, per_winner), 0);
    }

    #[test]
    fn drop_runs_in_chunks() {
        // 20 winners, six per call
        assert_eq!(drop_chunk(0, 20, 18).unwrap(), 0..6);
        assert_eq!(drop_chunk(6, 20, 18).unwrap(), 6..12);
        assert_eq!(drop_chunk(18, 20, 6).unwrap(), 18..20);

        // more winners than remain, more than a chunk, or a ragged list
        assert!(drop_chunk(18, 20, 9).is_err());
        assert!(drop_chunk(0, 20, 3 * (MAX_DROP_CHUNK + 1)).is_err());
        assert!(drop_chunk(0, 20, 4).is_err());

        // an empty call only completes a drop with nothing left
        assert!(drop_chunk(4, 20, 0).is_err());
        assert_eq!(drop_chunk(0, 0, 0).unwrap(), 0..0);
    }

    #[test]
    fn free_balance_excludes_rent_and_commitments() {
        assert_eq!(free_native_balance(10_000, 890, 1_000), 8_110);
        assert_eq!(free_native_balance(500, 890, 0), 0);
        assert_eq!(free_native_balance(5_000, 890, 10_000), 0);
    }
}
