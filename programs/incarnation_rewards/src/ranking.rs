//! Bounded leaderboard answering "top N" and "N from offset" over pool ids.
//!
//! Each view stores up to `RANK_STORE_CAPACITY` entries in descending score
//! order. Ties keep the earlier entry ahead. A pool whose score drops to zero
//! leaves the view. Pools pushed out of a full view are no longer tracked;
//! `untracked_max` bounds their scores, and only the prefix of entries at or
//! above that bound is served by `top`/`range`.

use crate::{
    constants::RANK_STORE_CAPACITY,
    state::{Leaderboard, RankEntry, RankedView},
};

impl RankedView {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn score_of(&self, pool_id: u64) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.pool_id == pool_id)
            .map(|e| e.score)
    }

    /// Insert-or-update. Id 0 is the sentinel and never stored.
    pub fn upsert(&mut self, pool_id: u64, score: u64) {
        if pool_id == 0 {
            return;
        }

        if let Some(pos) = self.entries.iter().position(|e| e.pool_id == pool_id) {
            self.entries.remove(pos);
        }
        if score == 0 {
            return;
        }

        let at = self
            .entries
            .iter()
            .position(|e| e.score < score)
            .unwrap_or(self.entries.len());
        if at >= RANK_STORE_CAPACITY {
            self.untracked_max = self.untracked_max.max(score);
            return;
        }

        self.entries.insert(at, RankEntry { pool_id, score });
        if self.entries.len() > RANK_STORE_CAPACITY {
            if let Some(evicted) = self.entries.pop() {
                self.untracked_max = self.untracked_max.max(evicted.score);
            }
        }
    }

    /// Leading entries known to outrank every untracked pool.
    pub fn exact_len(&self) -> usize {
        self.entries
            .iter()
            .position(|e| e.score < self.untracked_max)
            .unwrap_or(self.entries.len())
    }

    pub fn top(&self, n: usize) -> Vec<RankEntry> {
        self.range(0, n)
    }

    /// Up to `n` entries starting at rank `offset` (0-based). Ranks past
    /// `exact_len` are never returned.
    pub fn range(&self, offset: usize, n: usize) -> Vec<RankEntry> {
        self.entries[..self.exact_len()]
            .iter()
            .skip(offset)
            .take(n)
            .copied()
            .collect()
    }
}

impl Leaderboard {
    pub fn record_value(&mut self, pool_id: u64, total_value: u64) {
        self.by_value.upsert(pool_id, total_value);
    }

    pub fn record_score(&mut self, pool_id: u64, score: u64) {
        self.by_score.upsert(pool_id, score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RANK_CAPACITY;

    fn ids(entries: &[RankEntry]) -> Vec<u64> {
        entries.iter().map(|e| e.pool_id).collect()
    }

    #[test]
    fn keeps_descending_order() {
        let mut v = RankedView::default();
        v.upsert(1, 50);
        v.upsert(2, 500);
        v.upsert(3, 5);
        v.upsert(4, 120);

        assert_eq!(ids(&v.top(10)), vec![2, 4, 1, 3]);
        assert_eq!(ids(&v.range(1, 2)), vec![4, 1]);
        assert!(v.range(9, 3).is_empty());
    }

    #[test]
    fn update_moves_entry_and_zero_removes_it() {
        let mut v = RankedView::default();
        v.upsert(1, 10);
        v.upsert(2, 20);
        v.upsert(1, 30);
        assert_eq!(ids(&v.top(2)), vec![1, 2]);
        assert_eq!(v.score_of(1), Some(30));

        v.upsert(1, 0);
        assert_eq!(ids(&v.top(5)), vec![2]);
        assert_eq!(v.score_of(1), None);
    }

    #[test]
    fn ties_keep_earlier_entry_first() {
        let mut v = RankedView::default();
        v.upsert(7, 100);
        v.upsert(8, 100);
        assert_eq!(ids(&v.top(2)), vec![7, 8]);
    }

    #[test]
    fn sentinel_id_is_never_stored() {
        let mut v = RankedView::default();
        v.upsert(0, 1_000);
        assert!(v.is_empty());
    }

    #[test]
    fn capacity_is_bounded() {
        let mut v = RankedView::default();
        for id in 1..=(RANK_STORE_CAPACITY as u64 + 20) {
            v.upsert(id, id * 10);
        }
        assert_eq!(v.len(), RANK_STORE_CAPACITY);
        assert_eq!(v.top(1)[0].pool_id, RANK_STORE_CAPACITY as u64 + 20);
        // ids 1..=20 were pushed out
        assert_eq!(v.untracked_max, 200);

        // below the last entry of a full view: not tracked
        v.upsert(999, 1);
        assert_eq!(v.score_of(999), None);
        assert_eq!(v.len(), RANK_STORE_CAPACITY);
    }

    #[test]
    fn shrinking_pool_gives_its_rank_to_the_next_largest() {
        let mut v = RankedView::default();
        for id in 1..=RANK_CAPACITY as u64 {
            v.upsert(id, 1_000 + id);
        }
        v.upsert(200, 500);
        v.upsert(50, 10);

        let top = ids(&v.top(RANK_CAPACITY));
        assert_eq!(top.len(), RANK_CAPACITY);
        assert!(top.contains(&200));
        assert!(!top.contains(&50));
        assert_eq!(top[RANK_CAPACITY - 1], 200);
    }

    #[test]
    fn ranks_below_an_evicted_score_are_not_served() {
        let mut v = RankedView::default();
        for id in 1..=(RANK_STORE_CAPACITY as u64 + 1) {
            v.upsert(id, 100 + id);
        }
        // pool 1 (score 101) fell off the store
        assert_eq!(v.score_of(1), None);
        assert_eq!(v.exact_len(), RANK_STORE_CAPACITY);

        // pools shrinking below 101 can no longer be ordered against pool 1
        v.upsert(10, 5);
        v.upsert(11, 6);
        assert_eq!(v.exact_len(), RANK_STORE_CAPACITY - 2);
        let all = ids(&v.range(0, RANK_STORE_CAPACITY));
        assert!(!all.contains(&10) && !all.contains(&11));
        assert_eq!(v.score_of(10), Some(5));
    }

    #[test]
    fn leaderboard_views_are_independent() {
        let mut lb = Leaderboard {
            season: 1,
            bump: 255,
            by_value: RankedView::default(),
            by_score: RankedView::default(),
        };
        lb.record_value(1, 10);
        lb.record_score(2, 99);

        assert_eq!(ids(&lb.by_value.top(5)), vec![1]);
        assert_eq!(ids(&lb.by_score.top(5)), vec![2]);
    }
}
