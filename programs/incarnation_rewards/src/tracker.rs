//! Pending-request tracker: fulfilled randomness requests awaiting execution.
//!
//! Order is not preserved. Removal swaps the last element into the hole so
//! the periodic check only ever scans a short, bounded list.

use anchor_lang::prelude::*;

use crate::{
    constants::MAX_PENDING_REQUESTS,
    errors::RewardsError,
    state::{AirdropState, PendingRequest},
};

impl AirdropState {
    /// Idempotent: an id already tracked is left untouched.
    pub fn insert_pending(&mut self, entry: PendingRequest) -> Result<()> {
        if self.pending.iter().any(|p| p.request_id == entry.request_id) {
            return Ok(());
        }
        require!(self.pending.len() < MAX_PENDING_REQUESTS, RewardsError::TrackerFull);

        self.pending.push(entry);
        Ok(())
    }

    /// Returns whether the id was tracked.
    pub fn remove_pending(&mut self, request_id: u64) -> bool {
        match self.pending.iter().position(|p| p.request_id == request_id) {
            Some(i) => {
                self.pending.swap_remove(i);
                true
            }
            None => false,
        }
    }

    pub fn pending_at(&self, index: usize) -> Option<PendingRequest> {
        self.pending.get(index).copied()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AirdropConf, RewardKind};

    fn state() -> AirdropState {
        AirdropState {
            bump: 255,
            conf: AirdropConf::default(),
            next_request_id: 1,
            native_committed: 0,
            pending: Vec::new(),
            version: 1,
        }
    }

    fn req(id: u64) -> PendingRequest {
        PendingRequest { request_id: id, kind: RewardKind::Token }
    }

    #[test]
    fn insert_is_idempotent() {
        let mut s = state();
        s.insert_pending(req(4)).unwrap();
        s.insert_pending(req(4)).unwrap();
        assert_eq!(s.pending_len(), 1);
        assert_eq!(s.pending_at(0), Some(req(4)));
    }

    #[test]
    fn remove_swaps_last_into_place() {
        let mut s = state();
        for id in 1..=4 {
            s.insert_pending(req(id)).unwrap();
        }

        assert!(s.remove_pending(2));
        assert_eq!(s.pending_len(), 3);
        assert_eq!(s.pending_at(1), Some(req(4)));

        assert!(!s.remove_pending(2));
        assert_eq!(s.pending_at(3), None);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut s = state();
        for id in 0..MAX_PENDING_REQUESTS as u64 {
            s.insert_pending(req(id + 1)).unwrap();
        }
        assert!(s.insert_pending(req(10_000)).is_err());

        // re-inserting a tracked id still succeeds when full
        assert!(s.insert_pending(req(1)).is_ok());
    }
}
