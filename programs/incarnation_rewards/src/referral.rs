//! Two-tier referral cascade.

use anchor_lang::prelude::*;

use crate::{
    constants::BPS_DENOMINATOR,
    errors::RewardsError,
    state::{ReferralRecord, ReferrerRewardFees, RewardKind},
};

/// Fees owed to the two upstream referrers of an account.
/// A tier without a referrer carries `Pubkey::default()` and zero.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReferralReward {
    pub tier1: Pubkey,
    pub tier1_reward: u64,
    pub tier2: Pubkey,
    pub tier2_reward: u64,
}

impl ReferralReward {
    pub fn is_empty(&self) -> bool {
        self.tier1_reward == 0 && self.tier2_reward == 0
    }

    pub fn total(&self) -> Result<u64> {
        self.tier1_reward
            .checked_add(self.tier2_reward)
            .ok_or_else(|| error!(RewardsError::MathOverflow))
    }
}

/// Sets the referrer of `record` once. Returns whether anything was written.
pub fn record_referrer(record: &mut ReferralRecord, account: Pubkey, referrer: Pubkey) -> bool {
    if record.referrer != Pubkey::default() {
        return false;
    }
    if referrer == Pubkey::default() || referrer == account {
        return false;
    }

    record.referrer = referrer;
    true
}

pub fn fee_bps(fees: &ReferrerRewardFees, tier: u8, kind: RewardKind) -> u16 {
    match (tier, kind) {
        (1, RewardKind::Native) => fees.tier1_native_bps,
        (1, RewardKind::Token) => fees.tier1_token_bps,
        (_, RewardKind::Native) => fees.tier2_native_bps,
        (_, RewardKind::Token) => fees.tier2_token_bps,
    }
}

/// Overwrites only the pair of rates for `kind`.
pub fn set_fees(fees: &mut ReferrerRewardFees, tier1_bps: u16, tier2_bps: u16, kind: RewardKind) -> Result<()> {
    require!(tier1_bps as u64 <= BPS_DENOMINATOR, RewardsError::InvalidBps);
    require!(tier2_bps as u64 <= BPS_DENOMINATOR, RewardsError::InvalidBps);

    match kind {
        RewardKind::Native => {
            fees.tier1_native_bps = tier1_bps;
            fees.tier2_native_bps = tier2_bps;
        }
        RewardKind::Token => {
            fees.tier1_token_bps = tier1_bps;
            fees.tier2_token_bps = tier2_bps;
        }
    }
    Ok(())
}

pub fn bps_of(amount: u64, bps: u16) -> Result<u64> {
    let v = (amount as u128)
        .checked_mul(bps as u128)
        .ok_or_else(|| error!(RewardsError::MathOverflow))?
        / BPS_DENOMINATOR as u128;
    u64::try_from(v).map_err(|_| error!(RewardsError::MathOverflow))
}

/// `ref1` is the account's referrer, `ref2` the referrer of `ref1`.
/// Nothing beyond the second hop is ever consulted.
pub fn compute_reward(
    ref1: Pubkey,
    ref2: Pubkey,
    amount: u64,
    kind: RewardKind,
    fees: &ReferrerRewardFees,
) -> Result<ReferralReward> {
    let mut out = ReferralReward::default();

    if ref1 == Pubkey::default() {
        return Ok(out);
    }
    out.tier1 = ref1;
    out.tier1_reward = bps_of(amount, fee_bps(fees, 1, kind))?;

    if ref2 != Pubkey::default() {
        out.tier2 = ref2;
        out.tier2_reward = bps_of(amount, fee_bps(fees, 2, kind))?;
    }

    Ok(out)
}

/// Resolves `(ref1, ref2)` from the account's record and, when present,
/// the record of its referrer. The upline record must belong to `ref1`.
pub fn resolve_referrers(
    record: Option<&ReferralRecord>,
    upline: Option<&ReferralRecord>,
) -> Result<(Pubkey, Pubkey)> {
    let ref1 = record.map(|r| r.referrer).unwrap_or_default();
    if ref1 == Pubkey::default() {
        return Ok((Pubkey::default(), Pubkey::default()));
    }

    let ref2 = match upline {
        Some(u) => {
            require_keys_eq!(u.account, ref1, RewardsError::ReferrerMismatch);
            u.referrer
        }
        None => Pubkey::default(),
    };

    Ok((ref1, ref2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(account: Pubkey) -> ReferralRecord {
        ReferralRecord {
            account,
            referrer: Pubkey::default(),
            bump: 255,
            recorded_at: 0,
        }
    }

    fn fees() -> ReferrerRewardFees {
        ReferrerRewardFees {
            tier1_native_bps: 800,
            tier2_native_bps: 200,
            tier1_token_bps: 500,
            tier2_token_bps: 100,
        }
    }

    #[test]
    fn referrer_is_recorded_once() {
        let account = Pubkey::new_unique();
        let first = Pubkey::new_unique();
        let mut r = record(account);

        assert!(record_referrer(&mut r, account, first));
        assert!(!record_referrer(&mut r, account, Pubkey::new_unique()));
        assert!(!record_referrer(&mut r, account, Pubkey::default()));
        assert_eq!(r.referrer, first);
    }

    #[test]
    fn null_and_self_referrers_are_ignored() {
        let account = Pubkey::new_unique();
        let mut r = record(account);

        assert!(!record_referrer(&mut r, account, Pubkey::default()));
        assert!(!record_referrer(&mut r, account, account));
        assert_eq!(r.referrer, Pubkey::default());
    }

    #[test]
    fn tier1_fee_truncates() {
        let ref1 = Pubkey::new_unique();
        let exact = compute_reward(ref1, Pubkey::default(), 1000, RewardKind::Native, &fees()).unwrap();
        assert_eq!(exact.tier1_reward, 80);

        let truncated = compute_reward(ref1, Pubkey::default(), 1001, RewardKind::Native, &fees()).unwrap();
        assert_eq!(truncated.tier1_reward, 80);
        assert_eq!(truncated.tier2, Pubkey::default());
        assert_eq!(truncated.tier2_reward, 0);
    }

    #[test]
    fn fee_table_is_selected_by_tier_and_kind() {
        let ref1 = Pubkey::new_unique();
        let ref2 = Pubkey::new_unique();

        let native = compute_reward(ref1, ref2, 10_000, RewardKind::Native, &fees()).unwrap();
        assert_eq!((native.tier1_reward, native.tier2_reward), (800, 200));

        let token = compute_reward(ref1, ref2, 10_000, RewardKind::Token, &fees()).unwrap();
        assert_eq!((token.tier1_reward, token.tier2_reward), (500, 100));
        assert_eq!(token.total().unwrap(), 600);
    }

    #[test]
    fn no_referrer_means_no_reward() {
        let out = compute_reward(Pubkey::default(), Pubkey::new_unique(), 5_000, RewardKind::Token, &fees()).unwrap();
        assert!(out.is_empty());
        assert_eq!(out, ReferralReward::default());
    }

    #[test]
    fn cascade_stops_after_two_hops() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let c = Pubkey::new_unique();
        let d = Pubkey::new_unique();

        let mut ra = record(a);
        let mut rb = record(b);
        let mut rc = record(c);
        record_referrer(&mut ra, a, b);
        record_referrer(&mut rb, b, c);
        record_referrer(&mut rc, c, d);

        let (ref1, ref2) = resolve_referrers(Some(&ra), Some(&rb)).unwrap();
        assert_eq!((ref1, ref2), (b, c));

        let out = compute_reward(ref1, ref2, 1_000, RewardKind::Native, &fees()).unwrap();
        assert_eq!(out.tier1, b);
        assert_eq!(out.tier2, c);
        assert_ne!(out.tier2, d);
    }

    #[test]
    fn upline_record_must_belong_to_tier1() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let mut ra = record(a);
        record_referrer(&mut ra, a, b);
        let stranger = record(Pubkey::new_unique());

        assert!(resolve_referrers(Some(&ra), Some(&stranger)).is_err());
        assert_eq!(resolve_referrers(Some(&ra), None).unwrap(), (b, Pubkey::default()));
        assert_eq!(
            resolve_referrers(None, None).unwrap(),
            (Pubkey::default(), Pubkey::default())
        );
    }

    #[test]
    fn set_fees_only_touches_one_kind() {
        let mut f = fees();
        set_fees(&mut f, 1_000, 300, RewardKind::Token).unwrap();
        assert_eq!(f.tier1_token_bps, 1_000);
        assert_eq!(f.tier2_token_bps, 300);
        assert_eq!(f.tier1_native_bps, 800);
        assert_eq!(f.tier2_native_bps, 200);

        assert!(set_fees(&mut f, 10_001, 0, RewardKind::Native).is_err());
        assert_eq!(f.tier1_native_bps, 800);
    }
}
