//! Share-based reward ledger.
//!
//! Each pool carries two per-share accumulators (token, native) scaled by
//! `SHARE_BASE`. A portfolio's pending reward for a stream is
//! `accumulated_value * acc / SHARE_BASE - debt + owner_bucket`; settling
//! snapshots the product into the debt. Balance changes always settle first
//! and flatten the debt right after the mutation, so no reward accrues or
//! vanishes across a deposit or withdrawal.

use anchor_lang::prelude::*;

use crate::{
    constants::{DROP_OWNER_SHARE_PCT, DROP_POOL_SHARE_PCT, SHARE_BASE},
    errors::RewardsError,
    state::{Pool, Portfolio, RewardKind},
};

/// Amounts owed on both streams.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rewards {
    pub token: u64,
    pub native: u64,
}

impl Rewards {
    pub fn get(&self, kind: RewardKind) -> u64 {
        match kind {
            RewardKind::Token => self.token,
            RewardKind::Native => self.native,
        }
    }

    pub fn checked_add(self, other: Rewards) -> Result<Rewards> {
        Ok(Rewards {
            token: self
                .token
                .checked_add(other.token)
                .ok_or_else(|| error!(RewardsError::MathOverflow))?,
            native: self
                .native
                .checked_add(other.native)
                .ok_or_else(|| error!(RewardsError::MathOverflow))?,
        })
    }
}

/// How a drop was divided between the pool accumulator and the owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropSplit {
    pub pool_share: u64,
    pub owner_bonus: u64,
    /// Owner bonus plus the part of `pool_share` the accumulator can pay out
    /// after truncation.
    pub payable: u64,
}

fn accrued(value: u64, acc_per_share: u128) -> Result<u128> {
    let product = (value as u128)
        .checked_mul(acc_per_share)
        .ok_or_else(|| error!(RewardsError::MathOverflow))?;
    Ok(product / SHARE_BASE)
}

fn acc_per_share(pool: &Pool, kind: RewardKind) -> u128 {
    match kind {
        RewardKind::Token => pool.acc_token_per_share,
        RewardKind::Native => pool.acc_native_per_share,
    }
}

fn debt_and_bucket(portfolio: &mut Portfolio, kind: RewardKind) -> (&mut u128, &mut u64) {
    match kind {
        RewardKind::Token => (
            &mut portfolio.token_reward_debt,
            &mut portfolio.pending_owner_token_reward,
        ),
        RewardKind::Native => (
            &mut portfolio.native_reward_debt,
            &mut portfolio.pending_owner_native_reward,
        ),
    }
}

fn stream_pending(pool: &Pool, portfolio: &Portfolio, kind: RewardKind) -> Result<u64> {
    if portfolio.accumulated_value == 0 {
        return Ok(0);
    }

    let (debt, bucket) = match kind {
        RewardKind::Token => (
            portfolio.token_reward_debt,
            portfolio.pending_owner_token_reward,
        ),
        RewardKind::Native => (
            portfolio.native_reward_debt,
            portfolio.pending_owner_native_reward,
        ),
    };

    let share = accrued(portfolio.accumulated_value, acc_per_share(pool, kind))?
        .checked_sub(debt)
        .ok_or_else(|| error!(RewardsError::MathOverflow))?;
    let total = share
        .checked_add(bucket as u128)
        .ok_or_else(|| error!(RewardsError::MathOverflow))?;

    u64::try_from(total).map_err(|_| error!(RewardsError::MathOverflow))
}

/// Read-only projection of what `settle` would pay.
pub fn pending(pool: &Pool, portfolio: &Portfolio) -> Result<Rewards> {
    Ok(Rewards {
        token: stream_pending(pool, portfolio, RewardKind::Token)?,
        native: stream_pending(pool, portfolio, RewardKind::Native)?,
    })
}

/// Settles one stream: returns the amount owed, snapshots the debt and
/// empties the owner bucket. Zero stake is a no-op (owner bucket retained).
pub fn settle_stream(pool: &Pool, portfolio: &mut Portfolio, kind: RewardKind) -> Result<u64> {
    if portfolio.accumulated_value == 0 {
        return Ok(0);
    }

    let amount = stream_pending(pool, portfolio, kind)?;
    let current = accrued(portfolio.accumulated_value, acc_per_share(pool, kind))?;

    let (debt, bucket) = debt_and_bucket(portfolio, kind);
    *debt = current;
    *bucket = 0;

    Ok(amount)
}

pub fn settle(pool: &Pool, portfolio: &mut Portfolio) -> Result<Rewards> {
    Ok(Rewards {
        token: settle_stream(pool, portfolio, RewardKind::Token)?,
        native: settle_stream(pool, portfolio, RewardKind::Native)?,
    })
}

fn flatten_debts(pool: &Pool, portfolio: &mut Portfolio) -> Result<()> {
    portfolio.token_reward_debt = accrued(portfolio.accumulated_value, pool.acc_token_per_share)?;
    portfolio.native_reward_debt = accrued(portfolio.accumulated_value, pool.acc_native_per_share)?;
    Ok(())
}

/// Caller must have settled the portfolio beforehand.
pub fn increase(pool: &mut Pool, portfolio: &mut Portfolio, amount: u64) -> Result<()> {
    portfolio.accumulated_value = portfolio
        .accumulated_value
        .checked_add(amount)
        .ok_or_else(|| error!(RewardsError::MathOverflow))?;
    pool.total_value = pool
        .total_value
        .checked_add(amount)
        .ok_or_else(|| error!(RewardsError::MathOverflow))?;

    flatten_debts(pool, portfolio)
}

/// Caller must have settled the portfolio beforehand.
pub fn decrease(pool: &mut Pool, portfolio: &mut Portfolio, amount: u64) -> Result<()> {
    portfolio.accumulated_value = portfolio
        .accumulated_value
        .checked_sub(amount)
        .ok_or_else(|| error!(RewardsError::StakeUnderflow))?;
    pool.total_value = pool
        .total_value
        .checked_sub(amount)
        .ok_or_else(|| error!(RewardsError::StakeUnderflow))?;

    flatten_debts(pool, portfolio)
}

pub fn split_drop(amount: u64) -> DropSplit {
    // both factors < 100, so the u128 products cannot overflow
    let pool_share = (amount as u128 * DROP_POOL_SHARE_PCT as u128 / 100) as u64;
    let owner_bonus = (amount as u128 * DROP_OWNER_SHARE_PCT as u128 / 100) as u64;
    DropSplit {
        pool_share,
        owner_bonus,
        payable: pool_share + owner_bonus,
    }
}

/// Applies a drop of `amount` to `pool`: 80% into the per-share accumulator,
/// 20% into the bucket of `owner_portfolio` (the pool entity's current owner).
/// Pools without value receive nothing.
pub fn credit_drop(
    pool: &mut Pool,
    owner_portfolio: &mut Portfolio,
    amount: u64,
    kind: RewardKind,
) -> Result<DropSplit> {
    if pool.total_value == 0 || amount == 0 {
        return Ok(DropSplit::default());
    }

    let mut split = split_drop(amount);
    let delta = (split.pool_share as u128)
        .checked_mul(SHARE_BASE)
        .ok_or_else(|| error!(RewardsError::MathOverflow))?
        / pool.total_value as u128;
    // delta * total_value / SHARE_BASE <= pool_share
    split.payable = accrued(pool.total_value, delta)? as u64 + split.owner_bonus;

    let (acc, bucket) = match kind {
        RewardKind::Token => (
            &mut pool.acc_token_per_share,
            &mut owner_portfolio.pending_owner_token_reward,
        ),
        RewardKind::Native => (
            &mut pool.acc_native_per_share,
            &mut owner_portfolio.pending_owner_native_reward,
        ),
    };

    *acc = acc
        .checked_add(delta)
        .ok_or_else(|| error!(RewardsError::MathOverflow))?;
    *bucket = bucket
        .checked_add(split.owner_bonus)
        .ok_or_else(|| error!(RewardsError::MathOverflow))?;

    Ok(split)
}
