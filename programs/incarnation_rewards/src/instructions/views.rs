use anchor_lang::prelude::*;

use crate::{
    constants::MAX_BATCH,
    errors::RewardsError,
    instructions::claim::referrers_of,
    ledger::{self, Rewards},
    referral::{compute_reward, ReferralReward},
    state::{Pool, Portfolio, RewardKind},
    utils::{pool_address, portfolio_address, read_account},
    GetPool, GetPortfolio, PendingRewardsView, ReferralView,
};

/// Up to two upstream referrers; `Pubkey::default()` marks an empty tier.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Referrers {
    pub ref1: Pubkey,
    pub ref2: Pubkey,
}

// remaining_accounts: [pool, portfolio] per pool id; missing accounts count as zero
pub fn pending_rewards<'info>(
    ctx: Context<'_, '_, 'info, 'info, PendingRewardsView<'info>>,
    owner: Pubkey,
    pool_ids: Vec<u64>,
) -> Result<Rewards> {
    require!(pool_ids.len() <= MAX_BATCH, RewardsError::TooManyEntries);
    require!(
        ctx.remaining_accounts.len() == pool_ids.len() * 2,
        RewardsError::PdaMismatch
    );

    let season = ctx.accounts.config.season;
    let mut total = Rewards::default();

    for (i, pool_id) in pool_ids.iter().copied().enumerate() {
        let pool_ai = &ctx.remaining_accounts[2 * i];
        let portfolio_ai = &ctx.remaining_accounts[2 * i + 1];

        let (expected_pool, _) = pool_address(ctx.program_id, season, pool_id);
        require_keys_eq!(pool_ai.key(), expected_pool, RewardsError::PdaMismatch);
        let (expected_portfolio, _) = portfolio_address(ctx.program_id, season, &owner, pool_id);
        require_keys_eq!(portfolio_ai.key(), expected_portfolio, RewardsError::PdaMismatch);

        if pool_ai.data_is_empty() || portfolio_ai.data_is_empty() {
            continue;
        }

        let pool: Pool = read_account(pool_ai, ctx.program_id)?;
        let portfolio: Portfolio = read_account(portfolio_ai, ctx.program_id)?;

        total = total.checked_add(ledger::pending(&pool, &portfolio)?)?;
    }

    Ok(total)
}

pub fn get_pool(ctx: Context<GetPool>, _season: u64, _pool_id: u64) -> Result<Pool> {
    Ok((*ctx.accounts.pool).clone())
}

pub fn get_portfolio(
    ctx: Context<GetPortfolio>,
    _season: u64,
    _owner: Pubkey,
    _pool_id: u64,
) -> Result<Portfolio> {
    Ok((*ctx.accounts.portfolio).clone())
}

pub fn get_referrers(ctx: Context<ReferralView>, account: Pubkey) -> Result<Referrers> {
    let (ref1, ref2) = referrers_of(
        ctx.program_id,
        account,
        &ctx.accounts.referral.to_account_info(),
        &ctx.accounts.upline_referral.to_account_info(),
    )?;
    Ok(Referrers { ref1, ref2 })
}

/// What the referrers of `account` would receive on a claim of `amount`.
pub fn preview_referral_reward(
    ctx: Context<ReferralView>,
    account: Pubkey,
    amount: u64,
    kind: RewardKind,
) -> Result<ReferralReward> {
    let (ref1, ref2) = referrers_of(
        ctx.program_id,
        account,
        &ctx.accounts.referral.to_account_info(),
        &ctx.accounts.upline_referral.to_account_info(),
    )?;
    compute_reward(ref1, ref2, amount, kind, &ctx.accounts.config.referral_fees)
}
