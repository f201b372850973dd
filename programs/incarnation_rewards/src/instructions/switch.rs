use anchor_lang::prelude::*;

use crate::{
    constants::{BPS_DENOMINATOR, SWITCH_FEE_BPS},
    errors::RewardsError,
    instructions::deposit::{init_pool, init_portfolio, stake, unstake},
    instructions::payout::{settle_streams, ClaimMode, Payout},
    ledger::Rewards,
    state::{Leaderboard, Pool, Portfolio},
    utils::require_top_level,
    SwitchPool,
};

/// Splits a moved amount into `(credited, fee)`.
pub fn switch_split(amount: u64) -> (u64, u64) {
    let fee = (amount as u128 * SWITCH_FEE_BPS as u128 / BPS_DENOMINATOR as u128) as u64;
    (amount - fee, fee)
}

/// Takes `amount` out of the source portfolio and stakes it minus the switch
/// fee in the destination. Both portfolios must already be settled.
pub(crate) fn move_value(
    from_pool: &mut Pool,
    from_portfolio: &mut Portfolio,
    to_pool: &mut Pool,
    to_portfolio: &mut Portfolio,
    leaderboard: &mut Leaderboard,
    amount: u64,
    now: i64,
) -> Result<(u64, u64)> {
    let (credited, fee) = switch_split(amount);
    unstake(from_pool, from_portfolio, leaderboard, amount, now)?;
    stake(to_pool, to_portfolio, leaderboard, credited, now)?;
    Ok((credited, fee))
}

/// Moves `amount` of locked value from one pool to another. Both pools are
/// settled and paid first; the destination is credited 95% of the amount.
pub fn switch_pool(
    ctx: Context<SwitchPool>,
    from_pool_id: u64,
    to_pool_id: u64,
    amount: u64,
) -> Result<()> {
    require_top_level()?;
    require!(from_pool_id != 0 && to_pool_id != 0, RewardsError::InvalidPoolId);
    require!(from_pool_id != to_pool_id, RewardsError::InvalidPoolId);
    require!(amount > 0, RewardsError::InsufficientValue);

    let cfg = &ctx.accounts.config;
    let season = cfg.season;
    let now = Clock::get()?.unix_timestamp;
    let user = ctx.accounts.user.key();

    init_pool(&mut ctx.accounts.to_pool, ctx.bumps.to_pool, season, to_pool_id);
    init_portfolio(&mut ctx.accounts.to_portfolio, ctx.bumps.to_portfolio, season, user, to_pool_id);

    let payout = Payout {
        config: cfg.to_account_info(),
        config_bump: cfg.bump,
        native_vault: ctx.accounts.native_vault.to_account_info(),
        native_vault_bump: cfg.native_vault_bump,
        token_mint: ctx.accounts.token_mint.to_account_info(),
        token_program: ctx.accounts.token_program.to_account_info(),
        system_program: ctx.accounts.system_program.to_account_info(),
    };
    let user_info = ctx.accounts.user.to_account_info();
    let user_token_account = ctx
        .accounts
        .user_token_account
        .as_ref()
        .map(|a| a.to_account_info());

    // settle both sides before any value moves
    let from_rewards = settle_streams(
        &ctx.accounts.from_pool,
        &mut ctx.accounts.from_portfolio,
        ClaimMode::Both,
        user,
    )?;
    let to_rewards = settle_streams(
        &ctx.accounts.to_pool,
        &mut ctx.accounts.to_portfolio,
        ClaimMode::Both,
        user,
    )?;
    let rewards: Rewards = from_rewards.checked_add(to_rewards)?;
    payout.pay(&mut ctx.accounts.airdrop, &user_info, user_token_account.as_ref(), rewards)?;

    let (_, fee) = move_value(
        &mut ctx.accounts.from_pool,
        &mut ctx.accounts.from_portfolio,
        &mut ctx.accounts.to_pool,
        &mut ctx.accounts.to_portfolio,
        &mut ctx.accounts.leaderboard,
        amount,
        now,
    )?;

    // fee stays in the native vault unless a sink is configured
    if cfg.burn_sink != Pubkey::default() && fee > 0 {
        let sink = ctx
            .accounts
            .burn_sink
            .as_ref()
            .ok_or(RewardsError::PdaMismatch)?;
        require_keys_eq!(sink.key(), cfg.burn_sink, RewardsError::PdaMismatch);

        payout.native(&sink.to_account_info(), fee)?;
    }

    msg!(
        "switch: {} from pool {} to pool {} (fee {})",
        amount,
        from_pool_id,
        to_pool_id,
        fee
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger;
    use crate::state::{RankedView, RewardKind};

    fn portfolio(pool_id: u64, owner: Pubkey) -> Portfolio {
        let mut pf = Portfolio::default();
        init_portfolio(&mut pf, 255, 1, owner, pool_id);
        pf
    }

    fn sum(portfolios: &[&Portfolio]) -> u64 {
        portfolios.iter().map(|p| p.accumulated_value).sum()
    }

    #[test]
    fn switch_keeps_pool_totals_consistent() {
        let user = Pubkey::new_unique();
        let mut lb = Leaderboard {
            season: 1,
            bump: 255,
            by_value: RankedView::default(),
            by_score: RankedView::default(),
        };

        let mut from = Pool::default();
        init_pool(&mut from, 255, 1, 3);
        let mut to = Pool::default();
        init_pool(&mut to, 255, 1, 4);

        let mut user_from = portfolio(3, user);
        let mut user_to = portfolio(4, user);
        let mut other_from = portfolio(3, Pubkey::new_unique());
        let mut other_to = portfolio(4, Pubkey::new_unique());
        let mut owner = portfolio(3, Pubkey::new_unique());

        stake(&mut from, &mut user_from, &mut lb, 1_000, 1).unwrap();
        stake(&mut from, &mut other_from, &mut lb, 3_000, 1).unwrap();
        stake(&mut to, &mut other_to, &mut lb, 500, 1).unwrap();
        ledger::credit_drop(&mut from, &mut owner, 4_000, RewardKind::Token).unwrap();

        let paid_from = settle_streams(&from, &mut user_from, ClaimMode::Both, user).unwrap();
        let paid_to = settle_streams(&to, &mut user_to, ClaimMode::Both, user).unwrap();
        assert_eq!(paid_from.token, 800);
        assert_eq!(paid_to, Rewards::default());

        let (credited, fee) = move_value(
            &mut from,
            &mut user_from,
            &mut to,
            &mut user_to,
            &mut lb,
            400,
            2,
        )
        .unwrap();

        assert_eq!((credited, fee), (380, 20));
        assert_eq!(from.total_value, sum(&[&user_from, &other_from]));
        assert_eq!(to.total_value, sum(&[&user_to, &other_to]));
        assert_eq!(from.total_value + to.total_value + fee, 4_500);

        assert_eq!(lb.by_value.score_of(3), Some(3_600));
        assert_eq!(lb.by_value.score_of(4), Some(880));

        // nothing is created or lost by the move
        assert_eq!(ledger::pending(&from, &user_from).unwrap(), Rewards::default());
        assert_eq!(ledger::pending(&to, &user_to).unwrap(), Rewards::default());
        assert_eq!(ledger::pending(&from, &other_from).unwrap().token, 2_400);
    }

    #[test]
    fn switch_beyond_stake_fails() {
        let mut lb = Leaderboard {
            season: 1,
            bump: 255,
            by_value: RankedView::default(),
            by_score: RankedView::default(),
        };
        let mut from = Pool::default();
        init_pool(&mut from, 255, 1, 3);
        let mut to = Pool::default();
        init_pool(&mut to, 255, 1, 4);
        let user = Pubkey::new_unique();
        let mut user_from = portfolio(3, user);
        let mut user_to = portfolio(4, user);
        stake(&mut from, &mut user_from, &mut lb, 100, 1).unwrap();

        assert!(move_value(&mut from, &mut user_from, &mut to, &mut user_to, &mut lb, 101, 2).is_err());
        assert_eq!(to.total_value, 0);
    }

    #[test]
    fn destination_receives_ninety_five_percent() {
        assert_eq!(switch_split(1_000), (950, 50));
        assert_eq!(switch_split(0), (0, 0));
    }

    #[test]
    fn fee_rounds_down() {
        // 5% of 19 is 0.95
        assert_eq!(switch_split(19), (19, 0));
        assert_eq!(switch_split(21), (20, 1));
    }

    #[test]
    fn split_preserves_amount() {
        for amount in [1u64, 7, 999, 123_456_789, u64::MAX] {
            let (credited, fee) = switch_split(amount);
            assert_eq!(credited + fee, amount);
        }
    }
}
