use anchor_lang::prelude::*;

use crate::{
    constants::MAX_BATCH,
    errors::RewardsError,
    events::ReferralRewardPaid,
    instructions::payout::{settle_streams, ClaimMode, Payout},
    ledger::Rewards,
    referral::{compute_reward, resolve_referrers, ReferralReward},
    state::{Pool, Portfolio, ReferralRecord, RewardKind},
    utils::{
        pool_address, portfolio_address, read_account, require_top_level, write_account,
        REFERRAL_SEED,
    },
    ClaimRewards,
};

/// Reads a ReferralRecord PDA that may not have been created yet.
pub(crate) fn load_referral(ai: &AccountInfo, program_id: &Pubkey) -> Result<Option<ReferralRecord>> {
    if ai.data_is_empty() {
        return Ok(None);
    }
    read_account::<ReferralRecord>(ai, program_id).map(Some)
}

/// Resolves `(ref1, ref2)` for `account` from its record and the record
/// passed as the tier-1 upline.
pub(crate) fn referrers_of(
    program_id: &Pubkey,
    account: Pubkey,
    record_ai: &AccountInfo,
    upline_ai: &AccountInfo,
) -> Result<(Pubkey, Pubkey)> {
    let record = load_referral(record_ai, program_id)?;
    if let Some(r) = record.as_ref() {
        require_keys_eq!(r.account, account, RewardsError::ReferrerMismatch);
    }

    let ref1 = record.as_ref().map(|r| r.referrer).unwrap_or_default();
    if ref1 == Pubkey::default() {
        return Ok((Pubkey::default(), Pubkey::default()));
    }

    let (expected_upline, _) =
        Pubkey::find_program_address(&[REFERRAL_SEED, ref1.as_ref()], program_id);
    require_keys_eq!(upline_ai.key(), expected_upline, RewardsError::ReferrerMismatch);
    let upline = load_referral(upline_ai, program_id)?;

    resolve_referrers(record.as_ref(), upline.as_ref())
}

pub fn claim<'info>(
    ctx: Context<'_, '_, 'info, 'info, ClaimRewards<'info>>,
    pool_ids: Vec<u64>,
    mode: ClaimMode,
) -> Result<()> {
    require_top_level()?;
    require!(pool_ids.len() <= MAX_BATCH, RewardsError::TooManyEntries);
    require!(
        ctx.remaining_accounts.len() == pool_ids.len() * 2,
        RewardsError::PdaMismatch
    );

    let cfg = &ctx.accounts.config;
    let user = ctx.accounts.user.key();

    // --- settle every requested pool ---
    let mut total = Rewards::default();

    for (i, pool_id) in pool_ids.iter().copied().enumerate() {
        require!(pool_id != 0, RewardsError::InvalidPoolId);

        let pool_ai = &ctx.remaining_accounts[2 * i];
        let portfolio_ai = &ctx.remaining_accounts[2 * i + 1];

        let (expected_pool, _) = pool_address(ctx.program_id, cfg.season, pool_id);
        require_keys_eq!(pool_ai.key(), expected_pool, RewardsError::PdaMismatch);
        let (expected_portfolio, _) = portfolio_address(ctx.program_id, cfg.season, &user, pool_id);
        require_keys_eq!(portfolio_ai.key(), expected_portfolio, RewardsError::PdaMismatch);

        let pool: Pool = read_account(pool_ai, ctx.program_id)?;
        let mut portfolio: Portfolio = read_account(portfolio_ai, ctx.program_id)?;

        let rewards = settle_streams(&pool, &mut portfolio, mode, user)?;
        total = total.checked_add(rewards)?;

        write_account(portfolio_ai, &portfolio)?;
    }

    // --- pay the claimer ---
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

    payout.pay(&mut ctx.accounts.airdrop, &user_info, user_token_account.as_ref(), total)?;

    // --- referral cascade on the claimed amounts ---
    let (ref1, ref2) = referrers_of(
        ctx.program_id,
        user,
        &ctx.accounts.referral.to_account_info(),
        &ctx.accounts.upline_referral.to_account_info(),
    )?;
    if ref1 == Pubkey::default() {
        return Ok(());
    }

    for kind in [RewardKind::Native, RewardKind::Token] {
        let amount = total.get(kind);
        if !mode.includes(kind) || amount == 0 {
            continue;
        }

        let reward = compute_reward(ref1, ref2, amount, kind, &cfg.referral_fees)?;
        if reward.is_empty() {
            continue;
        }

        match kind {
            RewardKind::Native => pay_referrers_native(&ctx.accounts, &payout, &reward)?,
            RewardKind::Token => pay_referrers_token(&ctx.accounts, &payout, &reward)?,
        }

        emit!(ReferralRewardPaid {
            account: user,
            tier1: reward.tier1,
            tier1_reward: reward.tier1_reward,
            tier2: reward.tier2,
            tier2_reward: reward.tier2_reward,
            kind,
        });
    }

    Ok(())
}

fn pay_referrers_native<'info>(
    accounts: &ClaimRewards<'info>,
    payout: &Payout<'info>,
    reward: &ReferralReward,
) -> Result<()> {
    if reward.tier1_reward > 0 {
        let wallet = accounts
            .tier1_wallet
            .as_ref()
            .ok_or(RewardsError::ReferrerMismatch)?;
        require_keys_eq!(wallet.key(), reward.tier1, RewardsError::ReferrerMismatch);
        payout.native(&wallet.to_account_info(), reward.tier1_reward)?;
    }

    if reward.tier2_reward > 0 {
        let wallet = accounts
            .tier2_wallet
            .as_ref()
            .ok_or(RewardsError::ReferrerMismatch)?;
        require_keys_eq!(wallet.key(), reward.tier2, RewardsError::ReferrerMismatch);
        payout.native(&wallet.to_account_info(), reward.tier2_reward)?;
    }

    Ok(())
}

fn pay_referrers_token<'info>(
    accounts: &ClaimRewards<'info>,
    payout: &Payout<'info>,
    reward: &ReferralReward,
) -> Result<()> {
    if reward.tier1_reward > 0 {
        let ata = accounts
            .tier1_token_account
            .as_ref()
            .ok_or(RewardsError::MissingTokenAccount)?;
        require_keys_eq!(ata.owner, reward.tier1, RewardsError::ReferrerMismatch);
        payout.token(Some(&ata.to_account_info()), reward.tier1_reward)?;
    }

    if reward.tier2_reward > 0 {
        let ata = accounts
            .tier2_token_account
            .as_ref()
            .ok_or(RewardsError::MissingTokenAccount)?;
        require_keys_eq!(ata.owner, reward.tier2, RewardsError::ReferrerMismatch);
        payout.token(Some(&ata.to_account_info()), reward.tier2_reward)?;
    }

    Ok(())
}
