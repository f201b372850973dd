use anchor_lang::prelude::*;
use anchor_lang::solana_program::{program::invoke, system_instruction};

use crate::{
    errors::RewardsError,
    events::{PoolValueChanged, ValueDirection},
    instructions::payout::{settle_streams, ClaimMode, Payout},
    ledger,
    referral::record_referrer,
    state::{Leaderboard, Pool, Portfolio, ReferralRecord, SignerSet, UsedSeed},
    utils::{
        assert_signed_by, create_pda_account, expected_deposit_msg, load_preceding_ed25519,
        require_top_level, write_account, USED_SEED_SEED,
    },
    Deposit, DepositSigned,
};

// -------------------------
// Lazy initialization of init_if_needed accounts
// -------------------------

pub(crate) fn init_pool(pool: &mut Pool, bump: u8, season: u64, pool_id: u64) {
    if pool.pool_id != 0 {
        return;
    }
    pool.pool_id = pool_id;
    pool.season = season;
    pool.bump = bump;
}

pub(crate) fn init_portfolio(portfolio: &mut Portfolio, bump: u8, season: u64, owner: Pubkey, pool_id: u64) {
    if portfolio.owner != Pubkey::default() {
        return;
    }
    portfolio.owner = owner;
    portfolio.pool_id = pool_id;
    portfolio.season = season;
    portfolio.bump = bump;
}

fn link_referrer(record: &mut ReferralRecord, bump: u8, account: Pubkey, referrer: Pubkey, now: i64) {
    if record.account == Pubkey::default() {
        record.account = account;
        record.bump = bump;
    }
    if record_referrer(record, account, referrer) {
        record.recorded_at = now;
    }
}

// -------------------------
// Value changes
// -------------------------

/// Increases a settled portfolio and keeps the value ranking current.
pub(crate) fn stake(
    pool: &mut Pool,
    portfolio: &mut Portfolio,
    leaderboard: &mut Leaderboard,
    amount: u64,
    now: i64,
) -> Result<()> {
    ledger::increase(pool, portfolio, amount)?;
    leaderboard.record_value(pool.pool_id, pool.total_value);
    pool.last_updated = now;

    emit!(PoolValueChanged {
        direction: ValueDirection::Increase,
        account: portfolio.owner,
        pool_id: pool.pool_id,
        amount,
        season: pool.season,
    });
    Ok(())
}

pub(crate) fn unstake(
    pool: &mut Pool,
    portfolio: &mut Portfolio,
    leaderboard: &mut Leaderboard,
    amount: u64,
    now: i64,
) -> Result<()> {
    ledger::decrease(pool, portfolio, amount)?;
    leaderboard.record_value(pool.pool_id, pool.total_value);
    pool.last_updated = now;

    emit!(PoolValueChanged {
        direction: ValueDirection::Decrease,
        account: portfolio.owner,
        pool_id: pool.pool_id,
        amount,
        season: pool.season,
    });
    Ok(())
}

// -------------------------
// Entry points
// -------------------------

pub fn deposit(ctx: Context<Deposit>, pool_id: u64, amount: u64, referrer: Pubkey) -> Result<()> {
    require_top_level()?;
    require!(pool_id != 0, RewardsError::InvalidPoolId);

    let cfg = &ctx.accounts.config;
    require!(
        amount > 0 && amount >= cfg.min_deposit,
        RewardsError::InsufficientValue
    );

    // lock the attached value in the native vault
    let ix = system_instruction::transfer(
        &ctx.accounts.user.key(),
        &ctx.accounts.native_vault.key(),
        amount,
    );
    invoke(
        &ix,
        &[
            ctx.accounts.user.to_account_info(),
            ctx.accounts.native_vault.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
        ],
    )?;

    let season = cfg.season;
    let now = Clock::get()?.unix_timestamp;
    let user = ctx.accounts.user.key();

    link_referrer(&mut ctx.accounts.referral, ctx.bumps.referral, user, referrer, now);
    init_pool(&mut ctx.accounts.pool, ctx.bumps.pool, season, pool_id);
    init_portfolio(&mut ctx.accounts.portfolio, ctx.bumps.portfolio, season, user, pool_id);

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

    let rewards = settle_streams(&ctx.accounts.pool, &mut ctx.accounts.portfolio, ClaimMode::Both, user)?;
    payout.pay(&mut ctx.accounts.airdrop, &user_info, user_token_account.as_ref(), rewards)?;

    stake(
        &mut ctx.accounts.pool,
        &mut ctx.accounts.portfolio,
        &mut ctx.accounts.leaderboard,
        amount,
        now,
    )
}

// Tx layout must be: [ ed25519_verify(allowlisted signer), deposit_signed ]
pub fn deposit_signed(
    ctx: Context<DepositSigned>,
    pool_id: u64,
    amount: u64,
    seed: [u8; 32],
    referrer: Pubkey,
) -> Result<()> {
    require_top_level()?;
    require!(pool_id != 0, RewardsError::InvalidPoolId);
    require!(amount > 0, RewardsError::InsufficientValue);

    let user = ctx.accounts.user.key();

    // --- voucher ---
    let signed = load_preceding_ed25519(&ctx.accounts.instructions.to_account_info())?;
    let ss: &SignerSet = &ctx.accounts.signer_set;
    require!(ss.signers.contains(&signed.0), RewardsError::SignerNotAllowed);

    let expected = expected_deposit_msg(ctx.program_id, &user, pool_id, amount, &seed);
    assert_signed_by(&signed, &signed.0, expected.as_slice())?;

    // --- consume the seed (replay guard) ---
    let now = Clock::get()?.unix_timestamp;
    {
        let used_ai = ctx.accounts.used_seed.to_account_info();
        let (expected_pda, bump) =
            Pubkey::find_program_address(&[USED_SEED_SEED, &seed], ctx.program_id);
        require_keys_eq!(expected_pda, used_ai.key(), RewardsError::PdaMismatch);
        require!(
            used_ai.lamports() == 0 && used_ai.data_is_empty(),
            RewardsError::SeedAlreadyUsed
        );

        create_pda_account(
            &ctx.accounts.user.to_account_info(),
            &used_ai,
            &ctx.accounts.system_program.to_account_info(),
            ctx.program_id,
            8 + UsedSeed::INIT_SPACE,
            &[USED_SEED_SEED, &seed, &[bump]],
        )?;

        write_account(
            &used_ai,
            &UsedSeed {
                seed,
                user,
                bump,
                used_at: now,
            },
        )?;
    }

    let cfg = &ctx.accounts.config;
    let season = cfg.season;

    link_referrer(&mut ctx.accounts.referral, ctx.bumps.referral, user, referrer, now);
    init_pool(&mut ctx.accounts.pool, ctx.bumps.pool, season, pool_id);
    init_portfolio(&mut ctx.accounts.portfolio, ctx.bumps.portfolio, season, user, pool_id);

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

    let rewards = settle_streams(&ctx.accounts.pool, &mut ctx.accounts.portfolio, ClaimMode::Both, user)?;
    payout.pay(&mut ctx.accounts.airdrop, &user_info, user_token_account.as_ref(), rewards)?;

    msg!("signed deposit: pool {} amount {} by {}", pool_id, amount, signed.0);

    stake(
        &mut ctx.accounts.pool,
        &mut ctx.accounts.portfolio,
        &mut ctx.accounts.leaderboard,
        amount,
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazy_init_runs_once() {
        let mut pool = Pool::default();
        init_pool(&mut pool, 254, 1, 7);
        init_pool(&mut pool, 1, 2, 9);
        assert_eq!((pool.pool_id, pool.season, pool.bump), (7, 1, 254));

        let owner = Pubkey::new_unique();
        let mut pf = Portfolio::default();
        init_portfolio(&mut pf, 253, 1, owner, 7);
        init_portfolio(&mut pf, 1, 1, Pubkey::new_unique(), 9);
        assert_eq!(pf.owner, owner);
        assert_eq!(pf.pool_id, 7);
    }

    #[test]
    fn referrer_is_linked_once() {
        let account = Pubkey::new_unique();
        let first = Pubkey::new_unique();
        let mut record = ReferralRecord {
            account: Pubkey::default(),
            referrer: Pubkey::default(),
            bump: 0,
            recorded_at: 0,
        };

        // deposit without a referrer only claims the record
        link_referrer(&mut record, 250, account, Pubkey::default(), 10);
        assert_eq!(record.account, account);
        assert_eq!(record.referrer, Pubkey::default());

        link_referrer(&mut record, 250, account, first, 20);
        link_referrer(&mut record, 250, account, Pubkey::new_unique(), 30);
        assert_eq!(record.referrer, first);
        assert_eq!(record.recorded_at, 20);
    }

    #[test]
    fn self_referral_is_ignored() {
        let account = Pubkey::new_unique();
        let mut record = ReferralRecord {
            account: Pubkey::default(),
            referrer: Pubkey::default(),
            bump: 0,
            recorded_at: 0,
        };
        link_referrer(&mut record, 250, account, account, 10);
        assert_eq!(record.referrer, Pubkey::default());
        assert_eq!(record.recorded_at, 0);
    }
}
