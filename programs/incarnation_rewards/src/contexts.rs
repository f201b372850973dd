// programs/incarnation_rewards/src/contexts.rs

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::state::{
    AirdropState, Config, EntityRecord, Leaderboard, Pool, Portfolio, RandomnessRequest,
    ReferralRecord, SignerSet,
};

// ----------------------------
// Admin
// ----------------------------

#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [crate::CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = admin,
        space = 8 + AirdropState::INIT_SPACE,
        seeds = [crate::AIRDROP_SEED],
        bump
    )]
    pub airdrop: Account<'info, AirdropState>,

    #[account(
        init,
        payer = admin,
        space = 8 + Leaderboard::INIT_SPACE,
        seeds = [crate::LEADERBOARD_SEED, crate::INITIAL_SEASON.to_le_bytes().as_ref()],
        bump
    )]
    pub leaderboard: Account<'info, Leaderboard>,

    /// Protocol token; its mint authority moves to the config PDA.
    #[account(mut)]
    pub token_mint: Account<'info, Mint>,

    /// CHECK: system-owned PDA holding locked value and native rewards. Address enforced by seeds/bump.
    #[account(
        init,
        payer = admin,
        space = 0,
        owner = anchor_lang::solana_program::system_program::ID,
        seeds = [crate::NATIVE_VAULT_SEED],
        bump
    )]
    pub native_vault: UncheckedAccount<'info>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Shared by every setter that replaces a field of `Config`.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        mut,
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct UpdateAirdrop<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::AIRDROP_SEED],
        bump = airdrop.bump
    )]
    pub airdrop: Account<'info, AirdropState>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct AdvanceSeason<'info> {
    #[account(
        mut,
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = admin,
        space = 8 + Leaderboard::INIT_SPACE,
        seeds = [crate::LEADERBOARD_SEED, (config.season + 1).to_le_bytes().as_ref()],
        bump
    )]
    pub leaderboard: Account<'info, Leaderboard>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct WithdrawNativeVault<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    /// CHECK: System-owned PDA. Address enforced by seeds/bump + address = config.native_vault
    #[account(
        mut,
        seeds = [crate::NATIVE_VAULT_SEED],
        bump = config.native_vault_bump,
        address = config.native_vault
    )]
    pub native_vault: UncheckedAccount<'info>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Rotates the protocol token. The admin must hold the new mint's authority.
#[derive(Accounts)]
pub struct SetRewardVault<'info> {
    #[account(
        mut,
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(mut, address = config.token_mint)]
    pub current_mint: Account<'info, Mint>,

    #[account(mut)]
    pub new_mint: Account<'info, Mint>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

// ----------------------------
// SignerSet (voucher allowlist)
// ----------------------------

#[derive(Accounts)]
pub struct InitializeSignerSet<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = admin,
        space = 8 + SignerSet::INIT_SPACE,
        seeds = [crate::SIGNER_SET_SEED, config.key().as_ref()],
        bump
    )]
    pub signer_set: Account<'info, SignerSet>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ModifySignerSet<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::SIGNER_SET_SEED, config.key().as_ref()],
        bump = signer_set.bump
    )]
    pub signer_set: Account<'info, SignerSet>,

    pub admin: Signer<'info>,
}

// ----------------------------
// Registry hooks (entity ownership, achievement score)
// ----------------------------

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct SetEntityOwner<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + EntityRecord::INIT_SPACE,
        seeds = [crate::ENTITY_SEED, pool_id.to_le_bytes().as_ref()],
        bump
    )]
    pub entity: Account<'info, EntityRecord>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct RecordScore<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::LEADERBOARD_SEED, config.season.to_le_bytes().as_ref()],
        bump = leaderboard.bump
    )]
    pub leaderboard: Account<'info, Leaderboard>,

    pub authority: Signer<'info>,
}

// ----------------------------
// Deposits
// ----------------------------

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct Deposit<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [crate::ENTITY_SEED, pool_id.to_le_bytes().as_ref()],
        bump = entity.bump
    )]
    pub entity: Account<'info, EntityRecord>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Pool::INIT_SPACE,
        seeds = [crate::POOL_SEED, config.season.to_le_bytes().as_ref(), pool_id.to_le_bytes().as_ref()],
        bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Portfolio::INIT_SPACE,
        seeds = [
            crate::PORTFOLIO_SEED,
            config.season.to_le_bytes().as_ref(),
            user.key().as_ref(),
            pool_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub portfolio: Account<'info, Portfolio>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + ReferralRecord::INIT_SPACE,
        seeds = [crate::REFERRAL_SEED, user.key().as_ref()],
        bump
    )]
    pub referral: Account<'info, ReferralRecord>,

    #[account(
        mut,
        seeds = [crate::AIRDROP_SEED],
        bump = airdrop.bump
    )]
    pub airdrop: Account<'info, AirdropState>,

    #[account(
        mut,
        seeds = [crate::LEADERBOARD_SEED, config.season.to_le_bytes().as_ref()],
        bump = leaderboard.bump
    )]
    pub leaderboard: Account<'info, Leaderboard>,

    /// CHECK: System-owned PDA. Address enforced by seeds/bump + address = config.native_vault
    #[account(
        mut,
        seeds = [crate::NATIVE_VAULT_SEED],
        bump = config.native_vault_bump,
        address = config.native_vault
    )]
    pub native_vault: UncheckedAccount<'info>,

    #[account(mut, address = config.token_mint)]
    pub token_mint: Account<'info, Mint>,

    /// Receives settled token rewards; required only when some are pending.
    #[account(
        mut,
        token::mint = token_mint,
        token::authority = user,
    )]
    pub user_token_account: Option<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct DepositSigned<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        seeds = [crate::SIGNER_SET_SEED, config.key().as_ref()],
        bump = signer_set.bump
    )]
    pub signer_set: Account<'info, SignerSet>,

    #[account(
        seeds = [crate::ENTITY_SEED, pool_id.to_le_bytes().as_ref()],
        bump = entity.bump
    )]
    pub entity: Account<'info, EntityRecord>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Pool::INIT_SPACE,
        seeds = [crate::POOL_SEED, config.season.to_le_bytes().as_ref(), pool_id.to_le_bytes().as_ref()],
        bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Portfolio::INIT_SPACE,
        seeds = [
            crate::PORTFOLIO_SEED,
            config.season.to_le_bytes().as_ref(),
            user.key().as_ref(),
            pool_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub portfolio: Account<'info, Portfolio>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + ReferralRecord::INIT_SPACE,
        seeds = [crate::REFERRAL_SEED, user.key().as_ref()],
        bump
    )]
    pub referral: Account<'info, ReferralRecord>,

    /// CHECK: UsedSeed PDA, created by the handler. Must not exist yet (replay guard).
    #[account(mut)]
    pub used_seed: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [crate::AIRDROP_SEED],
        bump = airdrop.bump
    )]
    pub airdrop: Account<'info, AirdropState>,

    #[account(
        mut,
        seeds = [crate::LEADERBOARD_SEED, config.season.to_le_bytes().as_ref()],
        bump = leaderboard.bump
    )]
    pub leaderboard: Account<'info, Leaderboard>,

    /// CHECK: System-owned PDA. Address enforced by seeds/bump + address = config.native_vault
    #[account(
        mut,
        seeds = [crate::NATIVE_VAULT_SEED],
        bump = config.native_vault_bump,
        address = config.native_vault
    )]
    pub native_vault: UncheckedAccount<'info>,

    #[account(mut, address = config.token_mint)]
    pub token_mint: Account<'info, Mint>,

    #[account(
        mut,
        token::mint = token_mint,
        token::authority = user,
    )]
    pub user_token_account: Option<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub user: Signer<'info>,

    /// CHECK: instruction sysvar (for ed25519 introspection). Address enforced.
    #[account(address = anchor_lang::solana_program::sysvar::instructions::ID)]
    pub instructions: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

// ----------------------------
// Switch
// ----------------------------

#[derive(Accounts)]
#[instruction(from_pool_id: u64, to_pool_id: u64)]
pub struct SwitchPool<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::POOL_SEED, config.season.to_le_bytes().as_ref(), from_pool_id.to_le_bytes().as_ref()],
        bump = from_pool.bump
    )]
    pub from_pool: Account<'info, Pool>,

    #[account(
        mut,
        seeds = [
            crate::PORTFOLIO_SEED,
            config.season.to_le_bytes().as_ref(),
            user.key().as_ref(),
            from_pool_id.to_le_bytes().as_ref()
        ],
        bump = from_portfolio.bump
    )]
    pub from_portfolio: Account<'info, Portfolio>,

    #[account(
        seeds = [crate::ENTITY_SEED, to_pool_id.to_le_bytes().as_ref()],
        bump = to_entity.bump
    )]
    pub to_entity: Account<'info, EntityRecord>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Pool::INIT_SPACE,
        seeds = [crate::POOL_SEED, config.season.to_le_bytes().as_ref(), to_pool_id.to_le_bytes().as_ref()],
        bump
    )]
    pub to_pool: Account<'info, Pool>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Portfolio::INIT_SPACE,
        seeds = [
            crate::PORTFOLIO_SEED,
            config.season.to_le_bytes().as_ref(),
            user.key().as_ref(),
            to_pool_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub to_portfolio: Account<'info, Portfolio>,

    #[account(
        mut,
        seeds = [crate::LEADERBOARD_SEED, config.season.to_le_bytes().as_ref()],
        bump = leaderboard.bump
    )]
    pub leaderboard: Account<'info, Leaderboard>,

    #[account(
        mut,
        seeds = [crate::AIRDROP_SEED],
        bump = airdrop.bump
    )]
    pub airdrop: Account<'info, AirdropState>,

    /// CHECK: System-owned PDA. Address enforced by seeds/bump + address = config.native_vault
    #[account(
        mut,
        seeds = [crate::NATIVE_VAULT_SEED],
        bump = config.native_vault_bump,
        address = config.native_vault
    )]
    pub native_vault: UncheckedAccount<'info>,

    /// CHECK: must equal config.burn_sink when a sink is configured (checked in handler).
    #[account(mut)]
    pub burn_sink: Option<UncheckedAccount<'info>>,

    #[account(mut, address = config.token_mint)]
    pub token_mint: Account<'info, Mint>,

    #[account(
        mut,
        token::mint = token_mint,
        token::authority = user,
    )]
    pub user_token_account: Option<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

// ----------------------------
// Claims
// remaining_accounts: [pool, portfolio] per requested pool id
// ----------------------------

#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::AIRDROP_SEED],
        bump = airdrop.bump
    )]
    pub airdrop: Account<'info, AirdropState>,

    /// CHECK: System-owned PDA. Address enforced by seeds/bump + address = config.native_vault
    #[account(
        mut,
        seeds = [crate::NATIVE_VAULT_SEED],
        bump = config.native_vault_bump,
        address = config.native_vault
    )]
    pub native_vault: UncheckedAccount<'info>,

    #[account(mut, address = config.token_mint)]
    pub token_mint: Account<'info, Mint>,

    #[account(
        mut,
        token::mint = token_mint,
        token::authority = user,
    )]
    pub user_token_account: Option<Account<'info, TokenAccount>>,

    /// CHECK: claimer's ReferralRecord PDA; may be uninitialized (no referrer).
    #[account(
        seeds = [crate::REFERRAL_SEED, user.key().as_ref()],
        bump
    )]
    pub referral: UncheckedAccount<'info>,

    /// CHECK: ReferralRecord PDA of the tier-1 referrer, matched in the handler.
    /// Ignored when the claimer has no referrer.
    pub upline_referral: UncheckedAccount<'info>,

    /// CHECK: tier-1 referrer wallet, matched against the referral record in the handler.
    #[account(mut)]
    pub tier1_wallet: Option<UncheckedAccount<'info>>,

    /// CHECK: tier-2 referrer wallet, matched against the upline record in the handler.
    #[account(mut)]
    pub tier2_wallet: Option<UncheckedAccount<'info>>,

    #[account(mut, token::mint = token_mint)]
    pub tier1_token_account: Option<Account<'info, TokenAccount>>,

    #[account(mut, token::mint = token_mint)]
    pub tier2_token_account: Option<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

// ----------------------------
// Airdrop lottery
// ----------------------------

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    #[account(
        seeds = [crate::AIRDROP_SEED],
        bump = airdrop.bump
    )]
    pub airdrop: Account<'info, AirdropState>,
}

/// remaining_accounts (execute only): [pool, entity, owner_portfolio] per winner
#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::AIRDROP_SEED],
        bump = airdrop.bump
    )]
    pub airdrop: Account<'info, AirdropState>,

    #[account(
        seeds = [crate::LEADERBOARD_SEED, config.season.to_le_bytes().as_ref()],
        bump = leaderboard.bump
    )]
    pub leaderboard: Account<'info, Leaderboard>,

    /// CHECK: System-owned PDA. Only its balance is read.
    #[account(
        seeds = [crate::NATIVE_VAULT_SEED],
        bump = config.native_vault_bump,
        address = config.native_vault
    )]
    pub native_vault: UncheckedAccount<'info>,

    /// CHECK: RandomnessRequest PDA; created for request actions, loaded for execute actions.
    #[account(mut)]
    pub request: UncheckedAccount<'info>,

    #[account(mut)]
    pub cranker: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct FulfillRandomWords<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::AIRDROP_SEED],
        bump = airdrop.bump
    )]
    pub airdrop: Account<'info, AirdropState>,

    #[account(
        mut,
        seeds = [crate::REQUEST_SEED, request_id.to_le_bytes().as_ref()],
        bump = request.bump
    )]
    pub request: Account<'info, RandomnessRequest>,

    /// CHECK: instruction sysvar (for ed25519 introspection). Address enforced.
    #[account(address = anchor_lang::solana_program::sysvar::instructions::ID)]
    pub instructions: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct FulfillRandomWordsMock<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::AIRDROP_SEED],
        bump = airdrop.bump
    )]
    pub airdrop: Account<'info, AirdropState>,

    #[account(
        mut,
        seeds = [crate::REQUEST_SEED, request_id.to_le_bytes().as_ref()],
        bump = request.bump
    )]
    pub request: Account<'info, RandomnessRequest>,

    pub admin: Signer<'info>,
}

// ----------------------------
// Views
// ----------------------------

/// remaining_accounts: [pool, portfolio] per pool id
#[derive(Accounts)]
pub struct PendingRewardsView<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,
}

#[derive(Accounts)]
#[instruction(season: u64, pool_id: u64)]
pub struct GetPool<'info> {
    #[account(
        seeds = [crate::POOL_SEED, season.to_le_bytes().as_ref(), pool_id.to_le_bytes().as_ref()],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,
}

#[derive(Accounts)]
#[instruction(season: u64, owner: Pubkey, pool_id: u64)]
pub struct GetPortfolio<'info> {
    #[account(
        seeds = [
            crate::PORTFOLIO_SEED,
            season.to_le_bytes().as_ref(),
            owner.as_ref(),
            pool_id.to_le_bytes().as_ref()
        ],
        bump = portfolio.bump
    )]
    pub portfolio: Account<'info, Portfolio>,
}

#[derive(Accounts)]
#[instruction(account: Pubkey)]
pub struct ReferralView<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    /// CHECK: ReferralRecord PDA of `account`; may be uninitialized.
    #[account(
        seeds = [crate::REFERRAL_SEED, account.as_ref()],
        bump
    )]
    pub referral: UncheckedAccount<'info>,

    /// CHECK: ReferralRecord PDA of the tier-1 referrer, matched in the handler.
    pub upline_referral: UncheckedAccount<'info>,
}
