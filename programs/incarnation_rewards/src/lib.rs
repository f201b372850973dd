use anchor_lang::prelude::*;

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;
pub mod contexts;
pub mod constants;

pub mod ledger;
pub mod lottery;
pub mod ranking;
pub mod referral;
pub mod tracker;

pub use utils::*;
pub use instructions::*;
pub use state::*;
pub use errors::*;
pub use contexts::*;
pub use constants::*;

use crate::ledger::Rewards;
use crate::lottery::{UpkeepAction, UpkeepCheck};
use crate::referral::ReferralReward;

declare_id!("DM6HTkR8m4XTrsnRTBguk4hxaVGQPvt5ueeCZKnqaQmP");

#[program]
pub mod incarnation_rewards {
    use super::*;
    use crate::instructions::{
        admin, claim, deposit, oracle, registry, signer_set, switch, upkeep, views,
    };

    pub fn initialize_config(
        ctx: Context<InitializeConfig>,
        registry_authority: Pubkey,
        randomness_oracle: Pubkey,
    ) -> Result<()> {
        admin::initialize_config(ctx, registry_authority, randomness_oracle)
    }

    // ----------------------------
    // Admin setters
    // ----------------------------
    pub fn set_airdrop_conf(ctx: Context<UpdateAirdrop>, conf: AirdropConf) -> Result<()> {
        admin::set_airdrop_conf(ctx, conf)
    }

    pub fn set_randomness_conf(ctx: Context<UpdateConfig>, conf: RandomnessConf) -> Result<()> {
        admin::set_randomness_conf(ctx, conf)
    }

    pub fn set_referral_fees(
        ctx: Context<UpdateConfig>,
        tier1_bps: u16,
        tier2_bps: u16,
        kind: RewardKind,
    ) -> Result<()> {
        admin::set_referral_fees(ctx, tier1_bps, tier2_bps, kind)
    }

    pub fn set_randomness_oracle(ctx: Context<UpdateConfig>, oracle: Pubkey) -> Result<()> {
        admin::set_randomness_oracle(ctx, oracle)
    }

    pub fn set_registry_authority(ctx: Context<UpdateConfig>, authority: Pubkey) -> Result<()> {
        admin::set_registry_authority(ctx, authority)
    }

    pub fn set_burn_sink(ctx: Context<UpdateConfig>, sink: Pubkey) -> Result<()> {
        admin::set_burn_sink(ctx, sink)
    }

    pub fn set_min_deposit(ctx: Context<UpdateConfig>, min_deposit: u64) -> Result<()> {
        admin::set_min_deposit(ctx, min_deposit)
    }

    pub fn advance_season(ctx: Context<AdvanceSeason>) -> Result<()> {
        admin::advance_season(ctx)
    }

    pub fn withdraw_native_vault(ctx: Context<WithdrawNativeVault>, amount: u64) -> Result<()> {
        admin::withdraw_native_vault(ctx, amount)
    }

    pub fn set_reward_vault(ctx: Context<SetRewardVault>) -> Result<()> {
        admin::set_reward_vault(ctx)
    }

    // ----------------------------
    // SignerSet admin controls
    // ----------------------------
    pub fn initialize_signer_set(
        ctx: Context<InitializeSignerSet>,
        initial_signers: Vec<Pubkey>,
    ) -> Result<()> {
        signer_set::initialize_signer_set(ctx, initial_signers)
    }

    pub fn add_signer(ctx: Context<ModifySignerSet>, signer: Pubkey) -> Result<()> {
        signer_set::add_signer(ctx, signer)
    }

    pub fn remove_signer(ctx: Context<ModifySignerSet>, signer: Pubkey) -> Result<()> {
        signer_set::remove_signer(ctx, signer)
    }

    // registry hooks
    pub fn set_entity_owner(ctx: Context<SetEntityOwner>, pool_id: u64, owner: Pubkey) -> Result<()> {
        registry::set_entity_owner(ctx, pool_id, owner)
    }

    pub fn record_score(ctx: Context<RecordScore>, pool_id: u64, score: u64) -> Result<()> {
        registry::record_score(ctx, pool_id, score)
    }

    // ----------------------------
    // User actions
    // ----------------------------
    pub fn deposit(ctx: Context<Deposit>, pool_id: u64, amount: u64, referrer: Pubkey) -> Result<()> {
        deposit::deposit(ctx, pool_id, amount, referrer)
    }

    pub fn deposit_signed(
        ctx: Context<DepositSigned>,
        pool_id: u64,
        amount: u64,
        seed: [u8; 32],
        referrer: Pubkey,
    ) -> Result<()> {
        deposit::deposit_signed(ctx, pool_id, amount, seed, referrer)
    }

    pub fn switch_pool(
        ctx: Context<SwitchPool>,
        from_pool_id: u64,
        to_pool_id: u64,
        amount: u64,
    ) -> Result<()> {
        switch::switch_pool(ctx, from_pool_id, to_pool_id, amount)
    }

    pub fn claim_rewards<'info>(
        ctx: Context<'_, '_, 'info, 'info, ClaimRewards<'info>>,
        pool_ids: Vec<u64>,
    ) -> Result<()> {
        claim::claim(ctx, pool_ids, ClaimMode::Both)
    }

    pub fn claim_native<'info>(
        ctx: Context<'_, '_, 'info, 'info, ClaimRewards<'info>>,
        pool_ids: Vec<u64>,
    ) -> Result<()> {
        claim::claim(ctx, pool_ids, ClaimMode::NativeOnly)
    }

    pub fn claim_token<'info>(
        ctx: Context<'_, '_, 'info, 'info, ClaimRewards<'info>>,
        pool_ids: Vec<u64>,
    ) -> Result<()> {
        claim::claim(ctx, pool_ids, ClaimMode::TokenOnly)
    }

    // ----------------------------
    // Airdrop lottery
    // ----------------------------
    pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<UpkeepCheck> {
        upkeep::check_upkeep(ctx)
    }

    pub fn perform_upkeep<'info>(
        ctx: Context<'_, '_, 'info, 'info, PerformUpkeep<'info>>,
        action: UpkeepAction,
    ) -> Result<()> {
        upkeep::perform_upkeep(ctx, action)
    }

    pub fn fulfill_random_words(
        ctx: Context<FulfillRandomWords>,
        request_id: u64,
        random_words: Vec<u64>,
    ) -> Result<()> {
        oracle::fulfill_random_words(ctx, request_id, random_words)
    }

    #[cfg(feature = "mock-randomness")]
    pub fn fulfill_random_words_mock(
        ctx: Context<FulfillRandomWordsMock>,
        request_id: u64,
        random_words: Vec<u64>,
    ) -> Result<()> {
        oracle::fulfill_random_words_mock(ctx, request_id, random_words)
    }

    // ----------------------------
    // Views
    // ----------------------------
    pub fn pending_rewards<'info>(
        ctx: Context<'_, '_, 'info, 'info, PendingRewardsView<'info>>,
        owner: Pubkey,
        pool_ids: Vec<u64>,
    ) -> Result<Rewards> {
        views::pending_rewards(ctx, owner, pool_ids)
    }

    pub fn get_pool(ctx: Context<GetPool>, season: u64, pool_id: u64) -> Result<Pool> {
        views::get_pool(ctx, season, pool_id)
    }

    pub fn get_portfolio(
        ctx: Context<GetPortfolio>,
        season: u64,
        owner: Pubkey,
        pool_id: u64,
    ) -> Result<Portfolio> {
        views::get_portfolio(ctx, season, owner, pool_id)
    }

    pub fn get_referrers(ctx: Context<ReferralView>, account: Pubkey) -> Result<Referrers> {
        views::get_referrers(ctx, account)
    }

    pub fn preview_referral_reward(
        ctx: Context<ReferralView>,
        account: Pubkey,
        amount: u64,
        kind: RewardKind,
    ) -> Result<ReferralReward> {
        views::preview_referral_reward(ctx, account, amount, kind)
    }
}
