use anchor_lang::prelude::*;

use crate::constants::{
    MAX_DROP_WINNERS, MAX_PENDING_REQUESTS, MAX_RANDOM_WORDS, MAX_SIGNERS, RANK_STORE_CAPACITY,
};

/// Reward stream a drop, claim or referral fee belongs to.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum RewardKind {
    Native,
    Token,
}

/// Referral fees in basis points, tier x stream.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct ReferrerRewardFees {
    pub tier1_native_bps: u16,
    pub tier2_native_bps: u16,
    pub tier1_token_bps: u16,
    pub tier2_token_bps: u16,
}

/// Drop schedule. Replaced wholesale by `set_airdrop_conf`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct AirdropConf {
    pub enabled: bool,
    pub token_interval: i64,
    pub native_interval: i64,
    /// Start of the hour of the last token request.
    pub token_last_update: i64,
    /// Start of the hour of the last native request.
    pub native_last_update: i64,
    /// Share of the free native balance dropped on each winner.
    pub native_ratio_bps: u16,
    /// Fixed token amount dropped on each winner.
    pub token_amount: u64,
}

/// Parameters forwarded to the randomness oracle with each request.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct RandomnessConf {
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub callback_compute_limit: u32,
    pub request_confirmations: u16,
    pub num_words: u32,
}

#[account]
#[derive(InitSpace)]
pub struct Config {
    pub admin: Pubkey,
    pub bump: u8,

    /// Pools and portfolios are namespaced by season.
    pub season: u64,

    // Reward vault: protocol token, mint authority = this PDA
    pub token_mint: Pubkey,

    // System-owned PDA holding locked value and the native reward stream
    pub native_vault: Pubkey,
    pub native_vault_bump: u8,

    /// Key whose ed25519 signature authenticates random words.
    pub randomness_oracle: Pubkey,

    /// Key allowed to push entity ownership and achievement scores.
    pub registry_authority: Pubkey,

    /// Receives switch fees when set.
    pub burn_sink: Pubkey,

    pub referral_fees: ReferrerRewardFees,
    pub randomness: RandomnessConf,

    pub min_deposit: u64,
    pub version: u16,
}

#[account]
#[derive(InitSpace)]
pub struct AirdropState {
    pub bump: u8,
    pub conf: AirdropConf,
    pub next_request_id: u64,

    /// Native rewards credited by drops and not yet claimed.
    pub native_committed: u64,

    /// Fulfilled requests waiting for execution.
    #[max_len(MAX_PENDING_REQUESTS)]
    pub pending: Vec<PendingRequest>,

    pub version: u16,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct PendingRequest {
    pub request_id: u64,
    pub kind: RewardKind,
}

#[account]
#[derive(InitSpace)]
pub struct RandomnessRequest {
    pub request_id: u64,
    pub bump: u8,
    pub kind: RewardKind,

    pub exists: bool,
    pub fulfilled: bool,
    pub executed: bool,

    pub num_words: u32,
    #[max_len(MAX_RANDOM_WORDS)]
    pub random_words: Vec<u64>,

    pub requested_at: i64,
    pub fulfilled_at: i64,
    pub executed_at: i64,

    // Execution progress, fixed by the first execute call
    pub started: bool,
    pub season: u64,
    /// Per-winner drop before budget clamping.
    pub amount: u64,
    /// Native still available to this drop.
    pub native_budget: u64,
    #[max_len(MAX_DROP_WINNERS)]
    pub winners: Vec<u64>,
    /// Index into `winners` of the next winner to credit.
    pub cursor: u8,
}

#[account]
#[derive(InitSpace, Default)]
pub struct Pool {
    pub pool_id: u64,
    pub season: u64,
    pub bump: u8,

    /// Sum of every portfolio's accumulated_value in this pool.
    pub total_value: u64,

    pub acc_token_per_share: u128,
    pub acc_native_per_share: u128,

    // reserved season/time bookkeeping
    pub epoch: u64,
    pub last_updated: i64,
}

#[account]
#[derive(InitSpace, Default)]
pub struct Portfolio {
    pub owner: Pubkey,
    pub pool_id: u64,
    pub season: u64,
    pub bump: u8,

    pub accumulated_value: u64,

    pub token_reward_debt: u128,
    pub native_reward_debt: u128,

    // credited while owning the pool entity at drop time
    pub pending_owner_token_reward: u64,
    pub pending_owner_native_reward: u64,
}

/// Current owner of a pool entity, mirrored from the ownership registry.
#[account]
#[derive(InitSpace)]
pub struct EntityRecord {
    pub pool_id: u64,
    pub owner: Pubkey,
    pub bump: u8,
    pub updated_at: i64,
}

#[account]
#[derive(InitSpace)]
pub struct ReferralRecord {
    pub account: Pubkey,
    /// Pubkey::default() until recorded; never changes afterwards.
    pub referrer: Pubkey,
    pub bump: u8,
    pub recorded_at: i64,
}

/// Consumed voucher seed. Existence of the PDA is the replay guard.
#[account]
#[derive(InitSpace)]
pub struct UsedSeed {
    pub seed: [u8; 32],
    pub user: Pubkey,
    pub bump: u8,
    pub used_at: i64,
}

#[account]
#[derive(InitSpace)]
pub struct SignerSet {
    pub admin: Pubkey,
    pub bump: u8,

    /// Keys allowed to sign deposit vouchers.
    #[max_len(MAX_SIGNERS)]
    pub signers: Vec<Pubkey>,

    pub version: u16,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct RankEntry {
    pub pool_id: u64,
    pub score: u64,
}

/// Descending, bounded ranking of pool ids.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct RankedView {
    #[max_len(RANK_STORE_CAPACITY)]
    pub entries: Vec<RankEntry>,
    /// Upper bound on the score of any pool not in `entries`.
    pub untracked_max: u64,
}

#[account]
#[derive(InitSpace)]
pub struct Leaderboard {
    pub season: u64,
    pub bump: u8,
    /// Pools ordered by total locked value.
    pub by_value: RankedView,
    /// Pools ordered by achievement score.
    pub by_score: RankedView,
}
