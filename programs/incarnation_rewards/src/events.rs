use anchor_lang::prelude::*;

use crate::state::RewardKind;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueDirection {
    Increase,
    Decrease,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSetting {
    Airdrop,
    Randomness,
    ReferralFees,
    RandomnessOracle,
    RegistryAuthority,
    BurnSink,
    RewardVault,
    MinDeposit,
    Season,
}

// ══════════════════════════════════════════════════════════════════════════════
// LEDGER EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted whenever a portfolio's locked value changes
#[event]
pub struct PoolValueChanged {
    pub direction: ValueDirection,
    pub account: Pubkey,
    pub pool_id: u64,
    pub amount: u64,
    pub season: u64,
}

/// Emitted per pool and stream on claim. Native claims of zero are silent.
#[event]
pub struct DropClaimed {
    pub kind: RewardKind,
    pub account: Pubkey,
    pub pool_id: u64,
    pub amount: u64,
}

/// Emitted when a pool's accumulator receives a drop
#[event]
pub struct DropExecuted {
    pub kind: RewardKind,
    pub pool_id: u64,
    pub request_id: u64,
    pub pool_share: u64,
    pub owner: Pubkey,
    pub owner_bonus: u64,
}

// ══════════════════════════════════════════════════════════════════════════════
// REFERRAL EVENTS
// ══════════════════════════════════════════════════════════════════════════════

#[event]
pub struct ReferralRewardPaid {
    pub account: Pubkey,
    pub tier1: Pubkey,
    pub tier1_reward: u64,
    pub tier2: Pubkey,
    pub tier2_reward: u64,
    pub kind: RewardKind,
}

// ══════════════════════════════════════════════════════════════════════════════
// LOTTERY EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Picked up by the randomness oracle, which answers with `fulfill_random_words`
#[event]
pub struct RandomnessRequested {
    pub request_id: u64,
    pub kind: RewardKind,
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub callback_compute_limit: u32,
    pub request_confirmations: u16,
    pub num_words: u32,
}

#[event]
pub struct RandomnessFulfilled {
    pub request_id: u64,
    pub kind: RewardKind,
    pub num_words: u32,
}

// ══════════════════════════════════════════════════════════════════════════════
// ADMIN EVENTS
// ══════════════════════════════════════════════════════════════════════════════

#[event]
pub struct ConfigChanged {
    pub setting: ConfigSetting,
    pub admin: Pubkey,
}
