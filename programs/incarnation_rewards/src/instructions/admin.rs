use anchor_lang::prelude::*;

use anchor_spl::token::{self, SetAuthority};
use anchor_spl::token::spl_token::instruction::AuthorityType;

use crate::constants::*;
use crate::errors::RewardsError;
use crate::events::{ConfigChanged, ConfigSetting};
use crate::lottery::{self, hour_floor};
use crate::referral;
use crate::state::{AirdropConf, RandomnessConf, ReferrerRewardFees, RewardKind};
use crate::utils::pay_native;
use crate::{
    AdvanceSeason, InitializeConfig, SetRewardVault, UpdateAirdrop, UpdateConfig,
    WithdrawNativeVault,
};

pub fn initialize_config(
    ctx: Context<InitializeConfig>,
    registry_authority: Pubkey,
    randomness_oracle: Pubkey,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let cfg = &mut ctx.accounts.config;

    cfg.admin = ctx.accounts.admin.key();
    cfg.bump = ctx.bumps.config;
    cfg.season = INITIAL_SEASON;

    cfg.token_mint = ctx.accounts.token_mint.key();

    cfg.native_vault = ctx.accounts.native_vault.key();
    cfg.native_vault_bump = ctx.bumps.native_vault;

    cfg.randomness_oracle = randomness_oracle;
    cfg.registry_authority = registry_authority;
    cfg.burn_sink = Pubkey::default();

    cfg.referral_fees = ReferrerRewardFees {
        tier1_native_bps: DEFAULT_TIER1_FEE_BPS,
        tier2_native_bps: DEFAULT_TIER2_FEE_BPS,
        tier1_token_bps: DEFAULT_TIER1_FEE_BPS,
        tier2_token_bps: DEFAULT_TIER2_FEE_BPS,
    };
    cfg.randomness = RandomnessConf {
        num_words: DEFAULT_NUM_WORDS,
        ..RandomnessConf::default()
    };

    cfg.min_deposit = DEFAULT_MIN_DEPOSIT;
    cfg.version = INITIAL_VERSION;

    // drops start disabled; the first interval counts from the current hour
    let airdrop = &mut ctx.accounts.airdrop;
    airdrop.bump = ctx.bumps.airdrop;
    airdrop.conf = AirdropConf {
        enabled: false,
        token_interval: DEFAULT_TOKEN_DROP_INTERVAL,
        native_interval: DEFAULT_NATIVE_DROP_INTERVAL,
        token_last_update: hour_floor(now),
        native_last_update: hour_floor(now),
        native_ratio_bps: DEFAULT_NATIVE_DROP_RATIO_BPS,
        token_amount: DEFAULT_TOKEN_DROP_AMOUNT,
    };
    airdrop.next_request_id = INITIAL_REQUEST_ID;
    airdrop.native_committed = 0;
    airdrop.pending = Vec::new();
    airdrop.version = INITIAL_VERSION;

    let lb = &mut ctx.accounts.leaderboard;
    lb.season = INITIAL_SEASON;
    lb.bump = ctx.bumps.leaderboard;

    // reward vault: the config PDA becomes the mint authority
    {
        let cpi_program = ctx.accounts.token_program.to_account_info();
        let cpi_accounts = SetAuthority {
            account_or_mint: ctx.accounts.token_mint.to_account_info(),
            current_authority: ctx.accounts.admin.to_account_info(),
        };

        token::set_authority(
            CpiContext::new(cpi_program, cpi_accounts),
            AuthorityType::MintTokens,
            Some(ctx.accounts.config.key()),
        )?;
    }

    Ok(())
}

fn config_changed(setting: ConfigSetting, admin: Pubkey) {
    emit!(ConfigChanged { setting, admin });
}

pub fn set_airdrop_conf(ctx: Context<UpdateAirdrop>, conf: AirdropConf) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    lottery::validate_conf(&conf)?;

    ctx.accounts.airdrop.conf = conf;

    config_changed(ConfigSetting::Airdrop, cfg.admin);
    Ok(())
}

pub fn set_randomness_conf(ctx: Context<UpdateConfig>, conf: RandomnessConf) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    require!(
        conf.num_words > 0 && conf.num_words as usize <= MAX_RANDOM_WORDS,
        RewardsError::InvalidRandomWords
    );

    cfg.randomness = conf;

    config_changed(ConfigSetting::Randomness, cfg.admin);
    Ok(())
}

pub fn set_referral_fees(
    ctx: Context<UpdateConfig>,
    tier1_bps: u16,
    tier2_bps: u16,
    kind: RewardKind,
) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    referral::set_fees(&mut cfg.referral_fees, tier1_bps, tier2_bps, kind)?;

    config_changed(ConfigSetting::ReferralFees, cfg.admin);
    Ok(())
}

pub fn set_randomness_oracle(ctx: Context<UpdateConfig>, oracle: Pubkey) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);
    require!(oracle != Pubkey::default(), RewardsError::ZeroAddress);

    cfg.randomness_oracle = oracle;

    config_changed(ConfigSetting::RandomnessOracle, cfg.admin);
    Ok(())
}

pub fn set_registry_authority(ctx: Context<UpdateConfig>, authority: Pubkey) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);
    require!(authority != Pubkey::default(), RewardsError::ZeroAddress);

    cfg.registry_authority = authority;

    config_changed(ConfigSetting::RegistryAuthority, cfg.admin);
    Ok(())
}

/// `Pubkey::default()` disables the sink; switch fees then stay in the native vault.
pub fn set_burn_sink(ctx: Context<UpdateConfig>, sink: Pubkey) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    cfg.burn_sink = sink;

    config_changed(ConfigSetting::BurnSink, cfg.admin);
    Ok(())
}

pub fn set_min_deposit(ctx: Context<UpdateConfig>, min_deposit: u64) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    cfg.min_deposit = min_deposit;

    config_changed(ConfigSetting::MinDeposit, cfg.admin);
    Ok(())
}

pub fn advance_season(ctx: Context<AdvanceSeason>) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    cfg.season = cfg.season.checked_add(1).ok_or(RewardsError::MathOverflow)?;

    let lb = &mut ctx.accounts.leaderboard;
    lb.season = cfg.season;
    lb.bump = ctx.bumps.leaderboard;

    msg!("season advanced to {}", cfg.season);
    config_changed(ConfigSetting::Season, cfg.admin);
    Ok(())
}

/// Emergency hook. `amount == 0` withdraws everything above the rent-exempt minimum.
pub fn withdraw_native_vault(ctx: Context<WithdrawNativeVault>, amount: u64) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);

    let vault_info = ctx.accounts.native_vault.to_account_info();

    let min_rent = Rent::get()?.minimum_balance(0); // system account
    let current_lamports = vault_info.lamports();

    let withdraw_amount = if amount == 0 {
        current_lamports.saturating_sub(min_rent)
    } else {
        amount
    };

    require!(
        current_lamports >= withdraw_amount.saturating_add(min_rent),
        RewardsError::InsufficientVaultFunds
    );

    pay_native(
        &vault_info,
        &ctx.accounts.admin.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        cfg.native_vault_bump,
        withdraw_amount,
    )?;

    msg!("native vault withdrawal: {} lamports", withdraw_amount);
    Ok(())
}

fn check_reward_vault(current: &Pubkey, new: &Pubkey) -> Result<()> {
    require!(*new != Pubkey::default(), RewardsError::ZeroAddress);
    require!(new != current, RewardsError::RewardVaultUnchanged);
    Ok(())
}

/// Moves minting to `new_mint`. The config PDA takes the new mint authority
/// and hands the old one back to the admin. Unclaimed token rewards are paid
/// in the new token.
pub fn set_reward_vault(ctx: Context<SetRewardVault>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), RewardsError::Unauthorized);
    check_reward_vault(&cfg.token_mint, &ctx.accounts.new_mint.key())?;

    let token_program = ctx.accounts.token_program.to_account_info();

    token::set_authority(
        CpiContext::new(
            token_program.clone(),
            SetAuthority {
                account_or_mint: ctx.accounts.new_mint.to_account_info(),
                current_authority: ctx.accounts.admin.to_account_info(),
            },
        ),
        AuthorityType::MintTokens,
        Some(cfg.key()),
    )?;

    let seeds = &[crate::CONFIG_SEED, &[cfg.bump]];
    let signer = &[&seeds[..]];

    token::set_authority(
        CpiContext::new_with_signer(
            token_program,
            SetAuthority {
                account_or_mint: ctx.accounts.current_mint.to_account_info(),
                current_authority: cfg.to_account_info(),
            },
            signer,
        ),
        AuthorityType::MintTokens,
        Some(cfg.admin),
    )?;

    let cfg = &mut ctx.accounts.config;
    msg!("reward vault: {} -> {}", cfg.token_mint, ctx.accounts.new_mint.key());
    cfg.token_mint = ctx.accounts.new_mint.key();

    config_changed(ConfigSetting::RewardVault, cfg.admin);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_vault_must_be_a_new_nonzero_mint() {
        let current = Pubkey::new_unique();

        let err = check_reward_vault(&current, &Pubkey::default()).unwrap_err();
        assert_eq!(err, error!(RewardsError::ZeroAddress));

        let err = check_reward_vault(&current, &current).unwrap_err();
        assert_eq!(err, error!(RewardsError::RewardVaultUnchanged));

        assert!(check_reward_vault(&current, &Pubkey::new_unique()).is_ok());
    }
}
